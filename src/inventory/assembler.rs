//! Merging per-zone outcomes
//!
//! Zone-scoped listings never fail as a whole once their zones are known.
//! Each zone either contributes its items or a [`ZoneFailure`]; the merged
//! list is always in zone-resolution order.

use serde::Serialize;

use super::kind::ResourceKind;
use crate::error::{error_chain, ApiError, InventoryError};

/// A zone whose list call failed and contributed nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneFailure {
    pub zone: String,
    pub reason: String,
    /// HTTP status, when the server answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

/// Items merged across zones, plus which zones were attempted and which failed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialResult<T> {
    pub items: Vec<T>,
    pub zones_attempted: Vec<String>,
    pub failures: Vec<ZoneFailure>,
}

impl<T> Default for PartialResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            zones_attempted: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> PartialResult<T> {
    /// Merge outcomes that are already in zone-resolution order
    pub fn assemble<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (String, Result<Vec<T>, ApiError>)>,
    {
        let mut result = Self::default();
        for (zone, outcome) in outcomes {
            match outcome {
                Ok(items) => result.items.extend(items),
                Err(e) => {
                    let reason = error_chain(&e);
                    tracing::warn!("Skipping zone {}: {}", zone, reason);
                    result.failures.push(ZoneFailure {
                        zone: zone.clone(),
                        reason,
                        status: e.status(),
                    });
                }
            }
            result.zones_attempted.push(zone);
        }
        result
    }

    /// True when every attempted zone answered
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn zones_succeeded(&self) -> usize {
        self.zones_attempted.len() - self.failures.len()
    }

    /// Drop the failure record, keeping whatever was retrieved
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Items only if no zone failed
    pub fn require_complete(self, kind: ResourceKind, region: &str) -> Result<Vec<T>, InventoryError> {
        if self.is_complete() {
            return Ok(self.items);
        }
        Err(InventoryError::IncompleteZones {
            kind,
            region: region.to_string(),
            attempted: self.zones_attempted.len(),
            failed: self.failures.len(),
        })
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PartialResult<U> {
        PartialResult {
            items: self.items.into_iter().map(f).collect(),
            zones_attempted: self.zones_attempted,
            failures: self.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn denied() -> ApiError {
        ApiError::Status {
            status: 403,
            message: "denied".to_string(),
        }
    }

    #[test]
    fn test_assemble_keeps_zone_order_and_records_failures() {
        let result = PartialResult::assemble(vec![
            ("z-a".to_string(), Ok(vec![1, 2])),
            ("z-b".to_string(), Err(denied())),
            ("z-c".to_string(), Ok(vec![3])),
        ]);
        assert_eq!(result.items, [1, 2, 3]);
        assert_eq!(result.zones_attempted, ["z-a", "z-b", "z-c"]);
        assert_eq!(result.zones_succeeded(), 2);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].zone, "z-b");
        assert_eq!(result.failures[0].status, Some(403));
        assert!(!result.is_complete());
    }

    #[test]
    fn test_require_complete() {
        let ok: PartialResult<i32> = PartialResult::assemble(vec![("z-a".to_string(), Ok(vec![1]))]);
        assert_eq!(ok.require_complete(ResourceKind::ComputeInstance, "r").unwrap(), [1]);

        let partial: PartialResult<i32> = PartialResult::assemble(vec![
            ("z-a".to_string(), Ok(vec![1])),
            ("z-b".to_string(), Err(denied())),
        ]);
        let err = partial
            .require_complete(ResourceKind::PersistentDisk, "us-central1")
            .unwrap_err();
        assert!(matches!(
            err,
            InventoryError::IncompleteZones { attempted: 2, failed: 1, .. }
        ));
    }

    #[test]
    fn test_empty_zone_set_is_complete() {
        let result: PartialResult<i32> = PartialResult::assemble(Vec::new());
        assert!(result.is_complete());
        assert!(result.items.is_empty());
        assert_eq!(result.zones_succeeded(), 0);
    }
}
