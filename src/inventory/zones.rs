//! Region to zone resolution
//!
//! `zones.list` has no region filter, so the full list is fetched and filtered
//! here. A zone belongs to a region when its name starts with the region name
//! and is longer than it. There is no delimiter check: "us-east1" also claims
//! a zone named "us-east10-a" if one ever exists.

use super::capability::ComputeApi;
use super::context::RequestContext;
use crate::error::InventoryError;

/// Whether `zone` is attributed to `region`
pub fn zone_in_region(zone: &str, region: &str) -> bool {
    zone.len() > region.len() && zone.starts_with(region)
}

/// Keep the zones of `region`, in the order given
pub fn filter_zones<'a, I>(zones: I, region: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    zones
        .into_iter()
        .filter(|z| zone_in_region(z, region))
        .map(str::to_string)
        .collect()
}

/// Reject a blank region; the empty prefix would claim every zone
pub fn require_region(region: &str) -> Result<(), InventoryError> {
    if region.trim().is_empty() {
        return Err(InventoryError::Config("region must not be empty".to_string()));
    }
    Ok(())
}

/// List the project's zones and keep those of `region`
///
/// Any failure of the listing call is fatal and names the region; there is
/// no fallback zone set.
pub async fn resolve_zones(
    compute: &dyn ComputeApi,
    ctx: &RequestContext,
    project: &str,
    region: &str,
) -> Result<Vec<String>, InventoryError> {
    require_region(region)?;
    let listed = ctx
        .run(compute.list_zones(project))
        .await?
        .map_err(|source| InventoryError::ZoneResolution {
            region: region.to_string(),
            source,
        })?;

    let zones = filter_zones(listed.iter().map(|z| z.name.as_str()), region);
    tracing::debug!(
        "Resolved {} of {} zones for region {}",
        zones.len(),
        listed.len(),
        region
    );
    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_keeps_listing_order() {
        let listed = ["us-central1-f", "europe-west1-b", "us-central1-a", "us-central1-c"];
        assert_eq!(
            filter_zones(listed, "us-central1"),
            ["us-central1-f", "us-central1-a", "us-central1-c"]
        );
    }

    #[test]
    fn test_region_name_alone_is_not_a_zone() {
        assert!(!zone_in_region("us-central1", "us-central1"));
        assert!(zone_in_region("us-central1-a", "us-central1"));
    }

    #[test]
    fn test_prefix_match_has_no_delimiter_check() {
        // Known looseness of the rule, kept as-is
        assert!(zone_in_region("us-east10-a", "us-east1"));
        assert!(!zone_in_region("us-east1-b", "us-east10"));
    }

    #[test]
    fn test_blank_region_is_rejected() {
        assert!(matches!(require_region(""), Err(InventoryError::Config(_))));
        assert!(matches!(require_region("  "), Err(InventoryError::Config(_))));
        assert!(require_region("us-central1").is_ok());
    }

    #[test]
    fn test_no_matching_zones() {
        let listed = ["europe-west1-b", "asia-east1-a"];
        assert!(filter_zones(listed, "us-central1").is_empty());
    }
}
