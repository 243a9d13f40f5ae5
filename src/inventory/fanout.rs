//! Bounded per-zone dispatch
//!
//! At most `limit` zone calls are in flight at once. Outcomes are yielded in
//! the order the zones were given, whatever order the calls finish in.

use std::future::Future;

use futures::stream::{self, StreamExt};

use super::assembler::PartialResult;
use super::context::RequestContext;
use crate::error::{ApiError, InventoryError};

/// Run `call` once per zone and merge the outcomes in zone order
///
/// Cancelling `ctx` (or passing its deadline) drops every in-flight call and
/// returns immediately with the corresponding error.
pub async fn fan_out<'a, T, F, Fut>(
    ctx: &RequestContext,
    zones: &'a [String],
    limit: usize,
    call: F,
) -> Result<PartialResult<T>, InventoryError>
where
    F: Fn(&'a str) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ApiError>>,
{
    let limit = limit.max(1);
    tracing::debug!("Dispatching {} zone calls, {} at a time", zones.len(), limit);

    let calls = stream::iter(0..zones.len())
        .map(|i| {
            let zone = &zones[i];
            let pending = call(zone.as_str());
            async move { (zone.clone(), pending.await) }
        })
        .buffered(limit)
        .collect::<Vec<_>>();

    let outcomes = ctx.run(calls).await?;
    Ok(PartialResult::assemble(outcomes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn zones(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_order_follows_zones_not_completion() {
        let zones = zones(&["slow", "medium", "fast"]);
        let ctx = RequestContext::new();
        let result = fan_out(&ctx, &zones, 3, |zone| async move {
            let delay = match zone {
                "slow" => 60,
                "medium" => 30,
                _ => 0,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(vec![zone.to_string()])
        })
        .await
        .unwrap();
        assert_eq!(result.items, ["slow", "medium", "fast"]);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let zones = zones(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let ctx = RequestContext::new();

        let result = fan_out(&ctx, &zones, 3, |zone| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(vec![zone.to_string()])
            }
        })
        .await
        .unwrap();

        assert_eq!(result.items.len(), 8);
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) > 1, "calls should overlap");
    }

    #[tokio::test]
    async fn test_failed_zone_contributes_nothing() {
        let zones = zones(&["a", "b", "c"]);
        let ctx = RequestContext::new();
        let result = fan_out(&ctx, &zones, 2, |zone| async move {
            if zone == "b" {
                Err(ApiError::Status {
                    status: 503,
                    message: "unavailable".to_string(),
                })
            } else {
                Ok(vec![zone.to_string()])
            }
        })
        .await
        .unwrap();
        assert_eq!(result.items, ["a", "c"]);
        assert_eq!(result.failures[0].zone, "b");
    }

    #[tokio::test]
    async fn test_cancel_returns_promptly() {
        let zones = zones(&["a", "b"]);
        let ctx = RequestContext::new();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let started = std::time::Instant::now();
        let result = fan_out(&ctx, &zones, 2, |_zone| async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Vec::<String>::new())
        })
        .await;

        assert!(matches!(result, Err(InventoryError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
