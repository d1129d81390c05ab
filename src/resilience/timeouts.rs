//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound each upstream fetch with its own deadline
//! - Report expiry as a timeout of that upstream
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Timed-out requests return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;

use crate::upstream::{Upstream, UpstreamError, UpstreamResult};

/// Run `fetch`, failing with [`UpstreamError::Timeout`] after `limit`.
pub async fn bounded<T, F>(upstream: Upstream, limit: Duration, fetch: F) -> UpstreamResult<T>
where
    F: Future<Output = UpstreamResult<T>>,
{
    match tokio::time::timeout(limit, fetch).await {
        Ok(result) => result,
        Err(_) => Err(UpstreamError::Timeout {
            upstream,
            limit,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_limit() {
        let result = bounded(Upstream::Domains, Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        };
        let result: UpstreamResult<()> =
            bounded(Upstream::CdsSequences, Duration::from_millis(20), slow).await;
        let err = result.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(err.upstream(), Some(Upstream::CdsSequences));
        assert_eq!(err.to_string(), "ensembl_cds: timed out after 20ms");
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: UpstreamResult<()> = bounded(Upstream::Variants, Duration::from_secs(1), async {
            Err(UpstreamError::Status {
                upstream: Upstream::Variants,
                status: 500,
            })
        })
        .await;
        assert!(matches!(result, Err(UpstreamError::Status { status: 500, .. })));
    }
}
