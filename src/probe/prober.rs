use crate::metrics::sample::Sample;
use async_trait::async_trait;
use std::time::Duration;

/// Measures a single round trip to a host.
///
/// Implementations must not fail: every error (timeout, unreachable host,
/// unparsable output) collapses to [`Sample::Gap`].
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, host: &str, timeout: Duration) -> Sample;
}
