//! Last-request-wins front for an [`InsightProvider`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::context::InsightContext;
use crate::error::InsightError;
use crate::provider::InsightProvider;
use crate::report::InsightReport;

/// Runs insight requests with a timeout. Every call takes a ticket; when a call
/// finishes after a newer one was issued, its result is discarded as
/// [`InsightError::Superseded`].
#[derive(Debug)]
pub struct InsightService<P> {
    provider: Arc<P>,
    timeout: Duration,
    latest_ticket: AtomicU64,
}

impl<P> InsightService<P>
where
    P: InsightProvider,
{
    pub fn new(provider: Arc<P>, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            latest_ticket: AtomicU64::new(0),
        }
    }

    pub async fn request(&self, context: InsightContext) -> Result<InsightReport, InsightError> {
        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(ticket, provider = self.provider.name(), items = context.items.len(), "insight request started");

        let outcome = match tokio::time::timeout(self.timeout, self.provider.generate(&context)).await {
            Ok(result) => result,
            Err(_) => Err(InsightError::Timeout(self.timeout)),
        };

        if self.latest_ticket.load(Ordering::SeqCst) != ticket {
            tracing::debug!(ticket, "insight result discarded, newer request pending");
            return Err(InsightError::Superseded);
        }

        if let Err(err) = &outcome {
            tracing::warn!(ticket, error = %err, "insight request failed");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::InsightReport;
    use async_trait::async_trait;
    use chrono::Utc;

    /// Sleeps for a per-call delay, then echoes the number of items.
    struct DelayedProvider {
        delays_ms: std::sync::Mutex<Vec<u64>>,
    }

    impl DelayedProvider {
        fn new(delays_ms: Vec<u64>) -> Self {
            Self {
                delays_ms: std::sync::Mutex::new(delays_ms),
            }
        }
    }

    #[async_trait]
    impl InsightProvider for DelayedProvider {
        fn name(&self) -> &'static str {
            "delayed"
        }

        async fn generate(&self, context: &InsightContext) -> Result<InsightReport, InsightError> {
            let delay = self.delays_ms.lock().unwrap().remove(0);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(InsightReport::new(format!("{} items", context.items.len())))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl InsightProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn generate(&self, _context: &InsightContext) -> Result<InsightReport, InsightError> {
            Err(InsightError::ExternalService("quota exceeded".to_string()))
        }
    }

    fn empty() -> InsightContext {
        InsightContext::new(Vec::new(), Utc::now())
    }

    #[tokio::test]
    async fn returns_provider_report() {
        let service = InsightService::new(Arc::new(DelayedProvider::new(vec![0])), Duration::from_secs(1));
        let report = service.request(empty()).await.unwrap();
        assert_eq!(report.summary, "0 items");
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let service = InsightService::new(Arc::new(DelayedProvider::new(vec![200])), Duration::from_millis(10));
        let err = service.request(empty()).await.unwrap_err();
        assert_eq!(err, InsightError::Timeout(Duration::from_millis(10)));
        assert!(err.user_message().is_some());
    }

    #[tokio::test]
    async fn newer_request_supersedes_pending_one() {
        let service = InsightService::new(Arc::new(DelayedProvider::new(vec![50, 0])), Duration::from_secs(1));

        let (first, second) = tokio::join!(service.request(empty()), service.request(empty()));

        assert_eq!(first.unwrap_err(), InsightError::Superseded);
        assert_eq!(second.unwrap().summary, "0 items");
        assert_eq!(InsightError::Superseded.user_message(), None);
    }

    #[tokio::test]
    async fn provider_failure_surfaces_as_external_service_error() {
        let service = InsightService::new(Arc::new(FailingProvider), Duration::from_secs(1));
        match service.request(empty()).await {
            Err(InsightError::ExternalService(msg)) => assert_eq!(msg, "quota exceeded"),
            other => panic!("Expected ExternalService, got {other:?}"),
        }
    }
}
