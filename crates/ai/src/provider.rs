use async_trait::async_trait;

use crate::context::InsightContext;
use crate::error::InsightError;
use crate::report::InsightReport;

/// Something that turns an inventory context into an insight report.
///
/// Remote implementations map transport and vendor failures to
/// [`InsightError::ExternalService`].
#[async_trait]
pub trait InsightProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, context: &InsightContext) -> Result<InsightReport, InsightError>;
}
