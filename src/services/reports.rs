use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument};

use crate::config::ReportConfig;
use crate::errors::ReportError;
use crate::models::ReportRequest;
use crate::reports::{
    Clock, JsonRenderer, PaginatedDocumentRenderer, RenderedDocument, ReportFormat,
    ReportRenderer, TabularWorkbookRenderer,
};

/// Renders report requests in any supported format.
///
/// Rendering is CPU-bound, so the async entry point moves it onto the
/// blocking pool and hands back a single awaited result.
#[derive(Clone)]
pub struct ReportService {
    pdf: Arc<PaginatedDocumentRenderer>,
    excel: Arc<TabularWorkbookRenderer>,
    json: Arc<JsonRenderer>,
}

impl std::fmt::Debug for ReportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportService").finish_non_exhaustive()
    }
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new(&ReportConfig::default())
    }
}

impl ReportService {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            pdf: Arc::new(PaginatedDocumentRenderer::new(config)),
            excel: Arc::new(TabularWorkbookRenderer::new(config.limits.clone())),
            json: Arc::new(JsonRenderer),
        }
    }

    /// Replaces the clock used for the "Generated:" line of paginated documents.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        let pdf = (*self.pdf).clone().with_clock(clock);
        self.pdf = Arc::new(pdf);
        self
    }

    pub fn renderer(&self, format: ReportFormat) -> Arc<dyn ReportRenderer> {
        match format {
            ReportFormat::Pdf => self.pdf.clone(),
            ReportFormat::Excel => self.excel.clone(),
            ReportFormat::Json => self.json.clone(),
        }
    }

    /// Renders on the current thread.
    #[instrument(skip(self, request), fields(kind = %request.kind()))]
    pub fn render_blocking(
        &self,
        format: ReportFormat,
        request: &ReportRequest,
    ) -> Result<RenderedDocument, ReportError> {
        let started = Instant::now();
        match self.renderer(format).render(request) {
            Ok(document) => {
                info!(
                    bytes = document.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Report rendered"
                );
                Ok(document)
            }
            Err(e) => {
                error!(error = %e, "Report rendering failed");
                Err(e)
            }
        }
    }

    /// Renders on the blocking pool and resolves once the document is complete.
    #[instrument(skip(self, request), fields(kind = %request.kind()))]
    pub async fn generate(
        &self,
        format: ReportFormat,
        request: ReportRequest,
    ) -> Result<RenderedDocument, ReportError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.render_blocking(format, &request))
            .await
            .map_err(|e| {
                error!(error = %e, "Report task did not complete");
                ReportError::Internal(format!("report task failed: {}", e))
            })?
    }

    /// Parses, validates and renders a raw JSON payload.
    pub async fn generate_from_json(
        &self,
        format: ReportFormat,
        payload: &[u8],
    ) -> Result<RenderedDocument, ReportError> {
        let request = ReportRequest::from_slice(payload).map_err(|e| {
            error!(error = %e, "Rejected report payload");
            e
        })?;
        self.generate(format, request).await
    }
}
