use std::sync::Arc;

use sqlx::PgPool;

use crate::reports::synthesizer::ReportSynthesizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable report synthesizer. Production: `LlmReportSynthesizer`.
    pub synthesizer: Arc<dyn ReportSynthesizer>,
}
