use std::sync::Arc;

use crate::layout::{PageGeometry, TextMeasurer};
use crate::worksheet::source::WorksheetSource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable worksheet text source. Default: GeminiWorksheetSource.
    pub source: Arc<dyn WorksheetSource>,
    /// Width measurer for PDF layout. Default: StandardFontMetrics (built-in Type1 widths).
    pub measurer: Arc<dyn TextMeasurer>,
    /// Page size, margins and body font for PDF output. Validated at startup.
    pub page_geometry: PageGeometry,
}
