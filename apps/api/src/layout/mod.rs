// Text layout: page geometry, standard-font metrics, and the greedy paginator.
// Pure and synchronous; callers on the async runtime run it inside spawn_blocking.

pub mod font_metrics;
pub mod geometry;
pub mod paginator;

// Re-export the public API consumed by the handlers and the renderer.
pub use font_metrics::{FontFamily, StandardFontMetrics};
pub use geometry::{default_page_geometry, PageGeometry};
pub use paginator::{LayoutError, LayoutResult, Paginator, TextMeasurer};
