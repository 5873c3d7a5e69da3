// Rendering backend: turns a finished layout into a downloadable document.

pub mod encoding;
pub mod pdf;

pub use pdf::render_pdf;
