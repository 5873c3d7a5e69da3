//! Page geometry: the fixed page size, margins and type settings a layout runs against.
//!
//! All lengths are PDF points (1/72 in). Vertical positions follow PDF conventions:
//! the origin is the bottom-left corner and `y` grows upwards.

use serde::{Deserialize, Serialize};

use crate::layout::FontFamily;
use crate::layout::paginator::LayoutError;

/// The title is set this many points larger than the body text.
const TITLE_SIZE_BUMP: f32 = 3.0;

/// Immutable page configuration for one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub left_margin: f32,
    /// Space kept clear on the right; text never wraps into it.
    pub right_margin: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    /// Vertical advance between consecutive baselines.
    pub line_height: f32,
    pub font_size: f32,
    pub font_family: FontFamily,
}

/// US Letter (8.5" × 11"), 1" margins, Helvetica 11pt on a 14pt line.
pub fn default_page_geometry() -> PageGeometry {
    PageGeometry {
        page_width: 612.0,
        page_height: 792.0,
        left_margin: 72.0,
        right_margin: 72.0,
        top_margin: 72.0,
        bottom_margin: 72.0,
        line_height: 14.0,
        font_size: 11.0,
        font_family: FontFamily::Helvetica,
    }
}

impl PageGeometry {
    /// Horizontal space available for text.
    pub fn usable_width(&self) -> f32 {
        self.page_width - self.left_margin - self.right_margin
    }

    /// Vertical space between the top and bottom margins.
    pub fn usable_height(&self) -> f32 {
        self.page_height - self.top_margin - self.bottom_margin
    }

    /// Bold companion of the body face, used for the title line.
    pub fn title_font(&self) -> FontFamily {
        self.font_family.bold()
    }

    pub fn title_font_size(&self) -> f32 {
        self.font_size + TITLE_SIZE_BUMP
    }

    /// Baseline of the first line on every page.
    pub fn top_baseline(&self) -> f32 {
        self.page_height - self.top_margin
    }

    /// Rejects geometry that leaves no room for content or would stall the cursor.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let fields = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("left_margin", self.left_margin),
            ("right_margin", self.right_margin),
            ("top_margin", self.top_margin),
            ("bottom_margin", self.bottom_margin),
            ("line_height", self.line_height),
            ("font_size", self.font_size),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(LayoutError::InvalidGeometry(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        let margins = [
            ("left_margin", self.left_margin),
            ("right_margin", self.right_margin),
            ("top_margin", self.top_margin),
            ("bottom_margin", self.bottom_margin),
        ];
        if let Some((name, value)) = margins.iter().find(|(_, v)| *v < 0.0) {
            return Err(LayoutError::InvalidGeometry(format!(
                "{name} must not be negative, got {value}"
            )));
        }

        if self.usable_width() <= 0.0 {
            return Err(LayoutError::InvalidGeometry(format!(
                "page_width {} leaves no usable width after margins {} + {}",
                self.page_width, self.left_margin, self.right_margin
            )));
        }
        if self.usable_height() <= 0.0 {
            return Err(LayoutError::InvalidGeometry(format!(
                "page_height {} leaves no usable height after margins {} + {}",
                self.page_height, self.top_margin, self.bottom_margin
            )));
        }
        if self.line_height <= 0.0 {
            return Err(LayoutError::InvalidGeometry(format!(
                "line_height must be positive, got {}",
                self.line_height
            )));
        }
        if self.font_size <= 0.0 {
            return Err(LayoutError::InvalidGeometry(format!(
                "font_size must be positive, got {}",
                self.font_size
            )));
        }
        Ok(())
    }
}
