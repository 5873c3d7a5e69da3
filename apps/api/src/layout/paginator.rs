//! Greedy paginator: wraps a block of text into lines and flows the lines onto pages.
//!
//! # Algorithm
//! One left-to-right, top-to-bottom pass with no backtracking:
//! - Each input line is a paragraph; words are split on whitespace.
//! - Words accumulate into a line buffer while `measure(buffer + " " + word) < usable_width`.
//!   The comparison is strict, so a line that exactly fills the width is wrapped.
//! - A word wider than the usable width is emitted alone and overflows; words are never
//!   hyphenated or split.
//! - Before a line is written, a cursor below the bottom margin starts a new page, so the
//!   line that triggers the break opens the next page.
//! - A blank paragraph advances the cursor by one slot and never breaks a page itself.
//!
//! The first page reserves its top slot for the title.
//!
//! Layout is separate from rendering: the result is plain data that any backend can draw.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::layout::FontFamily;
use crate::layout::geometry::{default_page_geometry, PageGeometry};

// ────────────────────────────────────────────────────────────────────────────
// Capabilities and errors
// ────────────────────────────────────────────────────────────────────────────

/// Width of `text` set in `font` at `size`, in the same units as `PageGeometry`.
///
/// Supplied by the rendering backend. Any `Fn(&str, FontFamily, f32) -> f32` closure
/// is a measurer, which keeps tests free of real font metrics.
pub trait TextMeasurer: Send + Sync {
    fn measure(&self, text: &str, font: FontFamily, size: f32) -> f32;
}

impl<F> TextMeasurer for F
where
    F: Fn(&str, FontFamily, f32) -> f32 + Send + Sync,
{
    fn measure(&self, text: &str, font: FontFamily, size: f32) -> f32 {
        self(text, font, size)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),

    #[error("No text measurer supplied to the paginator")]
    MissingMeasurer,
}

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// A single line of text and the baseline it is drawn on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedLine {
    pub text: String,
    /// Baseline in PDF coordinates (origin bottom-left).
    pub y: f32,
}

impl PositionedLine {
    /// Blank slots hold vertical space from empty source lines; nothing is drawn.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Body lines belonging to one page, top to bottom. Frozen once the page is finalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub lines: Vec<PositionedLine>,
}

/// Complete layout: at least one page, and a title drawn on the first page only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    pub title: PositionedLine,
    pub pages: Vec<Page>,
    /// The title, set in the title face and size, is at least as wide as the usable width.
    pub title_overflows: bool,
}

impl LayoutResult {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All body lines in reading order, across pages.
    pub fn lines(&self) -> impl Iterator<Item = &PositionedLine> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Paginator
// ────────────────────────────────────────────────────────────────────────────

/// A validated geometry paired with the measurer it lays text out with.
///
/// Construct through [`Paginator::builder`]; `build` is the only place that can fail,
/// so `paginate` itself is total.
#[derive(Clone)]
pub struct Paginator {
    geometry: PageGeometry,
    measurer: Arc<dyn TextMeasurer>,
}

pub struct PaginatorBuilder {
    geometry: PageGeometry,
    measurer: Option<Arc<dyn TextMeasurer>>,
}

impl Default for PaginatorBuilder {
    fn default() -> Self {
        Self {
            geometry: default_page_geometry(),
            measurer: None,
        }
    }
}

impl PaginatorBuilder {
    pub fn geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.measurer = Some(measurer);
        self
    }

    pub fn build(self) -> Result<Paginator, LayoutError> {
        self.geometry.validate()?;
        let measurer = self.measurer.ok_or(LayoutError::MissingMeasurer)?;
        Ok(Paginator {
            geometry: self.geometry,
            measurer,
        })
    }
}

impl Paginator {
    pub fn builder() -> PaginatorBuilder {
        PaginatorBuilder::default()
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Lays `text` out under `title`. Always returns at least one page.
    pub fn paginate(&self, title: &str, text: &str) -> LayoutResult {
        let usable_width = self.geometry.usable_width();
        let mut cursor = PageCursor::new(&self.geometry);

        let title_overflows = self.title_overflows(title, usable_width);
        let title = cursor.place_title(title);

        for paragraph in text.lines() {
            let mut buffer = String::new();

            for word in paragraph.split_whitespace() {
                if buffer.is_empty() {
                    if !self.fits(word, usable_width) {
                        debug!(word, usable_width, "word wider than usable width, overflowing");
                    }
                    buffer.push_str(word);
                    continue;
                }

                let tentative = format!("{buffer} {word}");
                if self.fits(&tentative, usable_width) {
                    buffer = tentative;
                } else {
                    let completed = std::mem::replace(&mut buffer, word.to_string());
                    if !self.fits(word, usable_width) {
                        debug!(word, usable_width, "word wider than usable width, overflowing");
                    }
                    cursor.write_line(completed);
                }
            }

            if buffer.is_empty() {
                cursor.skip_blank();
            } else {
                cursor.write_line(buffer);
            }
        }

        cursor.finish(title, title_overflows)
    }

    /// The title is a single slot and is never wrapped; an over-wide one is reported only.
    fn title_overflows(&self, title: &str, usable_width: f32) -> bool {
        let title_width = self.measurer.measure(
            title,
            self.geometry.title_font(),
            self.geometry.title_font_size(),
        );
        let overflows = title_width >= usable_width;
        if overflows {
            debug!(
                title,
                title_width,
                usable_width,
                "title wider than usable width, overflowing"
            );
        }
        overflows
    }

    fn fits(&self, line: &str, usable_width: f32) -> bool {
        let width = self
            .measurer
            .measure(line, self.geometry.font_family, self.geometry.font_size);
        width < usable_width
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cursor state (local to one paginate call)
// ────────────────────────────────────────────────────────────────────────────

struct PageCursor<'g> {
    geometry: &'g PageGeometry,
    /// Baseline of the next slot on the current page.
    y: f32,
    current: Vec<PositionedLine>,
    finished: Vec<Page>,
}

impl<'g> PageCursor<'g> {
    fn new(geometry: &'g PageGeometry) -> Self {
        Self {
            geometry,
            y: geometry.top_baseline(),
            current: Vec::new(),
            finished: Vec::new(),
        }
    }

    /// Consumes the first slot of the first page.
    fn place_title(&mut self, title: &str) -> PositionedLine {
        let line = PositionedLine {
            text: title.to_string(),
            y: self.y,
        };
        self.y -= self.geometry.line_height;
        line
    }

    fn page_full(&self) -> bool {
        self.y < self.geometry.bottom_margin
    }

    fn write_line(&mut self, text: String) {
        if self.page_full() {
            self.break_page();
        }
        self.current.push(PositionedLine { text, y: self.y });
        self.y -= self.geometry.line_height;
    }

    /// A blank slot inside the usable area is kept; one past the bottom margin is
    /// swallowed by the page break the next written line will trigger.
    fn skip_blank(&mut self) {
        if !self.page_full() {
            self.current.push(PositionedLine {
                text: String::new(),
                y: self.y,
            });
        }
        self.y -= self.geometry.line_height;
    }

    fn break_page(&mut self) {
        let lines = std::mem::take(&mut self.current);
        self.finished.push(Page { lines });
        self.y = self.geometry.top_baseline();
    }

    fn finish(mut self, title: PositionedLine, title_overflows: bool) -> LayoutResult {
        let lines = std::mem::take(&mut self.current);
        self.finished.push(Page { lines });
        LayoutResult {
            title,
            pages: self.finished,
            title_overflows,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::StandardFontMetrics;

    /// Each word is 10 units wide and each separating space 2 units:
    /// a line of n words measures `10n + 2(n - 1)`.
    fn word_count_measurer() -> Arc<dyn TextMeasurer> {
        Arc::new(|text: &str, _font: FontFamily, _size: f32| {
            let words = text.split_whitespace().count() as f32;
            if words == 0.0 {
                0.0
            } else {
                10.0 * words + 2.0 * (words - 1.0)
            }
        })
    }

    /// One unit per character, spaces included.
    fn char_measurer() -> Arc<dyn TextMeasurer> {
        Arc::new(|text: &str, _font: FontFamily, _size: f32| text.chars().count() as f32)
    }

    /// 120pt tall page with 20pt margins and 20pt lines: title + 4 body slots.
    fn small_geometry(usable_width: f32) -> PageGeometry {
        PageGeometry {
            page_width: usable_width + 20.0,
            page_height: 120.0,
            left_margin: 10.0,
            right_margin: 10.0,
            top_margin: 20.0,
            bottom_margin: 20.0,
            line_height: 20.0,
            font_size: 10.0,
            font_family: FontFamily::Helvetica,
        }
    }

    fn paginator(geometry: PageGeometry, measurer: Arc<dyn TextMeasurer>) -> Paginator {
        Paginator::builder()
            .geometry(geometry)
            .measurer(measurer)
            .build()
            .unwrap()
    }

    fn texts(page: &Page) -> Vec<&str> {
        page.lines.iter().map(|l| l.text.as_str()).collect()
    }

    // ── construction ────────────────────────────────────────────────────────

    #[test]
    fn test_build_without_measurer_fails() {
        let result = Paginator::builder()
            .geometry(default_page_geometry())
            .build();
        assert!(matches!(result, Err(LayoutError::MissingMeasurer)));
    }

    #[test]
    fn test_build_with_invalid_geometry_fails_before_measurer_check() {
        let geometry = PageGeometry {
            page_height: 30.0,
            top_margin: 20.0,
            bottom_margin: 20.0,
            ..default_page_geometry()
        };
        let result = Paginator::builder().geometry(geometry).build();
        assert!(matches!(result, Err(LayoutError::InvalidGeometry(_))));
    }

    #[test]
    fn test_builder_defaults_to_letter_geometry() {
        let p = Paginator::builder()
            .measurer(Arc::new(StandardFontMetrics))
            .build()
            .unwrap();
        assert_eq!(p.geometry(), &default_page_geometry());
    }

    // ── width (greedy wrap) ─────────────────────────────────────────────────

    #[test]
    fn test_eight_words_wrap_after_five() {
        // 5 words = 58 < 60 fits; 6 words = 70 does not.
        let p = paginator(small_geometry(60.0), word_count_measurer());
        let result = p.paginate("Title", "a b c d e f g h");
        assert_eq!(result.page_count(), 1);
        assert_eq!(texts(&result.pages[0]), vec!["a b c d e", "f g h"]);
    }

    #[test]
    fn test_exact_fit_is_wrapped() {
        // 5 words measure exactly 58: strict `<` rejects the fifth word.
        let p = paginator(small_geometry(58.0), word_count_measurer());
        let result = p.paginate("Title", "a b c d e");
        assert_eq!(texts(&result.pages[0]), vec!["a b c d", "e"]);
    }

    #[test]
    fn test_oversized_word_emitted_alone() {
        let p = paginator(small_geometry(10.0), char_measurer());
        let result = p.paginate("T", "ab supercalifragilistic cd");
        assert_eq!(
            texts(&result.pages[0]),
            vec!["ab", "supercalifragilistic", "cd"]
        );
    }

    #[test]
    fn test_oversized_first_word_is_not_preceded_by_empty_line() {
        let p = paginator(small_geometry(5.0), char_measurer());
        let result = p.paginate("T", "enormous ab");
        assert_eq!(texts(&result.pages[0]), vec!["enormous", "ab"]);
    }

    #[test]
    fn test_every_line_within_width_unless_single_word() {
        let measurer = char_measurer();
        let p = paginator(small_geometry(24.0), measurer.clone());
        let text = "The quick brown fox jumps over the lazy dog while an extraordinarily \
                    long antidisestablishmentarianism word sits in the middle of it all";
        let result = p.paginate("T", text);
        for line in result.lines() {
            let width = measurer.measure(&line.text, FontFamily::Helvetica, 10.0);
            let single_word = line.text.split_whitespace().count() == 1;
            assert!(
                width < 24.0 || single_word,
                "line {:?} is {width} wide",
                line.text
            );
        }
    }

    #[test]
    fn test_words_preserved_in_order() {
        let p = paginator(small_geometry(30.0), char_measurer());
        let text = "Question one: what is 1/2 + 1/4?\n\n  a) 3/4   b) 1/2\n\tc) 2/4 d) 1\n";
        let result = p.paginate("T", text);
        let emitted: Vec<&str> = result
            .lines()
            .flat_map(|l| l.text.split(' '))
            .filter(|w| !w.is_empty())
            .collect();
        let original: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(emitted, original);
    }

    #[test]
    fn test_whitespace_runs_collapse_to_single_space() {
        let p = paginator(small_geometry(100.0), char_measurer());
        let result = p.paginate("T", "  a \t  b   c  ");
        assert_eq!(texts(&result.pages[0]), vec!["a b c"]);
    }

    // ── height (page breaks) ────────────────────────────────────────────────

    #[test]
    fn test_six_body_lines_make_two_pages() {
        let p = paginator(small_geometry(100.0), char_measurer());
        let result = p.paginate("Fractions - Grade 5", "l1\nl2\nl3\nl4\nl5\nl6");

        assert_eq!(result.page_count(), 2);
        assert_eq!(result.title.text, "Fractions - Grade 5");
        assert_eq!(result.title.y, 100.0);
        assert_eq!(texts(&result.pages[0]), vec!["l1", "l2", "l3", "l4"]);
        assert_eq!(texts(&result.pages[1]), vec!["l5", "l6"]);

        let ys: Vec<f32> = result.pages[0].lines.iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![80.0, 60.0, 40.0, 20.0]);
        // The triggering line opens the new page at the top baseline.
        assert_eq!(result.pages[1].lines[0].y, 100.0);
        assert_eq!(result.pages[1].lines[1].y, 80.0);
    }

    #[test]
    fn test_later_pages_hold_five_slots() {
        // Page 1: title + 4, page 2: 5, page 3: remainder.
        let text: Vec<String> = (1..=12).map(|i| format!("line{i}")).collect();
        let p = paginator(small_geometry(100.0), char_measurer());
        let result = p.paginate("T", &text.join("\n"));
        let counts: Vec<usize> = result.pages.iter().map(|pg| pg.lines.len()).collect();
        assert_eq!(counts, vec![4, 5, 3]);
    }

    #[test]
    fn test_page_height_bound_holds() {
        let geometry = small_geometry(40.0);
        let text = "word ".repeat(200);
        let p = paginator(geometry.clone(), char_measurer());
        let result = p.paginate("T", &text);
        let limit = geometry.usable_height() + geometry.line_height;
        for (i, page) in result.pages.iter().enumerate() {
            let slots = page.lines.len() + usize::from(i == 0);
            assert!(
                slots as f32 * geometry.line_height <= limit,
                "page {i} holds {slots} slots"
            );
            for line in &page.lines {
                assert!(line.y >= geometry.bottom_margin);
            }
        }
    }

    #[test]
    fn test_only_one_slot_per_page_still_terminates() {
        // Usable height (10) is less than one line: every body line gets its own page.
        let geometry = PageGeometry {
            page_height: 50.0,
            top_margin: 20.0,
            bottom_margin: 20.0,
            ..small_geometry(100.0)
        };
        let p = paginator(geometry, char_measurer());
        let result = p.paginate("T", "a\nb\nc");
        assert_eq!(result.page_count(), 4);
        assert!(result.pages[0].lines.is_empty());
        assert_eq!(texts(&result.pages[3]), vec!["c"]);
    }

    // ── title and empty input ───────────────────────────────────────────────

    #[test]
    fn test_empty_document_yields_single_title_page() {
        let p = paginator(small_geometry(100.0), char_measurer());
        let result = p.paginate("Fractions - Grade 5", "");
        assert_eq!(result.page_count(), 1);
        assert!(result.pages[0].lines.is_empty());
        assert_eq!(result.title.text, "Fractions - Grade 5");
    }

    #[test]
    fn test_all_blank_document_is_one_page() {
        let p = paginator(small_geometry(100.0), char_measurer());
        let result = p.paginate("T", "\n\n\n\n\n\n\n\n\n\n");
        assert_eq!(result.page_count(), 1);
        assert!(result.lines().all(|l| l.is_blank()));
        assert_eq!(result.pages[0].lines.len(), 4);
    }

    #[test]
    fn test_title_not_repeated_on_later_pages() {
        let p = paginator(small_geometry(100.0), char_measurer());
        let result = p.paginate("Unique Title", "1\n2\n3\n4\n5\n6\n7\n8\n9\n10");
        assert!(result.page_count() > 1);
        assert!(result.lines().all(|l| l.text != "Unique Title"));
    }

    // ── blank lines ─────────────────────────────────────────────────────────

    #[test]
    fn test_consecutive_blank_lines_preserved() {
        let p = paginator(small_geometry(100.0), char_measurer());
        let result = p.paginate("T", "a\n\n\nb");
        let page = &result.pages[0];
        assert_eq!(texts(page), vec!["a", "", "", "b"]);
        assert!(page.lines[1].is_blank() && page.lines[2].is_blank());
        assert_eq!(page.lines[1].y - page.lines[2].y, 20.0);
    }

    #[test]
    fn test_blank_line_does_not_break_page() {
        // Four body lines fill page 1; the blank slot falls past the bottom margin.
        let p = paginator(small_geometry(100.0), char_measurer());
        let result = p.paginate("T", "1\n2\n3\n4\n");
        assert_eq!(result.page_count(), 1);

        let result = p.paginate("T", "1\n2\n3\n4\n\n");
        assert_eq!(result.page_count(), 1, "trailing blank must not open a page");

        let result = p.paginate("T", "1\n2\n3\n4\n\n5");
        assert_eq!(result.page_count(), 2);
        assert_eq!(texts(&result.pages[1]), vec!["5"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let p = paginator(small_geometry(100.0), char_measurer());
        let result = p.paginate("T", "a\r\n\r\nb\r\n");
        assert_eq!(texts(&result.pages[0]), vec!["a", "", "b"]);
    }

    // ── real metrics ────────────────────────────────────────────────────────

    #[test]
    fn test_long_worksheet_with_standard_metrics() {
        let measurer: Arc<dyn TextMeasurer> = Arc::new(StandardFontMetrics);
        let geometry = default_page_geometry();
        let p = paginator(geometry.clone(), measurer.clone());
        let question = "### 1. Multiple Choice Question: **What is one half plus one quarter \
                        when both fractions are written with a common denominator?**";
        let text = vec![question; 80].join("\n\n");
        let result = p.paginate("Worksheet: Fractions (Grade 5)", &text);

        assert!(result.page_count() > 1);
        for line in result.lines().filter(|l| !l.is_blank()) {
            let width = measurer.measure(&line.text, geometry.font_family, geometry.font_size);
            assert!(width < geometry.usable_width());
            assert!(line.y >= geometry.bottom_margin);
        }
    }

    #[test]
    fn test_paginate_is_repeatable() {
        let p = paginator(small_geometry(30.0), char_measurer());
        let text = "same input gives the same pages every time it is laid out";
        assert_eq!(p.paginate("T", text), p.paginate("T", text));
    }

    #[test]
    fn test_title_measured_in_title_face() {
        // Only the bold face at the title size is wide; body text always fits.
        let measurer: Arc<dyn TextMeasurer> = Arc::new(|text: &str, font: FontFamily, size: f32| {
            if font == FontFamily::HelveticaBold && size == 13.0 {
                text.chars().count() as f32 * 10.0
            } else {
                1.0
            }
        });
        let paginator = paginator(small_geometry(100.0), measurer);

        let long = paginator.paginate("A very long worksheet title", "body");
        assert!(long.title_overflows);
        assert_eq!(long.title.text, "A very long worksheet title");
        assert_eq!(long.page_count(), 1);

        let short = paginator.paginate("Short", "body");
        assert!(!short.title_overflows);
    }

    #[test]
    fn test_title_fitting_under_standard_metrics() {
        let geometry = crate::layout::default_page_geometry();
        let paginator = paginator(geometry, Arc::new(StandardFontMetrics));
        let result = paginator.paginate("Worksheet: Fractions (Grade 5)", "");
        assert!(!result.title_overflows);

        let topic = "Photosynthesis ".repeat(20);
        let result = paginator.paginate(&format!("Worksheet: {topic} (Grade 7)"), "");
        assert!(result.title_overflows);
    }
}
