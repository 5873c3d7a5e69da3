//! PDF backend: draws a finished `LayoutResult` with pdf-writer.
//!
//! Every layout page becomes one PDF page. Each non-blank line is one text object
//! (`BT /F1 size Tf x y Td (…) Tj ET`) at the left margin and the line's baseline.
//! Fonts are the standard Type1 faces, referenced by name and never embedded, which
//! is what makes the static metric tables in `layout::font_metrics` exact.

use chrono::{Datelike, Timelike, Utc};
use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::{Content, Date, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::layout::paginator::PositionedLine;
use crate::layout::{LayoutResult, PageGeometry};
use crate::render::encoding::encode_win_ansi;

const BODY_FONT: Name<'static> = Name(b"F1");
const TITLE_FONT: Name<'static> = Name(b"F2");
const COMPRESSION_LEVEL: u8 = 6;

/// Encodes `layout` as a complete PDF file.
pub fn render_pdf(layout: &LayoutResult, geometry: &PageGeometry) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();
    let body_font_id = alloc();
    let title_font_id = alloc();

    let n = layout.pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    let body_font = geometry.font_family;
    let title_font = geometry.title_font();
    pdf.type1_font(body_font_id)
        .base_font(Name(body_font.base_font().as_bytes()))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(title_font_id)
        .base_font(Name(title_font.base_font().as_bytes()))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    let x = geometry.left_margin;
    for (i, page) in layout.pages.iter().enumerate() {
        let mut content = Content::new();
        if i == 0 {
            show_line(
                &mut content,
                TITLE_FONT,
                geometry.title_font_size(),
                x,
                &layout.title,
            );
        }
        for line in page.lines.iter().filter(|l| !l.is_blank()) {
            show_line(&mut content, BODY_FONT, geometry.font_size, x, line);
        }

        let raw = content.finish();
        let compressed = compress_to_vec_zlib(&raw, COMPRESSION_LEVEL);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for (page_id, content_id) in page_ids.iter().zip(content_ids.iter()) {
        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(
            0.0,
            0.0,
            geometry.page_width,
            geometry.page_height,
        ))
        .parent(pages_id)
        .contents(*content_id);

        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        fonts.pair(BODY_FONT, body_font_id);
        fonts.pair(TITLE_FONT, title_font_id);
        fonts.finish();
        resources.finish();
        page.finish();
    }

    write_info(&mut pdf, info_id, &layout.title.text);

    pdf.finish()
}

fn show_line(content: &mut Content, font: Name, size: f32, x: f32, line: &PositionedLine) {
    let bytes = encode_win_ansi(&line.text);
    content.begin_text();
    content.set_font(font, size);
    content.next_line(x, line.y);
    content.show(Str(&bytes));
    content.end_text();
}

fn write_info(pdf: &mut Pdf, id: Ref, title: &str) {
    let now = Utc::now();
    let date = Date::new(now.year() as u16)
        .month(now.month() as u8)
        .day(now.day() as u8)
        .hour(now.hour() as u8)
        .minute(now.minute() as u8)
        .second(now.second() as u8)
        .utc_offset_hour(0)
        .utc_offset_minute(0);

    let mut info = pdf.document_info(id);
    info.title(TextStr(title));
    info.producer(TextStr(concat!(
        env!("CARGO_PKG_NAME"),
        " v",
        env!("CARGO_PKG_VERSION")
    )));
    info.creation_date(date);
    info.finish();
}
