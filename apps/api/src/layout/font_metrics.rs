//! Static font-metric tables for the PDF standard (base-14) fonts the renderer uses.
//!
//! Widths are the AFM advance widths in 1/1000 em, so a string's rendered width in
//! points is `sum(widths) * font_size / 1000`. Because the renderer only ever draws
//! with these non-embedded standard fonts, the tables are exact for ASCII text.
//!
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32. Anything else falls back to `fallback_width`.

use serde::{Deserialize, Serialize};

use crate::layout::paginator::TextMeasurer;

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

/// The standard Type1 fonts available to the PDF renderer without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    Helvetica,
    HelveticaBold,
    TimesRoman,
    Courier,
}

impl FontFamily {
    /// The PostScript name written as `/BaseFont` in the PDF font dictionary.
    pub fn base_font(self) -> &'static str {
        match self {
            FontFamily::Helvetica => "Helvetica",
            FontFamily::HelveticaBold => "Helvetica-Bold",
            FontFamily::TimesRoman => "Times-Roman",
            FontFamily::Courier => "Courier",
        }
    }

    /// Bold companion used for the title line.
    pub fn bold(self) -> FontFamily {
        match self {
            FontFamily::Helvetica | FontFamily::HelveticaBold => FontFamily::HelveticaBold,
            // No bold tables for the serif/mono faces; the title stays in the body face.
            other => other,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static advance-width table for a font family.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [u16; 95],
    /// Width used for characters outside printable ASCII.
    pub fallback_width: u16,
}

impl FontMetricTable {
    /// Sum of advance widths in 1/1000 em.
    pub fn width_units(&self, s: &str) -> u32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    u32::from(self.widths[code - 32])
                } else {
                    u32::from(self.fallback_width)
                }
            })
            .sum()
    }

    /// Rendered width of `s` in points at `font_size`.
    pub fn measure_str(&self, s: &str, font_size: f32) -> f32 {
        self.width_units(s) as f32 * font_size / 1000.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    fallback_width: 556,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    fallback_width: 611,
};

static TIMES_ROMAN_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
        // 0    1    2    3    4    5    6    7    8    9
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        // :    ;    <    =    >    ?    @
        278, 278, 564, 564, 564, 444, 921,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 469, 500, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
        // {    |    }    ~
        480, 200, 480, 541,
    ],
    fallback_width: 500,
};

/// Courier is monospaced: every glyph is 600 units wide.
static COURIER_TABLE: FontMetricTable = FontMetricTable {
    widths: [600; 95],
    fallback_width: 600,
};

/// Returns the static metric table for a given font family.
pub fn get_metrics(font: FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Helvetica => &HELVETICA_TABLE,
        FontFamily::HelveticaBold => &HELVETICA_BOLD_TABLE,
        FontFamily::TimesRoman => &TIMES_ROMAN_TABLE,
        FontFamily::Courier => &COURIER_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Measurer backed by the static tables
// ────────────────────────────────────────────────────────────────────────────

/// The production `TextMeasurer`: measures with the same standard-font metrics the
/// PDF viewer will use to draw the text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFontMetrics;

impl TextMeasurer for StandardFontMetrics {
    fn measure(&self, text: &str, font: FontFamily, size: f32) -> f32 {
        get_metrics(font).measure_str(text, size)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
