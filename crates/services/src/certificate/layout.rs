//! Fixed certificate artwork as an SVG document.

use quick_xml::escape::escape;
use skillforge_core::certificate::{CERTIFICATE_HEIGHT, CERTIFICATE_WIDTH, CertificateDetails};

const SANS: &str = "'Segoe UI', Arial, sans-serif";
const SERIF: &str = "Georgia, serif";

const DETAIL_TOP: u32 = 510;
const DETAIL_STEP: u32 = 32;
const DIVIDER_HALF_WIDTH: u32 = 260;

#[derive(Clone, Copy)]
enum Anchor {
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

#[derive(Clone, Copy)]
struct TextStyle {
    family: &'static str,
    size: u32,
    weight: u32,
    fill: &'static str,
    anchor: Anchor,
}

impl TextStyle {
    const fn sans(size: u32, weight: u32, fill: &'static str) -> Self {
        Self {
            family: SANS,
            size,
            weight,
            fill,
            anchor: Anchor::Middle,
        }
    }

    const fn right(mut self) -> Self {
        self.anchor = Anchor::End;
        self
    }
}

const HEADING: TextStyle = TextStyle::sans(44, 700, "#21233e");
const CORNER: TextStyle = TextStyle::sans(17, 400, "#717885").right();
const PLATFORM: TextStyle = TextStyle::sans(30, 700, "#2e3ca6").right();
const SUBTITLE: TextStyle = TextStyle::sans(24, 400, "#475060");
const COURSE: TextStyle = TextStyle::sans(64, 700, "#0b2447");
const STUDENT: TextStyle = TextStyle::sans(52, 700, "#083c9e");
const DETAIL: TextStyle = TextStyle::sans(20, 400, "#334455");
const SENTENCE: TextStyle = TextStyle::sans(21, 400, "#42526b");
const DESCRIPTION: TextStyle = TextStyle::sans(19, 400, "#4c5377");
const FOOTER: TextStyle = TextStyle::sans(17, 400, "#8795a1");
const WATERMARK: TextStyle = TextStyle {
    family: SERIF,
    size: 320,
    weight: 700,
    fill: "#182243",
    anchor: Anchor::Middle,
};

fn text(out: &mut String, x: u32, y: u32, style: TextStyle, content: &str, opacity: Option<f32>) {
    let opacity = opacity.map_or_else(String::new, |o| format!(" fill-opacity=\"{o}\""));
    out.push_str(&format!(
        "<text x=\"{x}\" y=\"{y}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" \
         fill=\"{}\" text-anchor=\"{}\"{opacity}>{}</text>\n",
        style.family,
        style.size,
        style.weight,
        style.fill,
        style.anchor.as_str(),
        escape(content),
    ));
}

/// Render the certificate layout for `details` as a standalone SVG.
#[must_use]
pub fn certificate_svg(details: &CertificateDetails) -> String {
    let (w, h) = (CERTIFICATE_WIDTH, CERTIFICATE_HEIGHT);
    let center = w / 2;
    let mut out = String::with_capacity(4096);

    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n"
    ));
    out.push_str(
        "<defs><linearGradient id=\"bg\" x1=\"0\" y1=\"0\" x2=\"0\" y2=\"1\">\
         <stop offset=\"0\" stop-color=\"#f4f8fb\"/><stop offset=\"1\" stop-color=\"#e8ecef\"/>\
         </linearGradient></defs>\n",
    );
    out.push_str(&format!("<rect width=\"{w}\" height=\"{h}\" fill=\"url(#bg)\"/>\n"));
    out.push_str(&format!(
        "<rect x=\"32\" y=\"32\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"#d4af37\" stroke-width=\"16\"/>\n",
        w - 64,
        h - 64
    ));
    out.push_str(&format!(
        "<rect width=\"210\" height=\"{h}\" fill=\"#1e293b\" fill-opacity=\"0.08\"/>\n"
    ));

    // Watermark sits under every other text element.
    text(&mut out, center, h / 2 + 140, WATERMARK, &details.watermark(), Some(0.04));

    text(&mut out, center, 180, HEADING, "CERTIFICATE OF COMPLETION", None);
    if let Some(line) = details.certificate_id_line() {
        text(&mut out, w - 90, 55, CORNER, &line, None);
    }
    if let Some(line) = details.reference_line() {
        text(&mut out, w - 90, 85, CORNER, &line, None);
    }
    text(&mut out, w - 95, 145, PLATFORM, details.platform(), None);
    text(&mut out, center, 240, SUBTITLE, details.subtitle(), None);
    text(&mut out, center, 335, COURSE, details.course_title(), None);
    text(&mut out, center, 425, STUDENT, details.student_name(), None);

    out.push_str(&format!(
        "<line x1=\"{}\" y1=\"455\" x2=\"{}\" y2=\"455\" stroke=\"#b6c2e0\" stroke-width=\"2\"/>\n",
        center - DIVIDER_HALF_WIDTH,
        center + DIVIDER_HALF_WIDTH
    ));

    let mut y = DETAIL_TOP;
    for line in details.detail_lines() {
        text(&mut out, center, y, DETAIL, &line, None);
        y += DETAIL_STEP;
    }

    text(&mut out, center, 650, SENTENCE, &details.certifying_sentence(), None);
    if let Some(description) = details.description() {
        text(&mut out, center, 690, DESCRIPTION, description, None);
    }
    text(&mut out, center, h - 38, FOOTER, &details.footer_line(), None);

    out.push_str("</svg>\n");
    out
}
