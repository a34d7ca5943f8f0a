use std::sync::{Arc, OnceLock};

use resvg::usvg;
use resvg::usvg::fontdb;
use skillforge_core::certificate::{CERTIFICATE_HEIGHT, CERTIFICATE_WIDTH};

use crate::error::CertificateError;

/// System fonts, loaded once per process.
fn font_database() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    Arc::clone(FONTS.get_or_init(|| {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        Arc::new(db)
    }))
}

/// Rasterize a certificate SVG into PNG bytes at the fixed certificate size.
///
/// # Errors
///
/// Returns `CertificateError::Render` if the SVG cannot be parsed, the pixmap
/// cannot be allocated or encoding fails.
pub fn render_png(svg: &str) -> Result<Vec<u8>, CertificateError> {
    let mut options = usvg::Options::default();
    options.fontdb = font_database();
    let tree = usvg::Tree::from_data(svg.as_bytes(), &options)
        .map_err(|e| CertificateError::Render(e.to_string()))?;

    let mut pixmap = tiny_skia::Pixmap::new(CERTIFICATE_WIDTH, CERTIFICATE_HEIGHT)
        .ok_or_else(|| CertificateError::Render("failed to allocate certificate pixmap".into()))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| CertificateError::Render(e.to_string()))
}
