//! PDF output.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{BuiltinFont, Mm, PdfDocument};
use tracing::debug;

use super::pages::{A4_HEIGHT_MM, A4_WIDTH_MM};
use super::raster::Raster;
use crate::error::{Error, Result};

const LAYER_NAME: &str = "Conteúdo";

/// Write `raster` to an A4 PDF at `path`, one page per offset.
///
/// Each page draws the whole raster shifted vertically by its offset; lines
/// falling outside the page are left out.
///
/// # Errors
///
/// Returns [`Error::Export`] if the document cannot be built or written.
pub fn write_pdf(raster: &Raster, offsets: &[f32], title: &str, path: &Path) -> Result<()> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), LAYER_NAME);
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::export(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| Error::export(e.to_string()))?;

    for (index, offset) in offsets.iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), LAYER_NAME)
        };
        let layer = doc.get_page(page).get_layer(layer);

        let mut drawn = 0usize;
        for line in &raster.lines {
            let top = line.y_mm + offset;
            if top <= 0.0 || top > A4_HEIGHT_MM {
                continue;
            }
            let font = if line.bold { &bold } else { &regular };
            layer.use_text(
                line.text.clone(),
                line.font_size,
                Mm(line.x_mm),
                Mm(A4_HEIGHT_MM - top),
                font,
            );
            drawn += 1;
        }
        debug!(page = index + 1, offset, lines = drawn, "Rendered PDF page");
    }

    let file = File::create(path)
        .map_err(|e| Error::export(format!("cannot create {}: {e}", path.display())))?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| Error::export(e.to_string()))?;
    Ok(())
}
