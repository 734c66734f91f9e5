//! Turning a rendered view into a positioned image of text lines.

use super::layout::{BlockStyle, RenderedView};
use super::pages::IMAGE_WIDTH_MM;
use crate::config::ExportConfig;
use crate::error::{Error, Result};

/// Millimetres per typographic point.
const MM_PER_PT: f32 = 0.3528;

/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// One line of text placed on the image.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterLine {
    /// Distance from the left edge, in mm.
    pub x_mm: f32,
    /// Baseline distance from the top edge, in mm.
    pub y_mm: f32,
    /// Font size in points.
    pub font_size: f32,
    /// Whether to use the bold face.
    pub bold: bool,
    /// The text.
    pub text: String,
}

/// A laid-out image of a view, measured in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    /// Image width.
    pub width_mm: f32,
    /// Image height.
    pub height_mm: f32,
    /// Lines from top to bottom.
    pub lines: Vec<RasterLine>,
}

/// Captures a rendered view as an image.
pub trait Rasterizer {
    /// Lay `view` out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Export`] if the view cannot be captured.
    fn rasterize(&self, view: &RenderedView) -> Result<Raster>;
}

/// Lays text out at a fixed line height, wrapping at a fixed column width.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRasterizer {
    font_size: f32,
    line_height_mm: f32,
    margin_mm: f32,
    width_mm: f32,
}

impl Default for TextRasterizer {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

impl TextRasterizer {
    /// Build from export settings.
    #[must_use]
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            font_size: config.font_size,
            line_height_mm: config.line_height_mm,
            margin_mm: config.margin_mm,
            width_mm: IMAGE_WIDTH_MM,
        }
    }

    /// How many characters of `style` fit on one line.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn columns(&self, style: BlockStyle) -> usize {
        let usable = self.width_mm - 2.0 * self.margin_mm;
        let glyph = self.font_size * style.scale() * AVG_GLYPH_WIDTH * MM_PER_PT;
        if usable <= 0.0 || glyph <= 0.0 {
            return 0;
        }
        (usable / glyph).floor() as usize
    }
}

impl Rasterizer for TextRasterizer {
    fn rasterize(&self, view: &RenderedView) -> Result<Raster> {
        if self.font_size <= 0.0 || self.line_height_mm <= 0.0 {
            return Err(Error::export("font size and line height must be positive"));
        }

        let mut lines = Vec::new();
        let mut y = self.margin_mm;

        for block in &view.blocks {
            let columns = self.columns(block.style);
            if columns == 0 {
                return Err(Error::export("page margins leave no room for text"));
            }
            let advance = self.line_height_mm * block.style.scale();
            if block.style == BlockStyle::Heading || block.style == BlockStyle::Footer {
                y += self.line_height_mm / 2.0;
            }
            for text in wrap(&block.text, columns) {
                y += advance;
                lines.push(RasterLine {
                    x_mm: self.margin_mm,
                    y_mm: y,
                    font_size: self.font_size * block.style.scale(),
                    bold: block.style.is_bold(),
                    text,
                });
            }
        }

        Ok(Raster {
            width_mm: self.width_mm,
            height_mm: y + self.margin_mm,
            lines,
        })
    }
}

/// Greedy word wrap. Words longer than a line are split. Empty text still
/// yields one empty line.
#[must_use]
pub fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        while chars.len() > columns {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = chars.split_off(columns);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }

        let len = chars.len();
        if current_len > 0 && current_len + 1 + len > columns {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars);
        current_len += len;
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}
