//! Splitting a tall image across A4 pages.

/// A4 page width in mm.
pub const A4_WIDTH_MM: f32 = 210.0;

/// A4 page height in mm.
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Width the image is scaled to on the page.
pub const IMAGE_WIDTH_MM: f32 = 210.0;

/// Height of image consumed by each page.
pub const PAGE_HEIGHT_MM: f32 = 295.0;

/// Vertical image offsets, one per page.
///
/// The first page shows the image at offset 0. Every further page shows it
/// shifted up so the next `page_height` slice is visible, until no image is
/// left. An image exactly one page tall yields a single page.
#[must_use]
pub fn tile(image_height: f32, page_height: f32) -> Vec<f32> {
    let mut offsets = vec![0.0];
    if page_height <= 0.0 {
        return offsets;
    }

    let mut remaining = image_height - page_height;
    while remaining > 0.0 {
        offsets.push(remaining - image_height);
        remaining -= page_height;
    }
    offsets
}
