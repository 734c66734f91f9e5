//! Export of a meeting record to a paginated PDF.
//!
//! The pipeline is: find the rendered view by element id, rasterize it,
//! tile the image over A4 pages, then write the document. Export only reads
//! the record; nothing here touches storage.

pub mod layout;
pub mod pages;
pub mod pdf;
pub mod raster;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use crate::dates;
use crate::error::{Error, Result};
use crate::meeting::MeetingRecord;

pub use layout::{render_view, RenderedView, ViewRegistry, DEFAULT_ELEMENT_ID};
pub use raster::{Raster, Rasterizer, TextRasterizer};

/// Title as used in file names: whitespace runs become `-`, then lowercase.
///
/// # Panics
///
/// Panics if the built-in whitespace pattern is invalid, which the tests rule
/// out.
#[must_use]
pub fn slugify(title: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("Invalid whitespace pattern"));
    re.replace_all(title, "-").to_lowercase()
}

/// File name for the exported minutes of `record`.
#[must_use]
pub fn export_filename(record: &MeetingRecord) -> String {
    format!(
        "ata-reuniao-{}-{}.pdf",
        slugify(&record.title),
        dates::format_iso_date(&record.date)
    )
}

/// Writes rendered views of meetings to PDF files.
#[derive(Debug)]
pub struct Exporter<R = TextRasterizer> {
    rasterizer: R,
    views: ViewRegistry,
}

impl<R: Rasterizer> Exporter<R> {
    /// Create an exporter with no registered views.
    pub fn new(rasterizer: R) -> Self {
        Self {
            rasterizer,
            views: ViewRegistry::new(),
        }
    }

    /// Register a rendered view, returning its element id.
    pub fn register(&mut self, view: RenderedView) -> String {
        self.views.insert(view)
    }

    /// The registered views.
    pub fn views(&self) -> &ViewRegistry {
        &self.views
    }

    /// Export the view registered as `element_id` for `record` into
    /// `out_dir`, returning the written path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Export`] if the view is not registered or the
    /// document cannot be produced.
    pub fn export(
        &self,
        record: &MeetingRecord,
        element_id: &str,
        out_dir: &Path,
    ) -> Result<PathBuf> {
        let view = self
            .views
            .get(element_id)
            .ok_or_else(|| Error::export(format!("element not found: {element_id}")))?;

        let raster = self.rasterizer.rasterize(view).map_err(into_export)?;
        let offsets = pages::tile(raster.height_mm, pages::PAGE_HEIGHT_MM);

        let path = out_dir.join(export_filename(record));
        pdf::write_pdf(&raster, &offsets, &record.title, &path)?;

        info!(
            id = %record.id,
            path = %path.display(),
            pages = offsets.len(),
            "Exported meeting to PDF"
        );
        Ok(path)
    }
}

impl Default for Exporter<TextRasterizer> {
    fn default() -> Self {
        Self::new(TextRasterizer::default())
    }
}

fn into_export(err: Error) -> Error {
    match err {
        Error::Export { .. } => err,
        other => Error::export(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(title: &str) -> MeetingRecord {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        MeetingRecord::new(title, date, "09:00", date)
    }

    struct FailingRasterizer;

    impl Rasterizer for FailingRasterizer {
        fn rasterize(&self, _view: &RenderedView) -> Result<Raster> {
            Err(Error::Decode("canvas unavailable".to_string()))
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Sprint  Planning Q3"), "sprint-planning-q3");
        assert_eq!(slugify(" Reunião\tGeral "), "-reunião-geral-");
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename(&record("Sprint Planning")),
            "ata-reuniao-sprint-planning-2024-05-01.pdf"
        );
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let record = record("Sprint Planning");
        let mut exporter = Exporter::default();
        let id = exporter.register(render_view(&record, Utc::now()));

        let path = exporter.export(&record, &id, dir.path()).unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("ata-reuniao-sprint-planning-2024-05-01.pdf")
        );
        assert!(path.exists());
    }

    #[test]
    fn test_missing_element() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::default();
        let err = exporter
            .export(&record("A"), "nowhere", dir.path())
            .unwrap_err();
        assert!(err.to_string().contains("element not found"));
    }

    #[test]
    fn test_rasterizer_failure_becomes_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let record = record("A");
        let mut exporter = Exporter::new(FailingRasterizer);
        let id = exporter.register(render_view(&record, Utc::now()));

        let err = exporter.export(&record, &id, dir.path()).unwrap_err();
        assert!(matches!(err, Error::Export { .. }));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
