//! Dashboard Export Module
//! Writes the three charts as PNG files plus a JSON summary into a directory.
//!
//! Charts are rendered in parallel; a chart with nothing to draw is skipped.

use crate::charts::{ChartData, ChartKind, RenderError, StaticChartRenderer};
use crate::stats::DashboardSummary;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to render {kind:?}: {source}")]
    Render {
        kind: ChartKind,
        #[source]
        source: RenderError,
    },
    #[error("Failed to write summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// Files produced by one export.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub directory: PathBuf,
    pub charts: Vec<PathBuf>,
    pub skipped: Vec<ChartKind>,
    pub summary: PathBuf,
}

/// Export charts and summary into `directory`, creating it if needed.
pub fn export_dashboard(
    summary: &DashboardSummary,
    chart_data: &ChartData,
    directory: &Path,
    size: (u32, u32),
) -> Result<ExportReport, ExportError> {
    fs::create_dir_all(directory)?;
    info!(directory = %directory.display(), "Exporting dashboard");

    let results: Vec<(ChartKind, Result<PathBuf, RenderError>)> = ChartKind::ALL
        .par_iter()
        .map(|&kind| {
            let path = directory.join(kind.file_name());
            let result = StaticChartRenderer::render_to_file(kind, chart_data, &path, size)
                .map(|()| path);
            (kind, result)
        })
        .collect();

    let mut report = ExportReport {
        directory: directory.to_path_buf(),
        ..Default::default()
    };

    for (kind, result) in results {
        match result {
            Ok(path) => report.charts.push(path),
            Err(RenderError::Empty(_)) => {
                warn!(?kind, "Chart has no data, skipped");
                report.skipped.push(kind);
            }
            Err(source) => return Err(ExportError::Render { kind, source }),
        }
    }

    report.summary = write_summary(summary, directory)?;

    info!(
        charts = report.charts.len(),
        skipped = report.skipped.len(),
        "Dashboard export complete"
    );
    Ok(report)
}

/// Serialize the summary as pretty JSON into `directory/summary.json`.
pub fn write_summary(summary: &DashboardSummary, directory: &Path) -> Result<PathBuf, ExportError> {
    let path = directory.join(SUMMARY_FILE);
    write_summary_json(summary, File::create(&path)?)?;
    Ok(path)
}

fn write_summary_json<W: Write>(summary: &DashboardSummary, out: W) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(out);
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{CategorySales, HeadlineMetrics};

    /// Accepts nothing; every write fails like a full disk.
    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "no space left on device"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn sample_summary() -> DashboardSummary {
        DashboardSummary {
            source: "amazon.csv".to_string(),
            row_count: 2,
            metrics: HeadlineMetrics {
                average_discount: Some(45.0),
                average_rating: None,
                total_reviews: 24269.0,
                total_estimated_sales: 26_671_631.0,
            },
            sales_by_category: vec![CategorySales {
                main_category: Some("Electronics".to_string()),
                estimated_sales: 26_671_631.0,
                share: 1.0,
            }],
            rating_by_category: Vec::new(),
            scatter: Vec::new(),
            trend: None,
        }
    }

    #[test]
    fn failed_final_write_is_reported() {
        // small enough to sit in the buffer until the flush
        let err = write_summary_json(&sample_summary(), FullDisk).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }

    #[test]
    fn summary_json_round_trips_metrics() {
        let dir = tempfile::tempdir().unwrap();
        let summary = sample_summary();

        let path = write_summary(&summary, dir.path()).unwrap();
        assert_eq!(path, dir.path().join(SUMMARY_FILE));

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["row_count"], 2);
        assert_eq!(value["metrics"]["average_discount"], 45.0);
        assert!(value["metrics"]["average_rating"].is_null());
        assert_eq!(value["sales_by_category"][0]["main_category"], "Electronics");
        assert!(value["trend"].is_null());
    }
}
