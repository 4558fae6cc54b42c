//! Sales Dashboard Main Application
//! Main window with control panel and dashboard viewer.

use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use sales_dashboard::charts::ChartData;
use sales_dashboard::export::{self, ExportReport};
use sales_dashboard::settings::Settings;
use sales_dashboard::stats::DashboardSummary;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use tracing::{error, info};

/// Export result from background thread
enum ExportResult {
    Progress(f32, String),
    Complete(ExportReport),
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    summary: DashboardSummary,
    settings: Settings,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async export
    export_rx: Option<Receiver<ExportResult>>,
    is_exporting: bool,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        summary: DashboardSummary,
        settings: Settings,
    ) -> Self {
        let chart_data = ChartData::from_summary(
            &summary,
            settings.dashboard.min_scatter_discount,
            settings.dashboard.max_marker_size,
        );
        let cards = summary.metric_cards(&settings.data.currency_symbol);

        Self {
            control_panel: ControlPanel::new(summary.source.clone(), summary.row_count),
            chart_viewer: ChartViewer::new(settings.dashboard.title.clone(), cards, chart_data),
            summary,
            settings,
            export_rx: None,
            is_exporting: false,
        }
    }

    /// Handle chart export - pick a folder, then render in background
    fn handle_export_charts(&mut self) {
        if self.is_exporting {
            return;
        }

        let Some(directory) = rfd::FileDialog::new()
            .set_directory(&self.settings.export.directory)
            .pick_folder()
        else {
            return; // User cancelled
        };

        self.start_export(directory);
    }

    fn start_export(&mut self, directory: PathBuf) {
        let (tx, rx) = channel();
        self.export_rx = Some(rx);
        self.is_exporting = true;
        self.control_panel.set_progress(5.0, "Rendering charts...");

        let summary = self.summary.clone();
        let chart_data = self.chart_viewer.chart_data.clone();
        let size = (
            self.settings.export.chart_width,
            self.settings.export.chart_height,
        );

        thread::spawn(move || {
            let _ = tx.send(ExportResult::Progress(
                20.0,
                format!("Writing to {}...", directory.display()),
            ));

            match export::export_dashboard(&summary, &chart_data, &directory, size) {
                Ok(report) => {
                    let _ = tx.send(ExportResult::Complete(report));
                }
                Err(e) => {
                    let _ = tx.send(ExportResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for export results
    fn check_export_results(&mut self) {
        // Take the receiver temporarily to avoid borrow issues
        let Some(rx) = self.export_rx.take() else {
            return;
        };

        if drain_export_results(&rx, &mut self.control_panel) {
            self.is_exporting = false;
        } else {
            // Put receiver back, the export is still running
            self.export_rx = Some(rx);
        }
    }

    fn handle_open_export_folder(&mut self) {
        let Some(dir) = &self.control_panel.export_dir else {
            return;
        };
        if let Err(e) = open::that(dir) {
            error!(error = %e, directory = %dir.display(), "Failed to open export folder");
            self.control_panel
                .set_progress(0.0, &format!("Error: cannot open folder ({})", e));
        }
    }
}

/// Apply every pending export message to the panel. Returns `true` once the
/// export is over, including when the worker died without reporting.
fn drain_export_results(rx: &Receiver<ExportResult>, panel: &mut ControlPanel) -> bool {
    loop {
        match rx.try_recv() {
            Ok(ExportResult::Progress(progress, status)) => {
                panel.set_progress(progress, &status);
            }
            Ok(ExportResult::Complete(report)) => {
                info!(directory = %report.directory.display(), "Charts exported");
                let status = if report.skipped.is_empty() {
                    format!("Complete! {} charts + summary exported", report.charts.len())
                } else {
                    format!(
                        "Complete! {} charts exported, {} empty skipped",
                        report.charts.len(),
                        report.skipped.len()
                    )
                };
                panel.set_progress(100.0, &status);
                panel.export_dir = Some(report.directory);
                return true;
            }
            Ok(ExportResult::Error(err)) => {
                error!(error = %err, "Chart export failed");
                panel.set_progress(0.0, &format!("Error: {}", err));
                return true;
            }
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                error!("Export worker stopped without a result");
                panel.set_progress(0.0, "Error: export stopped unexpectedly");
                return true;
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_export_results();
        self.control_panel.export_enabled = !self.is_exporting;

        // Request repaint while exporting
        if self.is_exporting {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::OpenExportFolder => self.handle_open_export_folder(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> ControlPanel {
        ControlPanel::new("amazon.csv".to_string(), 3)
    }

    #[test]
    fn export_keeps_running_while_channel_is_quiet() {
        let (tx, rx) = channel();
        let mut panel = panel();

        tx.send(ExportResult::Progress(20.0, "Writing...".to_string()))
            .unwrap();
        assert!(!drain_export_results(&rx, &mut panel));
        assert_eq!(panel.progress, 20.0);
        assert_eq!(panel.status, "Writing...");
    }

    #[test]
    fn completed_export_records_directory() {
        let (tx, rx) = channel();
        let mut panel = panel();

        tx.send(ExportResult::Complete(ExportReport {
            directory: PathBuf::from("out"),
            ..ExportReport::default()
        }))
        .unwrap();
        assert!(drain_export_results(&rx, &mut panel));
        assert_eq!(panel.export_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn worker_dying_silently_ends_the_export() {
        let (tx, rx) = channel::<ExportResult>();
        let mut panel = panel();

        let worker = thread::spawn(move || {
            let _tx = tx;
            panic!("font loading failed");
        });
        assert!(worker.join().is_err());

        assert!(drain_export_results(&rx, &mut panel));
        assert_eq!(panel.progress, 0.0);
        assert!(panel.status.starts_with("Error"));
    }
}
