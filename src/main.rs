//! Sales Dashboard - product sales metrics & interactive charts
//!
//! Loads the configured CSV export once, computes the dashboard aggregates and
//! opens the dashboard window. A load failure stops the program before any
//! window is shown.

mod gui;

use anyhow::{anyhow, Context};
use eframe::egui;
use gui::DashboardApp;
use sales_dashboard::data::session;
use sales_dashboard::settings::Settings;
use sales_dashboard::stats::DashboardSummary;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::load().context("Failed to load dashboard configuration")?;

    let dataset = session::load_session(&settings.data.path, &settings.data.normalize_options())
        .inspect_err(|e| error!(error = %e, "Sales data could not be loaded"))
        .context("Failed to load sales data")?;

    let summary = DashboardSummary::compute(dataset, settings.dashboard.scatter_filter())
        .context("Failed to compute dashboard aggregates")?;

    info!(
        rows = summary.row_count,
        source = %summary.source,
        "Opening dashboard"
    );

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.dashboard.window_width, settings.dashboard.window_height])
            .with_min_inner_size([900.0, 600.0])
            .with_title(&settings.dashboard.title),
        ..Default::default()
    };

    let title = settings.dashboard.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, summary, settings)))),
    )
    .map_err(|e| anyhow!("Dashboard window failed: {e}"))
}
