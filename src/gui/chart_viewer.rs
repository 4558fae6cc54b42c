//! Chart Viewer Widget
//! Central scrollable dashboard: metric cards followed by the three charts.

use egui::{Color32, RichText, ScrollArea};
use sales_dashboard::charts::{ChartData, ChartKind, ChartPlotter};
use sales_dashboard::stats::MetricCard;

const CHART_SPACING: f32 = 15.0;
const CHART_HEIGHT: f32 = 380.0;

/// Scrollable dashboard page.
pub struct ChartViewer {
    pub title: String,
    pub cards: [MetricCard; 4],
    pub chart_data: ChartData,
}

impl ChartViewer {
    pub fn new(title: String, cards: [MetricCard; 4], chart_data: ChartData) -> Self {
        Self {
            title,
            cards,
            chart_data,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new(format!("📊 {}", self.title)).size(24.0));
                ui.add_space(CHART_SPACING);

                self.draw_metric_cards(ui);

                ui.add_space(CHART_SPACING);
                ui.separator();

                Self::draw_chart_card(
                    ui,
                    &ChartKind::SalesShare.title(self.chart_data.min_discount),
                    |ui| {
                        ChartPlotter::draw_sales_pie(
                            ui,
                            &self.chart_data.sales_by_category,
                            CHART_HEIGHT,
                        );
                    },
                );

                ui.separator();

                Self::draw_chart_card(
                    ui,
                    &ChartKind::DiscountVsRating.title(self.chart_data.min_discount),
                    |ui| {
                        ChartPlotter::draw_discount_scatter(ui, &self.chart_data, CHART_HEIGHT);
                    },
                );

                ui.separator();

                Self::draw_chart_card(
                    ui,
                    &ChartKind::RatingByCategory.title(self.chart_data.min_discount),
                    |ui| {
                        ChartPlotter::draw_rating_bars(
                            ui,
                            &self.chart_data.rating_by_category,
                            CHART_HEIGHT,
                        );
                    },
                );
            });
    }

    /// Four equal-width metric cards in one row.
    fn draw_metric_cards(&self, ui: &mut egui::Ui) {
        ui.columns(self.cards.len(), |columns| {
            for (ui, card) in columns.iter_mut().zip(self.cards.iter()) {
                egui::Frame::none()
                    .rounding(8.0)
                    .stroke(egui::Stroke::new(1.0, Color32::from_gray(90)))
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(RichText::new(&card.label).size(13.0).color(Color32::GRAY));
                        ui.label(RichText::new(&card.value).size(26.0).strong());
                    });
            }
        });
    }

    fn draw_chart_card(ui: &mut egui::Ui, title: &str, add_chart: impl FnOnce(&mut egui::Ui)) {
        ui.add_space(CHART_SPACING);
        egui::Frame::none()
            .rounding(8.0)
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(title).size(18.0).strong());
                ui.add_space(8.0);
                add_chart(ui);
            });
        ui.add_space(CHART_SPACING);
    }
}
