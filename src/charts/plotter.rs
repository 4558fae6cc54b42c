//! Chart Plotter Module
//! Interactive dashboard charts using egui and egui_plot.

use super::{trend_label, ACCENT_RGB, PALETTE_RGB};
use crate::stats::{
    CategoryRating, CategorySales, DashboardSummary, ScatterPoint, StatsCalculator, TrendLine,
};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};
use std::f32::consts::TAU;

/// Pie slices are drawn as fans of triangles no wider than this (radians).
const PIE_SEGMENT_STEP: f32 = 0.05;

/// Everything the three charts need, with marker sizes precomputed.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub sales_by_category: Vec<CategorySales>,
    pub rating_by_category: Vec<CategoryRating>,
    pub scatter: Vec<ScatterPoint>,
    pub marker_sizes: Vec<f32>,
    pub trend: Option<TrendLine>,
    pub min_discount: f64,
}

impl ChartData {
    pub fn from_summary(summary: &DashboardSummary, min_discount: f64, max_marker_size: f32) -> Self {
        Self {
            sales_by_category: summary.sales_by_category.clone(),
            rating_by_category: summary.rating_by_category.clone(),
            marker_sizes: StatsCalculator::marker_sizes(&summary.scatter, max_marker_size),
            scatter: summary.scatter.clone(),
            trend: summary.trend,
            min_discount,
        }
    }

    /// Horizontal extent of the scatter set, padded by one unit.
    pub fn discount_range(&self) -> (f64, f64) {
        let (min, max) = self
            .scatter
            .iter()
            .map(|p| p.discount_percentage)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(x), hi.max(x))
            });
        if min.is_infinite() {
            (self.min_discount, 100.0)
        } else {
            (min - 1.0, max + 1.0)
        }
    }
}

/// Draws the dashboard charts with egui.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for the category at `index` in sorted order.
    pub fn category_color(index: usize) -> Color32 {
        let (r, g, b) = PALETTE_RGB[index % PALETTE_RGB.len()];
        Color32::from_rgb(r, g, b)
    }

    pub fn accent_color() -> Color32 {
        let (r, g, b) = ACCENT_RGB;
        Color32::from_rgb(r, g, b)
    }

    /// Sales-share pie with a legend on the right and a hover tooltip.
    pub fn draw_sales_pie(ui: &mut egui::Ui, slices: &[CategorySales], height: f32) {
        if slices.iter().all(|s| s.estimated_sales <= 0.0) {
            ui.label(RichText::new("No sales to show").color(Color32::GRAY));
            return;
        }

        ui.horizontal(|ui| {
            let size = egui::vec2(height, height);
            let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
            let center = response.rect.center();
            let radius = height * 0.45;

            let mut start = -TAU / 4.0;
            let mut hovered: Option<&CategorySales> = None;
            let pointer = response.hover_pos();

            for (idx, slice) in slices.iter().enumerate() {
                if slice.share <= 0.0 {
                    continue;
                }
                let sweep = slice.share as f32 * TAU;
                let end = start + sweep;
                let color = Self::category_color(idx);

                let steps = ((sweep / PIE_SEGMENT_STEP).ceil() as usize).max(1);
                for step in 0..steps {
                    let a0 = start + sweep * step as f32 / steps as f32;
                    let a1 = start + sweep * (step + 1) as f32 / steps as f32;
                    let points = vec![
                        center,
                        center + radius * egui::vec2(a0.cos(), a0.sin()),
                        center + radius * egui::vec2(a1.cos(), a1.sin()),
                    ];
                    painter.add(egui::Shape::convex_polygon(points, color, egui::Stroke::NONE));
                }

                if slice.share >= 0.04 {
                    let mid = start + sweep / 2.0;
                    painter.text(
                        center + radius * 0.65 * egui::vec2(mid.cos(), mid.sin()),
                        egui::Align2::CENTER_CENTER,
                        format!("{:.1}%", slice.share * 100.0),
                        egui::FontId::proportional(12.0),
                        Color32::WHITE,
                    );
                }

                if let Some(pos) = pointer {
                    let offset = pos - center;
                    if offset.length() <= radius {
                        // Normalize into [start, start + TAU) before comparing
                        let mut angle = offset.y.atan2(offset.x);
                        while angle < -TAU / 4.0 {
                            angle += TAU;
                        }
                        if angle >= start && angle < end {
                            hovered = Some(slice);
                        }
                    }
                }

                start = end;
            }

            if let Some(slice) = hovered {
                response.on_hover_text(format!(
                    "{}\n{}\n{:.2}%",
                    slice.label(),
                    crate::stats::format_thousands(slice.estimated_sales, 2),
                    slice.share * 100.0
                ));
            }

            ui.add_space(20.0);

            ui.vertical(|ui| {
                for (idx, slice) in slices.iter().enumerate() {
                    ui.horizontal(|ui| {
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                        ui.painter().rect_filled(rect, 3.0, Self::category_color(idx));
                        ui.label(
                            RichText::new(format!(
                                "{}  ({:.1}%)",
                                slice.label(),
                                slice.share * 100.0
                            ))
                            .size(13.0),
                        );
                    });
                }
            });
        });
    }

    /// Discount vs rating scatter. Marker area follows estimated sales;
    /// hovering a marker shows the product name. Every marker is its own named
    /// item, so the plot carries no legend; the trend fit is captioned below.
    pub fn draw_discount_scatter(ui: &mut egui::Ui, data: &ChartData, height: f32) {
        if data.scatter.is_empty() {
            ui.label(RichText::new("No products match the scatter filter").color(Color32::GRAY));
            return;
        }

        let marker_color = Self::category_color(0).gamma_multiply(0.6);
        let (x_min, x_max) = data.discount_range();

        Plot::new("discount_vs_rating")
            .height(height)
            .allow_scroll(false)
            .x_axis_label("Discount (%)")
            .y_axis_label("Rating")
            .label_formatter(|name, value| {
                if name.is_empty() {
                    format!("discount {:.1}%\nrating {:.2}", value.x, value.y)
                } else {
                    format!("{name}\ndiscount {:.1}%\nrating {:.2}", value.x, value.y)
                }
            })
            .show(ui, |plot_ui| {
                for (point, &size) in data.scatter.iter().zip(data.marker_sizes.iter()) {
                    let marker: PlotPoints = vec![[point.discount_percentage, point.rating]].into();
                    plot_ui.points(
                        Points::new(marker)
                            .radius(size / 2.0)
                            .color(marker_color)
                            .name(&point.product_name),
                    );
                }

                if let Some(trend) = &data.trend {
                    let line: PlotPoints = vec![
                        [x_min, trend.predict(x_min)],
                        [x_max, trend.predict(x_max)],
                    ]
                    .into();
                    plot_ui.line(
                        Line::new(line)
                            .color(Self::accent_color())
                            .width(2.0)
                            .name("OLS trend"),
                    );
                }
            });

        let caption = match &data.trend {
            Some(trend) => trend_label(trend),
            None => "No trend line: fewer than two distinct discounts".to_string(),
        };
        ui.add_space(6.0);
        ui.label(
            RichText::new(caption)
                .size(12.0)
                .color(Self::accent_color()),
        );
    }

    /// Average rating per main category as a bar chart.
    pub fn draw_rating_bars(ui: &mut egui::Ui, ratings: &[CategoryRating], height: f32) {
        let labels: Vec<String> = ratings.iter().map(|r| r.label().to_string()).collect();

        let bars: Vec<Bar> = ratings
            .iter()
            .enumerate()
            .filter_map(|(idx, r)| {
                let rating = r.average_rating?;
                Some(
                    Bar::new(idx as f64, rating)
                        .width(0.6)
                        .name(r.label())
                        .fill(Self::category_color(idx)),
                )
            })
            .collect();

        Plot::new("rating_by_category")
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .include_y(5.0)
            .x_axis_label("Main category")
            .y_axis_label("Average rating")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Average rating"));
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::HeadlineMetrics;

    fn point(x: f64, sales: f64) -> ScatterPoint {
        ScatterPoint {
            product_name: format!("p{x}"),
            discount_percentage: x,
            rating: 4.0,
            estimated_sales: sales,
        }
    }

    fn summary(scatter: Vec<ScatterPoint>) -> DashboardSummary {
        DashboardSummary {
            source: "amazon.csv".to_string(),
            row_count: scatter.len(),
            metrics: HeadlineMetrics {
                average_discount: None,
                average_rating: None,
                total_reviews: 0.0,
                total_estimated_sales: 0.0,
            },
            sales_by_category: Vec::new(),
            rating_by_category: Vec::new(),
            scatter,
            trend: None,
        }
    }

    #[test]
    fn chart_data_sizes_every_point() {
        let data = ChartData::from_summary(
            &summary(vec![point(25.0, 100.0), point(60.0, 25.0)]),
            20.0,
            20.0,
        );

        assert_eq!(data.marker_sizes.len(), 2);
        assert_eq!(data.marker_sizes[0], 20.0);
        assert_eq!(data.discount_range(), (24.0, 61.0));
    }

    #[test]
    fn empty_scatter_uses_filter_range() {
        let data = ChartData::from_summary(&summary(Vec::new()), 20.0, 20.0);
        assert_eq!(data.discount_range(), (20.0, 100.0));
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(
            ChartPlotter::category_color(0),
            ChartPlotter::category_color(PALETTE_RGB.len())
        );
    }
}
