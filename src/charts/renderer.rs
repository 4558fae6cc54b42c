//! Static Chart Renderer
//! Renders the three dashboard charts to PNG files with plotters.
//!
//! Layout of every image: caption on top, chart below. The pie carries
//! percentage labels, the scatter a legend for the trend line, the bar chart
//! category names along the x axis.

use super::{trend_label, ChartData, ChartKind, ACCENT_RGB, PALETTE_RGB};
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart rendering failed: {0}")]
    Drawing(String),
    #[error("Nothing to draw for {0:?}")]
    Empty(ChartKind),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Drawing(err.to_string())
    }
}

fn palette(index: usize) -> RGBColor {
    let (r, g, b) = PALETTE_RGB[index % PALETTE_RGB.len()];
    RGBColor(r, g, b)
}

fn accent() -> RGBColor {
    let (r, g, b) = ACCENT_RGB;
    RGBColor(r, g, b)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render one chart to a PNG file of the given size.
    pub fn render_to_file(
        kind: ChartKind,
        data: &ChartData,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let title = kind.title(data.min_discount);
        match kind {
            ChartKind::SalesShare => Self::draw_sales_pie(&root, data, &title)?,
            ChartKind::DiscountVsRating => Self::draw_scatter(&root, data, &title)?,
            ChartKind::RatingByCategory => Self::draw_rating_bars(&root, data, &title)?,
        }

        root.present()?;
        Ok(())
    }

    fn draw_sales_pie<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        data: &ChartData,
        title: &str,
    ) -> Result<(), RenderError> {
        let slices: Vec<(usize, &crate::stats::CategorySales)> = data
            .sales_by_category
            .iter()
            .enumerate()
            .filter(|(_, s)| s.estimated_sales > 0.0)
            .collect();
        if slices.is_empty() {
            return Err(RenderError::Empty(ChartKind::SalesShare));
        }

        let root = root.titled(title, (FONT, 28.0).into_font())?;
        let (width, height) = root.dim_in_pixel();
        let center = (width as i32 / 2, height as i32 / 2);
        let radius = f64::from(width.min(height)) * 0.35;

        let sizes: Vec<f64> = slices.iter().map(|(_, s)| s.estimated_sales).collect();
        let colors: Vec<RGBColor> = slices.iter().map(|(idx, _)| palette(*idx)).collect();
        let labels: Vec<&str> = slices.iter().map(|(_, s)| s.label()).collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(-90.0);
        pie.label_style((FONT, 16.0).into_font().color(&BLACK));
        pie.percentages((FONT, radius * 0.08).into_font().color(&WHITE));
        root.draw(&pie)?;

        Ok(())
    }

    fn draw_scatter<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        data: &ChartData,
        title: &str,
    ) -> Result<(), RenderError> {
        if data.scatter.is_empty() {
            return Err(RenderError::Empty(ChartKind::DiscountVsRating));
        }

        let (x_min, x_max) = data.discount_range();
        let (y_min, y_max) = data
            .scatter
            .iter()
            .map(|p| p.rating)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
                (lo.min(y), hi.max(y))
            });
        let y_min = (y_min - 0.2).min(y_max - 0.5);
        let y_max = y_max + 0.2;

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 28.0).into_font())
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Discount (%)")
            .y_desc("Rating")
            .draw()?;

        let marker_style = palette(0).mix(0.5).filled();
        chart.draw_series(data.scatter.iter().zip(data.marker_sizes.iter()).map(
            |(p, &size)| {
                Circle::new(
                    (p.discount_percentage, p.rating),
                    (size / 2.0).round().max(1.0) as i32,
                    marker_style,
                )
            },
        ))?;

        if let Some(trend) = &data.trend {
            let color = accent();
            chart
                .draw_series(LineSeries::new(
                    vec![
                        (x_min, trend.predict(x_min)),
                        (x_max, trend.predict(x_max)),
                    ],
                    color.stroke_width(3),
                ))?
                .label(trend_label(trend))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
                });

            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font((FONT, 16.0).into_font())
                .draw()?;
        }

        Ok(())
    }

    fn draw_rating_bars<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        data: &ChartData,
        title: &str,
    ) -> Result<(), RenderError> {
        let ratings = &data.rating_by_category;
        if ratings.is_empty() {
            return Err(RenderError::Empty(ChartKind::RatingByCategory));
        }

        let labels: Vec<String> = ratings.iter().map(|r| r.label().to_string()).collect();
        let y_max = ratings
            .iter()
            .filter_map(|r| r.average_rating)
            .fold(5.0_f64, f64::max);

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 28.0).into_font())
            .margin(20)
            .x_label_area_size(90)
            .y_label_area_size(60)
            .build_cartesian_2d((0u32..labels.len() as u32).into_segmented(), 0.0..y_max)?;

        let label_formatter = |v: &SegmentValue<u32>| match v {
            SegmentValue::CenterOf(idx) => labels.get(*idx as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&label_formatter)
            .x_label_style((FONT, 14.0).into_font().transform(FontTransform::Rotate90))
            .y_desc("Average rating")
            .draw()?;

        chart.draw_series(ratings.iter().enumerate().filter_map(|(idx, r)| {
            let rating = r.average_rating?;
            let idx = idx as u32;
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(idx), 0.0),
                    (SegmentValue::Exact(idx + 1), rating),
                ],
                palette(idx as usize).filled(),
            );
            bar.set_margin(0, 0, 10, 10);
            Some(bar)
        }))?;

        Ok(())
    }
}
