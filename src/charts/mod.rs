//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{ChartData, ChartPlotter};
pub use renderer::{RenderError, StaticChartRenderer};

use crate::stats::TrendLine;

/// Shared category palette as RGB triples.
pub const PALETTE_RGB: [(u8, u8, u8); 10] = [
    (52, 152, 219),  // Blue
    (231, 76, 60),   // Red
    (46, 204, 113),  // Green
    (155, 89, 182),  // Purple
    (243, 156, 18),  // Orange
    (26, 188, 156),  // Teal
    (233, 30, 99),   // Pink
    (0, 188, 212),   // Cyan
    (255, 87, 34),   // Deep Orange
    (96, 125, 139),  // Blue Grey
];

/// Trend line and highlight color.
pub const ACCENT_RGB: (u8, u8, u8) = (220, 53, 69);

/// The three dashboard charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    SalesShare,
    DiscountVsRating,
    RatingByCategory,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [
        ChartKind::SalesShare,
        ChartKind::DiscountVsRating,
        ChartKind::RatingByCategory,
    ];

    pub fn title(self, min_discount: f64) -> String {
        match self {
            ChartKind::SalesShare => "Estimated Sales Share by Main Category".to_string(),
            ChartKind::DiscountVsRating => {
                format!("Discount vs Rating (discount ≥ {min_discount}%)")
            }
            ChartKind::RatingByCategory => "Average Rating by Main Category".to_string(),
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::SalesShare => "sales_by_category.png",
            ChartKind::DiscountVsRating => "discount_vs_rating.png",
            ChartKind::RatingByCategory => "rating_by_category.png",
        }
    }
}

/// One-line description of the fitted trend, shown next to the scatter.
pub fn trend_label(trend: &TrendLine) -> String {
    format!(
        "OLS trend: rating = {:.3} {} {:.4} × discount (R² = {:.3}, n = {})",
        trend.intercept,
        if trend.slope < 0.0 { "−" } else { "+" },
        trend.slope.abs(),
        trend.r_squared,
        trend.n
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn trend_label_carries_fit_and_sample_size() {
        let trend = TrendLine {
            slope: -0.0125,
            intercept: 4.5,
            r_squared: 0.04321,
            n: 812,
        };

        assert_eq!(
            trend_label(&trend),
            "OLS trend: rating = 4.500 − 0.0125 × discount (R² = 0.043, n = 812)"
        );
    }

    #[test]
    fn chart_files_are_distinct_pngs() {
        let names: HashSet<&str> = ChartKind::ALL.iter().map(|k| k.file_name()).collect();
        assert_eq!(names.len(), 3);
        assert!(names.iter().all(|n| n.ends_with(".png")));
    }

    #[test]
    fn scatter_title_names_threshold() {
        assert_eq!(
            ChartKind::DiscountVsRating.title(20.0),
            "Discount vs Rating (discount ≥ 20%)"
        );
    }
}
