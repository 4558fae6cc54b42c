//! Everything the dashboard shows, computed in one pass over the session table.

use super::calculator::{
    CategoryRating, CategorySales, HeadlineMetrics, ScatterFilter, ScatterPoint, StatsCalculator,
    StatsError, TrendLine,
};
use crate::data::SalesDataset;
use serde::Serialize;
use tracing::info;

/// A formatted metric card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub source: String,
    pub row_count: usize,
    pub metrics: HeadlineMetrics,
    pub sales_by_category: Vec<CategorySales>,
    pub rating_by_category: Vec<CategoryRating>,
    pub scatter: Vec<ScatterPoint>,
    pub trend: Option<TrendLine>,
}

impl DashboardSummary {
    pub fn compute(dataset: &SalesDataset, filter: ScatterFilter) -> Result<Self, StatsError> {
        let df = dataset.dataframe();

        let metrics = StatsCalculator::headline_metrics(df)?;
        let sales_by_category = StatsCalculator::sales_by_category(df)?;
        let rating_by_category = StatsCalculator::rating_by_category(df)?;
        let scatter = StatsCalculator::scatter_points(df, filter)?;
        let trend = StatsCalculator::trend_line(&scatter);

        info!(
            rows = dataset.row_count(),
            categories = sales_by_category.len(),
            scatter_points = scatter.len(),
            "Dashboard aggregates computed"
        );

        Ok(Self {
            source: dataset.source().display().to_string(),
            row_count: dataset.row_count(),
            metrics,
            sales_by_category,
            rating_by_category,
            scatter,
            trend,
        })
    }

    /// Average discount, average rating, total reviews, estimated total sales.
    pub fn metric_cards(&self, currency_symbol: &str) -> [MetricCard; 4] {
        let m = &self.metrics;
        [
            MetricCard {
                label: "Average Discount (%)".to_string(),
                value: format_optional(m.average_discount, 2),
            },
            MetricCard {
                label: "Average Rating".to_string(),
                value: format_optional(m.average_rating, 2),
            },
            MetricCard {
                label: "Total Reviews".to_string(),
                value: format_thousands(m.total_reviews.trunc(), 0),
            },
            MetricCard {
                label: format!("Estimated Total Sales ({currency_symbol})"),
                value: format_thousands(m.total_estimated_sales, 2),
            },
        ]
    }
}

fn format_optional(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{v:.decimals$}"))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Fixed-point formatting with `,` between thousands groups.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let digits = int_part.len();
    let mut out = String::with_capacity(formatted.len() + digits / 3 + 1);
    if value.is_sign_negative() && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_thousands(0.0, 0), "0");
        assert_eq!(format_thousands(999.0, 0), "999");
        assert_eq!(format_thousands(1000.0, 0), "1,000");
        assert_eq!(format_thousands(24269.0, 0), "24,269");
        assert_eq!(format_thousands(26671631.0, 2), "26,671,631.00");
        assert_eq!(format_thousands(1234.567, 2), "1,234.57");
        assert_eq!(format_thousands(-1234567.0, 1), "-1,234,567.0");
    }

    #[test]
    fn negative_zero_has_no_sign() {
        assert_eq!(format_thousands(-0.001, 2), "0.00");
    }

    fn summary(metrics: HeadlineMetrics) -> DashboardSummary {
        DashboardSummary {
            source: "amazon.csv".to_string(),
            row_count: 3,
            metrics,
            sales_by_category: Vec::new(),
            rating_by_category: Vec::new(),
            scatter: Vec::new(),
            trend: None,
        }
    }

    #[test]
    fn metric_cards_are_formatted() {
        let s = summary(HeadlineMetrics {
            average_discount: Some(47.691),
            average_rating: Some(4.0963),
            total_reviews: 26_767_284.0,
            total_estimated_sales: 1_234_567.891,
        });

        let values: Vec<String> = s.metric_cards("₹").iter().map(|c| c.value.clone()).collect();
        assert_eq!(values, vec!["47.69", "4.10", "26,767,284", "1,234,567.89"]);
        assert_eq!(s.metric_cards("₹")[3].label, "Estimated Total Sales (₹)");
    }

    #[test]
    fn missing_means_render_as_not_available() {
        let s = summary(HeadlineMetrics {
            average_discount: None,
            average_rating: None,
            total_reviews: 0.0,
            total_estimated_sales: 0.0,
        });

        let cards = s.metric_cards("₹");
        assert_eq!(cards[0].value, "n/a");
        assert_eq!(cards[1].value, "n/a");
        assert_eq!(cards[2].value, "0");
        assert_eq!(cards[3].value, "0.00");
    }
}
