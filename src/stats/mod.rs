//! Stats module - dashboard aggregates

mod calculator;
mod summary;

pub use calculator::{
    CategoryRating, CategorySales, HeadlineMetrics, ScatterFilter, ScatterPoint, StatsCalculator,
    StatsError, TrendLine, DEFAULT_MIN_SCATTER_DISCOUNT, UNCATEGORIZED,
};
pub use summary::{format_thousands, DashboardSummary, MetricCard};
