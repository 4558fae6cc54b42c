//! Statistics Calculator Module
//! Dashboard aggregates over the normalized sales table: headline metrics,
//! per-category breakdowns, the discount/rating scatter set and its trend line.

use crate::data::record::*;
use polars::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use thiserror::Error;

/// Label used for rows whose `category` is missing.
pub const UNCATEGORIZED: &str = "(uncategorized)";

/// Default inclusive lower bound on discount for the scatter set.
pub const DEFAULT_MIN_SCATTER_DISCOUNT: f64 = 20.0;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// The four metric-card values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadlineMetrics {
    /// Mean `discount_percentage` (0-100 scale); `None` when no row has one.
    pub average_discount: Option<f64>,
    /// Mean of the present ratings only.
    pub average_rating: Option<f64>,
    pub total_reviews: f64,
    pub total_estimated_sales: f64,
}

/// One slice of the sales-share pie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySales {
    pub main_category: Option<String>,
    pub estimated_sales: f64,
    /// Fraction (0-1) of the total estimated sales.
    pub share: f64,
}

impl CategorySales {
    pub fn label(&self) -> &str {
        self.main_category.as_deref().unwrap_or(UNCATEGORIZED)
    }
}

/// One bar of the rating-by-category chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRating {
    pub main_category: Option<String>,
    /// `None` when no product in the category has a rating.
    pub average_rating: Option<f64>,
}

impl CategoryRating {
    pub fn label(&self) -> &str {
        self.main_category.as_deref().unwrap_or(UNCATEGORIZED)
    }
}

/// A product in the discount-vs-rating scatter set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub product_name: String,
    pub discount_percentage: f64,
    pub rating: f64,
    pub estimated_sales: f64,
}

/// Ordinary least squares fit of rating on discount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub n: usize,
}

impl TrendLine {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Row filter of the scatter chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterFilter {
    pub min_discount: f64,
}

impl Default for ScatterFilter {
    fn default() -> Self {
        Self {
            min_discount: DEFAULT_MIN_SCATTER_DISCOUNT,
        }
    }
}

/// Stateless aggregate functions. Every call recomputes from the table.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Means skip missing values; sums over no values are 0.
    pub fn headline_metrics(df: &DataFrame) -> Result<HeadlineMetrics, StatsError> {
        let out = df
            .clone()
            .lazy()
            .select([
                col(DISCOUNT_PERCENTAGE).mean().alias("average_discount"),
                col(RATING).mean().alias("average_rating"),
                col(RATING_COUNT).sum().alias("total_reviews"),
                col(ESTIMATED_SALES).sum().alias("total_estimated_sales"),
            ])
            .collect()?;

        let scalar = |name: &str| -> Result<Option<f64>, StatsError> {
            let column = out.column(name)?.cast(&DataType::Float64)?;
            Ok(column.f64()?.get(0))
        };

        Ok(HeadlineMetrics {
            average_discount: scalar("average_discount")?,
            average_rating: scalar("average_rating")?,
            total_reviews: scalar("total_reviews")?.unwrap_or(0.0),
            total_estimated_sales: scalar("total_estimated_sales")?.unwrap_or(0.0),
        })
    }

    /// Estimated sales summed per main category, sorted by category.
    ///
    /// Rows without a category form their own group, so the group totals
    /// always add up to the table total.
    pub fn sales_by_category(df: &DataFrame) -> Result<Vec<CategorySales>, StatsError> {
        let out = df
            .clone()
            .lazy()
            .group_by([col(MAIN_CATEGORY)])
            .agg([col(ESTIMATED_SALES).sum()])
            .sort_by_exprs([col(MAIN_CATEGORY)], SortMultipleOptions::default())
            .collect()?;

        let categories = out.column(MAIN_CATEGORY)?.str()?;
        let sales = out.column(ESTIMATED_SALES)?.cast(&DataType::Float64)?;
        let sales = sales.f64()?;

        let total: f64 = sales.into_iter().flatten().sum();

        Ok(categories
            .into_iter()
            .zip(sales.into_iter())
            .map(|(category, sales)| {
                let sales = sales.unwrap_or(0.0);
                CategorySales {
                    main_category: category.map(str::to_string),
                    estimated_sales: sales,
                    share: if total > 0.0 { sales / total } else { 0.0 },
                }
            })
            .collect())
    }

    /// Mean rating per main category, sorted by category.
    pub fn rating_by_category(df: &DataFrame) -> Result<Vec<CategoryRating>, StatsError> {
        let out = df
            .clone()
            .lazy()
            .group_by([col(MAIN_CATEGORY)])
            .agg([col(RATING).mean()])
            .sort_by_exprs([col(MAIN_CATEGORY)], SortMultipleOptions::default())
            .collect()?;

        let categories = out.column(MAIN_CATEGORY)?.str()?;
        let ratings = out.column(RATING)?.cast(&DataType::Float64)?;
        let ratings = ratings.f64()?;

        Ok(categories
            .into_iter()
            .zip(ratings.into_iter())
            .map(|(category, rating)| CategoryRating {
                main_category: category.map(str::to_string),
                average_rating: rating,
            })
            .collect())
    }

    /// Rows with sales, rating and discount all present, sales above zero
    /// and discount at or above the filter threshold.
    pub fn scatter_subset(df: &DataFrame, filter: ScatterFilter) -> Result<DataFrame, StatsError> {
        let subset = df
            .clone()
            .lazy()
            .filter(
                col(ESTIMATED_SALES)
                    .is_not_null()
                    .and(col(RATING).is_not_null())
                    .and(col(DISCOUNT_PERCENTAGE).is_not_null())
                    .and(col(ESTIMATED_SALES).gt(lit(0.0)))
                    .and(col(DISCOUNT_PERCENTAGE).gt_eq(lit(filter.min_discount))),
            )
            .collect()?;
        Ok(subset)
    }

    /// The scatter set as points carrying the product name for hover labels.
    pub fn scatter_points(
        df: &DataFrame,
        filter: ScatterFilter,
    ) -> Result<Vec<ScatterPoint>, StatsError> {
        let subset = Self::scatter_subset(df, filter)?;

        let names = subset.column(PRODUCT_NAME)?.str()?;
        let discount = subset.column(DISCOUNT_PERCENTAGE)?.f64()?;
        let rating = subset.column(RATING)?.f64()?;
        let sales = subset.column(ESTIMATED_SALES)?.f64()?;

        let points = (0..subset.height())
            .filter_map(|i| {
                Some(ScatterPoint {
                    product_name: names.get(i).unwrap_or_default().to_string(),
                    discount_percentage: discount.get(i)?,
                    rating: rating.get(i)?,
                    estimated_sales: sales.get(i)?,
                })
            })
            .collect();

        Ok(points)
    }

    /// OLS fit of rating on discount.
    ///
    /// `None` with fewer than two points or when every point has the same
    /// discount.
    pub fn trend_line(points: &[ScatterPoint]) -> Option<TrendLine> {
        if points.len() < 2 {
            return None;
        }

        let xs: Vec<f64> = points.iter().map(|p| p.discount_percentage).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.rating).collect();

        let var_x = xs.iter().variance();
        if !(var_x > 0.0) {
            return None;
        }
        let var_y = ys.iter().variance();
        let cov = xs.iter().covariance(ys.iter());

        let slope = cov / var_x;
        let intercept = ys.iter().mean() - slope * xs.iter().mean();
        // A flat response is fitted exactly by the flat line
        let r_squared = if var_y > 0.0 {
            (cov * cov) / (var_x * var_y)
        } else {
            1.0
        };

        Some(TrendLine {
            slope,
            intercept,
            r_squared,
            n: points.len(),
        })
    }

    /// Marker diameters with area proportional to estimated sales; the
    /// largest seller gets `max_size`. Never smaller than one pixel.
    pub fn marker_sizes(points: &[ScatterPoint], max_size: f32) -> Vec<f32> {
        let max_sales = points
            .iter()
            .map(|p| p.estimated_sales)
            .fold(0.0_f64, f64::max);

        points
            .iter()
            .map(|p| {
                if max_sales > 0.0 {
                    (max_size * (p.estimated_sales / max_sales).sqrt() as f32).max(1.0)
                } else {
                    1.0
                }
            })
            .collect()
    }
}
