//! Column names of the sales export and the row view of the normalized table.

use polars::prelude::*;
use serde::Serialize;

pub const PRODUCT_NAME: &str = "product_name";
pub const CATEGORY: &str = "category";
pub const MAIN_CATEGORY: &str = "main_category";
pub const DISCOUNTED_PRICE: &str = "discounted_price";
pub const ACTUAL_PRICE: &str = "actual_price";
pub const DISCOUNT_PERCENTAGE: &str = "discount_percentage";
pub const RATING: &str = "rating";
pub const RATING_COUNT: &str = "rating_count";
pub const ESTIMATED_SALES: &str = "estimated_sales";

/// Columns the source file must provide.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    PRODUCT_NAME,
    CATEGORY,
    DISCOUNTED_PRICE,
    ACTUAL_PRICE,
    DISCOUNT_PERCENTAGE,
    RATING,
    RATING_COUNT,
];

/// Column order of the normalized table. Extra source columns follow these.
pub const NORMALIZED_COLUMNS: [&str; 9] = [
    PRODUCT_NAME,
    CATEGORY,
    MAIN_CATEGORY,
    DISCOUNTED_PRICE,
    ACTUAL_PRICE,
    DISCOUNT_PERCENTAGE,
    RATING,
    RATING_COUNT,
    ESTIMATED_SALES,
];

/// One normalized row. `None` marks a missing value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub product_name: String,
    pub category: Option<String>,
    pub main_category: Option<String>,
    pub discounted_price: Option<f64>,
    pub actual_price: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub rating: Option<f64>,
    pub rating_count: Option<f64>,
    pub estimated_sales: Option<f64>,
}

impl ProductRecord {
    /// Materialize every row of a normalized DataFrame.
    pub fn from_dataframe(df: &DataFrame) -> PolarsResult<Vec<Self>> {
        let names = df.column(PRODUCT_NAME)?.str()?;
        let categories = df.column(CATEGORY)?.str()?;
        let main_categories = df.column(MAIN_CATEGORY)?.str()?;
        let discounted = df.column(DISCOUNTED_PRICE)?.f64()?;
        let actual = df.column(ACTUAL_PRICE)?.f64()?;
        let discount = df.column(DISCOUNT_PERCENTAGE)?.f64()?;
        let rating = df.column(RATING)?.f64()?;
        let rating_count = df.column(RATING_COUNT)?.f64()?;
        let sales = df.column(ESTIMATED_SALES)?.f64()?;

        let records = (0..df.height())
            .map(|i| ProductRecord {
                product_name: names.get(i).unwrap_or_default().to_string(),
                category: categories.get(i).map(str::to_string),
                main_category: main_categories.get(i).map(str::to_string),
                discounted_price: discounted.get(i),
                actual_price: actual.get(i),
                discount_percentage: discount.get(i),
                rating: rating.get(i),
                rating_count: rating_count.get(i),
                estimated_sales: sales.get(i),
            })
            .collect();

        Ok(records)
    }
}
