//! Data Normalizer Module
//! Turns the text columns of the sales export into numbers and derives
//! `estimated_sales` and `main_category`.

use super::record::*;
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Malformed value {value:?} in column '{column}' at row {row}")]
    MalformedInput {
        column: String,
        /// 1-based data row (header excluded).
        row: usize,
        value: String,
    },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// What to do with a value that is still not a number after stripping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Abort the whole load with `MalformedInput`.
    Fatal,
    /// Replace the value with a missing value and keep going.
    Tolerant,
}

/// Formatting characters stripped before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub currency_symbol: String,
    pub thousands_separator: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            thousands_separator: ",".to_string(),
        }
    }
}

/// Applies the cleaning rules to a raw (all-text) sales table.
pub struct DataNormalizer {
    options: NormalizeOptions,
}

impl Default for DataNormalizer {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

impl DataNormalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Normalize a table holding at least the required columns.
    ///
    /// Running this again on its own output returns an equal table.
    pub fn normalize(&self, mut df: DataFrame) -> Result<DataFrame, NormalizeError> {
        let currency = self.options.currency_symbol.as_str();
        let separator = self.options.thousands_separator.as_str();

        let rules: [(&str, Vec<&str>, Coercion); 5] = [
            (DISCOUNTED_PRICE, vec![currency, separator], Coercion::Fatal),
            (ACTUAL_PRICE, vec![currency, separator], Coercion::Fatal),
            (DISCOUNT_PERCENTAGE, vec!["%"], Coercion::Fatal),
            (RATING, Vec::new(), Coercion::Tolerant),
            (RATING_COUNT, vec![separator], Coercion::Fatal),
        ];

        for (name, strip, mode) in rules {
            let coerced = coerce_column(df.column(name)?, &strip, mode)?;
            df.with_column(coerced)?;
            debug!(column = name, ?mode, "Coerced column to f64");
        }

        for name in [PRODUCT_NAME, CATEGORY] {
            let text = as_text(df.column(name)?)?;
            df.with_column(text)?;
        }

        let estimated_sales = derive_estimated_sales(&df)?;
        df.with_column(estimated_sales)?;

        let main_categories = derive_main_category(&df)?;
        df.with_column(main_categories)?;

        // Canonical columns first, then whatever else the export carried
        let mut order: Vec<String> = NORMALIZED_COLUMNS.iter().map(|s| s.to_string()).collect();
        order.extend(
            df.get_column_names()
                .iter()
                .map(|s| s.to_string())
                .filter(|name| !NORMALIZED_COLUMNS.contains(&name.as_str())),
        );

        Ok(df.select(order)?)
    }
}

/// Parse a column as f64 after removing every `strip` pattern from each value.
///
/// Null and empty cells and values that parse to NaN are missing in both
/// modes. A value left empty by stripping (a bare `₹`, a lone `%`) or made
/// only of whitespace is malformed. Columns that are already numeric are only
/// cast to f64.
pub fn coerce_column(
    column: &Column,
    strip: &[&str],
    mode: Coercion,
) -> Result<Column, NormalizeError> {
    if is_numeric_dtype(column.dtype()) {
        return Ok(column.cast(&DataType::Float64)?);
    }

    let name = column.name().clone();
    let text = as_text(column)?;
    let ca = text.str()?;

    let mut values: Vec<Option<f64>> = Vec::with_capacity(ca.len());
    let mut dropped = 0usize;
    let mut first_dropped: Option<String> = None;

    for (idx, raw) in ca.into_iter().enumerate() {
        let Some(raw) = raw else {
            values.push(None);
            continue;
        };

        match parse_number(raw, strip) {
            Ok(value) => values.push(value),
            Err(()) => match mode {
                Coercion::Fatal => {
                    return Err(NormalizeError::MalformedInput {
                        column: name.to_string(),
                        row: idx + 1,
                        value: raw.to_string(),
                    })
                }
                Coercion::Tolerant => {
                    dropped += 1;
                    first_dropped.get_or_insert_with(|| raw.to_string());
                    values.push(None);
                }
            },
        }
    }

    if dropped > 0 {
        warn!(
            column = %name,
            dropped,
            first = first_dropped.as_deref().unwrap_or_default(),
            "Unparseable values treated as missing"
        );
    }

    Ok(Column::new(name, values))
}

/// `Ok(None)` for an empty cell or NaN, `Err(())` for anything non-numeric.
fn parse_number(raw: &str, strip: &[&str]) -> Result<Option<f64>, ()> {
    if raw.is_empty() {
        return Ok(None);
    }

    let mut cleaned = raw.to_string();
    for pattern in strip.iter().filter(|p| !p.is_empty()) {
        cleaned = cleaned.replace(pattern, "");
    }

    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(());
    }

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(()),
    }
}

/// First `|`-delimited segment, or the whole value when there is no `|`.
pub fn main_category(category: &str) -> &str {
    category
        .split_once('|')
        .map_or(category, |(head, _)| head)
}

fn derive_main_category(df: &DataFrame) -> PolarsResult<Column> {
    let categories = df.column(CATEGORY)?.str()?;
    let values: Vec<Option<String>> = categories
        .into_iter()
        .map(|c| c.map(|c| main_category(c).to_string()))
        .collect();
    Ok(Column::new(MAIN_CATEGORY.into(), values))
}

fn derive_estimated_sales(df: &DataFrame) -> PolarsResult<Column> {
    let counts = df.column(RATING_COUNT)?.f64()?;
    let prices = df.column(DISCOUNTED_PRICE)?.f64()?;
    let values: Vec<Option<f64>> = counts
        .into_iter()
        .zip(prices.into_iter())
        .map(|(count, price)| count.zip(price).map(|(count, price)| count * price))
        .collect();
    Ok(Column::new(ESTIMATED_SALES.into(), values))
}

fn as_text(column: &Column) -> PolarsResult<Column> {
    if column.dtype() == &DataType::String {
        Ok(column.clone())
    } else {
        column.cast(&DataType::String)
    }
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}
