//! Sales Dashboard - product sales CSV normalization, metrics & charts
//!
//! Loads a product-sales export once per process, cleans its currency,
//! percentage and count columns, and derives the aggregates shown by the
//! dashboard window.

pub mod charts;
pub mod data;
pub mod export;
pub mod settings;
pub mod stats;
