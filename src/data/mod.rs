//! Data module - CSV loading, normalization and the session cache

mod loader;
mod normalizer;
pub mod record;
pub mod session;

pub use loader::{DataLoader, LoaderError, SalesDataset};
pub use normalizer::{
    coerce_column, main_category, Coercion, DataNormalizer, NormalizeError, NormalizeOptions,
};
pub use record::ProductRecord;
