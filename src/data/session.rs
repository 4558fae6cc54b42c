//! Process-wide cache of the normalized sales table.
//!
//! The table is built on first access and never rebuilt or mutated for the
//! rest of the process.

use super::loader::{DataLoader, LoaderError, SalesDataset};
use super::normalizer::NormalizeOptions;
use once_cell::sync::OnceCell;
use std::path::Path;
use tracing::{debug, warn};

static SESSION: OnceCell<SalesDataset> = OnceCell::new();

/// Return the session table, loading it from `path` on first call.
///
/// Once a table is cached, `path` and `options` are ignored. A failed load
/// leaves the cache empty.
pub fn load_session(
    path: &Path,
    options: &NormalizeOptions,
) -> Result<&'static SalesDataset, LoaderError> {
    if let Some(dataset) = SESSION.get() {
        if dataset.source() != path {
            warn!(
                cached = %dataset.source().display(),
                requested = %path.display(),
                "Session table already loaded from another source"
            );
        } else {
            debug!(path = %path.display(), "Session table cache hit");
        }
        return Ok(dataset);
    }

    SESSION.get_or_try_init(|| DataLoader::new(options.clone()).load_csv(path))
}

/// The cached table, if a load has succeeded.
pub fn session() -> Option<&'static SalesDataset> {
    SESSION.get()
}
