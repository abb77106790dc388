//! Process-wide catalog handle.
//!
//! The handle is installed once, explicitly, before any pipeline runs. There is
//! no lazy or repeated initialization; the pipeline itself only ever receives a
//! `&dyn Catalog`.

use std::sync::{Arc, OnceLock};

use tracing::info;

use crate::error::{Result, SarveilError};

use super::Catalog;

static SESSION: OnceLock<Arc<dyn Catalog>> = OnceLock::new();

/// Install the process-wide catalog. Fails if one is already installed.
pub fn init_session(catalog: Arc<dyn Catalog>) -> Result<()> {
    let name = catalog.name().to_string();
    SESSION
        .set(catalog)
        .map_err(|_| SarveilError::CatalogAlreadyInitialized)?;
    info!(catalog = %name, "Catalog session initialized");
    Ok(())
}

/// The process-wide catalog installed by [`init_session`].
pub fn session() -> Result<Arc<dyn Catalog>> {
    SESSION
        .get()
        .cloned()
        .ok_or(SarveilError::CatalogNotInitialized)
}

pub fn is_initialized() -> bool {
    SESSION.get().is_some()
}
