//! Seam to the external geospatial catalog that stores, filters and serves scenes.
//!
//! The pipeline only speaks the declarative [`CatalogQuery`]; adapters decide how
//! to execute it. [`LocalCatalog`] evaluates queries against a manifest on disk.

pub mod local;
pub mod query;
pub mod session;

use thiserror::Error;
use tracing::debug;

use crate::error::{Result, SarveilError};
use crate::pipeline::PipelineStage;

pub use local::LocalCatalog;
pub use query::{CatalogQuery, Filter, PropertyValue, SceneDescriptor, SceneMetadata, SortBy};

/// Failure reported by a catalog adapter. Retrying is the adapter's concern.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("quota exceeded: {0}")]
    Quota(String),

    #[error("invalid catalog data: {0}")]
    Data(String),
}

/// Synchronous scene catalog.
pub trait Catalog: Send + Sync {
    /// Human-readable backend name, used in logs.
    fn name(&self) -> &str;

    /// Execute a query and return the matching scenes with their selected bands.
    fn query(&self, query: &CatalogQuery) -> std::result::Result<Vec<SceneDescriptor>, CatalogError>;
}

/// Run a query on behalf of a pipeline stage, tagging failures with the stage and query.
pub fn execute(
    catalog: &dyn Catalog,
    query: &CatalogQuery,
    stage: PipelineStage,
) -> Result<Vec<SceneDescriptor>> {
    debug!(catalog = catalog.name(), %stage, %query, "Querying catalog");
    catalog
        .query(query)
        .map_err(|e| SarveilError::UpstreamQueryFailed {
            stage,
            query: query.to_string(),
            message: e.to_string(),
        })
}
