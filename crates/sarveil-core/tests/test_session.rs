#[allow(dead_code)]
mod common;

use std::sync::Arc;

use common::FakeCatalog;
use sarveil_core::catalog::session::{init_session, is_initialized, session};
use sarveil_core::error::SarveilError;

// The session is process-wide, so the whole lifecycle lives in one test.
#[test]
fn test_session_lifecycle() {
    assert!(!is_initialized());
    assert!(matches!(session(), Err(SarveilError::CatalogNotInitialized)));

    init_session(Arc::new(FakeCatalog::default())).unwrap();
    assert!(is_initialized());
    assert_eq!(session().unwrap().name(), "fake");

    let again = init_session(Arc::new(FakeCatalog::default()));
    assert!(matches!(again, Err(SarveilError::CatalogAlreadyInitialized)));
    assert_eq!(session().unwrap().name(), "fake");
}
