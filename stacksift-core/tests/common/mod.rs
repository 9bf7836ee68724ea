//! Shared helpers for stacksift-core integration tests

#![allow(dead_code)]

use stacksift_core::catalog::{Catalog, CollectionSet, JitterSource};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests (only once per test run)
pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Bundled catalog with jitter off so popularity is the bare tier score
pub fn bundled_catalog() -> Catalog {
    Catalog::bundled(JitterSource::Disabled).unwrap()
}

pub fn bundled_collections() -> CollectionSet {
    CollectionSet::bundled().unwrap()
}

pub fn names<'a>(entries: impl IntoIterator<Item = &'a stacksift_core::catalog::CatalogEntry>) -> Vec<&'a str> {
    entries.into_iter().map(|e| e.name.as_str()).collect()
}
