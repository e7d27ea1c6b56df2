//! Shared utilities for demos.
//!
//! Provides common functionality used across all demos:
//! - Logging initialization
//! - Demo resource locations

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use capture_widget_host::WidgetResources;
use tracing_subscriber::EnvFilter;
use url::Url;

// ============================================================================
// Logging
// ============================================================================

/// Initialize logging for demos.
///
/// Respects RUST_LOG; defaults to info-level output for the crate.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("capture_widget_host=info")),
        )
        .init();
}

// ============================================================================
// Resources
// ============================================================================

/// Demo resource table pointing at a placeholder asset location.
///
/// The demos exercise the protocol with a scripted in-process frame, so
/// no content is actually fetched from here.
pub fn demo_resources() -> WidgetResources {
    let base = Url::parse("https://assets.example/widgets").expect("valid demo base URL");
    WidgetResources::new().with_shared_base(base)
}
