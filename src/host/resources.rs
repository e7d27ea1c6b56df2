//! Content source resolution.
//!
//! Each widget kind's content is served from an externally supplied base
//! location; the host only appends the kind's fixed relative path. HOW a
//! base location is produced (static resource bundle, CDN, dev server) is
//! the embedder's business; the [`ResourceLocator`] trait is the seam.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use url::Url;

use crate::error::{Error, Result};
use crate::widget::WidgetKind;

// ============================================================================
// ResourceLocator
// ============================================================================

/// Supplies the base location of a widget kind's static resources.
///
/// Implementations may hit disk or network; results are precomputed into
/// a [`WidgetResources`] table once, before any host is mounted.
#[async_trait]
pub trait ResourceLocator: Send + Sync {
    /// Resolves the base location for one widget kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceNotConfigured`] if the kind has no
    /// resources.
    async fn locate(&self, kind: WidgetKind) -> Result<Url>;
}

// ============================================================================
// WidgetResources
// ============================================================================

/// Precomputed base locations per widget kind.
///
/// # Example
///
/// ```
/// use capture_widget_host::{WidgetKind, WidgetResources};
/// use url::Url;
///
/// let base = Url::parse("https://assets.example/widgets").unwrap();
/// let resources = WidgetResources::new().with_base(WidgetKind::Barcode, base);
///
/// let url = resources.content_url(WidgetKind::Barcode).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://assets.example/widgets/barcode-scanner.html"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct WidgetResources {
    /// Base location per kind.
    bases: FxHashMap<WidgetKind, Url>,
}

impl WidgetResources {
    /// Creates an empty resource table.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base location for one widget kind.
    #[must_use]
    pub fn with_base(mut self, kind: WidgetKind, base: Url) -> Self {
        self.bases.insert(kind, base);
        self
    }

    /// Sets the same base location for every widget kind.
    #[must_use]
    pub fn with_shared_base(mut self, base: Url) -> Self {
        for kind in WidgetKind::ALL {
            self.bases.insert(kind, base.clone());
        }
        self
    }

    /// Precomputes the full table through a locator.
    ///
    /// # Errors
    ///
    /// Propagates the first locator failure.
    pub async fn load(locator: &dyn ResourceLocator) -> Result<Self> {
        let mut resources = Self::new();
        for kind in WidgetKind::ALL {
            let base = locator.locate(kind).await?;
            resources.bases.insert(kind, base);
        }
        Ok(resources)
    }

    /// Returns the configured base location for a kind.
    #[inline]
    #[must_use]
    pub fn base(&self, kind: WidgetKind) -> Option<&Url> {
        self.bases.get(&kind)
    }

    /// Resolves the full content URL for a kind.
    ///
    /// The kind's fixed relative path is appended to the base location,
    /// so `https://assets.example/widgets` becomes
    /// `https://assets.example/widgets/mrz-scanner.html`.
    ///
    /// # Errors
    ///
    /// - [`Error::ResourceNotConfigured`] if no base is set for the kind
    /// - [`Error::InvalidContentSource`] if the joined URL is invalid
    pub fn content_url(&self, kind: WidgetKind) -> Result<Url> {
        let base = self
            .base(kind)
            .ok_or_else(|| Error::resource_not_configured(kind))?;

        let joined = format!(
            "{}{}",
            base.as_str().trim_end_matches('/'),
            kind.content_path()
        );

        Url::parse(&joined).map_err(|e| Error::invalid_content_source(format!("{joined}: {e}")))
    }
}

// ============================================================================
// Tests
// ============================================================================
