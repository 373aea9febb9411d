//! Pass configuration.

/// Marker embedded by the desugarer in every synthesized range variable name.
pub const TRANSPARENT_MARKER: &str = "h__TransparentIdentifier";

/// Method name recognized as an element-type coercion by cast folding.
pub const CAST_METHOD: &str = "Cast";

/// Configuration for a normalization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonConfig {
    /// Substring that marks a range variable as a transparent identifier.
    /// Defaults to [`TRANSPARENT_MARKER`].
    pub transparent_marker: String,

    /// Method folded into a typed `from` clause.
    /// Defaults to [`CAST_METHOD`].
    pub cast_method: String,

    /// Fold `from x in e.Cast<T>()` into `from T x in e`.
    pub fold_casts: bool,

    /// Flatten nested queries bound to transparent identifiers. When off,
    /// every nested source query becomes a continuation.
    pub eliminate_transparent: bool,
}

impl Default for CanonConfig {
    fn default() -> Self {
        Self {
            transparent_marker: TRANSPARENT_MARKER.to_string(),
            cast_method: CAST_METHOD.to_string(),
            fold_casts: true,
            eliminate_transparent: true,
        }
    }
}

impl CanonConfig {
    /// Create a config that recognizes a different synthesized-name marker.
    #[must_use]
    pub fn with_transparent_marker(mut self, marker: impl Into<String>) -> Self {
        self.transparent_marker = marker.into();
        self
    }

    /// Create a config that folds a different coercion method.
    #[must_use]
    pub fn with_cast_method(mut self, method: impl Into<String>) -> Self {
        self.cast_method = method.into();
        self
    }

    #[must_use]
    pub fn with_fold_casts(mut self, fold_casts: bool) -> Self {
        self.fold_casts = fold_casts;
        self
    }

    #[must_use]
    pub fn with_eliminate_transparent(mut self, eliminate: bool) -> Self {
        self.eliminate_transparent = eliminate;
        self
    }
}
