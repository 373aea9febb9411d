//! Recognition of compiler-synthesized range variables.
//!
//! The desugarer gives every transparent identifier a name containing a
//! fixed marker. Rewrites ask only [`SyntheticNames::is_transparent`], so a
//! producer that tags bindings differently needs a new implementation here
//! and nothing else.

/// Decides whether a range variable name was synthesized by the desugarer.
pub trait SyntheticNames {
    fn is_transparent(&self, name: &str) -> bool;
}

/// Names containing a marker substring are transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSubstring {
    marker: String,
}

impl MarkerSubstring {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl SyntheticNames for MarkerSubstring {
    #[inline]
    fn is_transparent(&self, name: &str) -> bool {
        !self.marker.is_empty() && name.contains(self.marker.as_str())
    }
}

impl<F: Fn(&str) -> bool> SyntheticNames for F {
    fn is_transparent(&self, name: &str) -> bool {
        self(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TRANSPARENT_MARKER;

    #[test]
    fn marker_matches_anywhere_in_name() {
        let names = MarkerSubstring::new(TRANSPARENT_MARKER);
        assert!(names.is_transparent("<>h__TransparentIdentifier0"));
        assert!(names.is_transparent("h__TransparentIdentifier"));
        assert!(!names.is_transparent("x"));
        assert!(!names.is_transparent("TransparentIdentifier"));
    }

    #[test]
    fn empty_marker_matches_nothing() {
        let names = MarkerSubstring::new("");
        assert!(!names.is_transparent("x"));
        assert!(!names.is_transparent(""));
    }

    #[test]
    fn closure_policy() {
        let names = |name: &str| name.starts_with('$');
        assert!(names.is_transparent("$t0"));
        assert!(!names.is_transparent("t0"));
    }
}
