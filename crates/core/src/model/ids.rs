use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("failed to compile whitespace regex"));

/// Derive a stable slug from a display name: trimmed, lower-cased, with
/// whitespace runs collapsed to a single `-`. Blank names have no id.
pub fn derive_id(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(WHITESPACE_RE.replace_all(&trimmed.to_lowercase(), "-").into_owned())
}

macro_rules! slug_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Derive the id for a display name.
            pub fn from_name(name: &str) -> Option<Self> {
                derive_id(name).map(Self)
            }

            /// Wrap an already-derived id, e.g. one read back from storage.
            pub fn from_raw(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

slug_id!(
    /// Identity of a [`Resource`](super::Resource).
    ResourceId
);
slug_id!(
    /// Identity of a [`Project`](super::Project).
    ProjectId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_fold_case_and_whitespace() {
        assert_eq!(derive_id("  Mary   Ann\tSmith ").as_deref(), Some("mary-ann-smith"));
        assert_eq!(
            ResourceId::from_name("mary ann smith"),
            ResourceId::from_name("MARY  ANN SMITH")
        );
    }

    #[test]
    fn blank_names_have_no_id() {
        assert_eq!(derive_id("   "), None);
        assert_eq!(ProjectId::from_name(""), None);
    }
}
