//! Identifiers for simulation objects the scripts talk about.
//!
//! The engine never owns actors, blocks or items. It only refers to them:
//!
//! - [`ActorId`]: a live simulation actor (usually a player). Runtime-only,
//!   never written into the text codec.
//! - [`ResourceKey`]: a registry identifier such as `core:stone`, stable
//!   across saves and machines.
//!
//! ## Usage
//!
//! ```
//! use scenario_script::core::{ActorId, ResourceKey};
//!
//! let player = ActorId::new(7);
//! assert_eq!(player.raw(), 7);
//!
//! let stone = ResourceKey::parse("core:stone").unwrap();
//! assert_eq!(stone.namespace(), "core");
//! assert_eq!(stone.path(), "stone");
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of a live simulation actor.
///
/// Actor ids are assigned by the host and are only meaningful while the
/// actor exists. Scripts obtain them from the occurrence context
/// (e.g. the triggering player), never from literals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl ActorId {
    /// Create a new actor ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Actor({})", self.0)
    }
}

/// Registry identifier of a block or item type, `namespace:path`.
///
/// Both halves are non-empty and consist of ASCII alphanumerics,
/// `_`, `-`, `.` and `/`. The key is the globally stable textual form used
/// by the codec. Deserialization applies the same check as [`ResourceKey::parse`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Parse a `namespace:path` key. Returns `None` if malformed.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let (namespace, path) = text.split_once(':')?;
        if Self::valid_part(namespace) && Self::valid_part(path) {
            Some(Self(text.to_string()))
        } else {
            None
        }
    }

    /// Build a key from its two halves.
    ///
    /// Panics if either half is malformed. Intended for constants and tests.
    #[must_use]
    pub fn new(namespace: &str, path: &str) -> Self {
        let key = format!("{namespace}:{path}");
        Self::parse(&key).unwrap_or_else(|| panic!("malformed resource key {key:?}"))
    }

    /// The namespace half (`core` in `core:stone`).
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.0.split_once(':').map_or("", |(ns, _)| ns)
    }

    /// The path half (`stone` in `core:stone`).
    #[must_use]
    pub fn path(&self) -> &str {
        self.0.split_once(':').map_or("", |(_, p)| p)
    }

    /// The full textual form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn valid_part(part: &str) -> bool {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/'))
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ResourceKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("malformed resource key {s:?}"))
    }
}

impl TryFrom<String> for ResourceKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResourceKey> for String {
    fn from(key: ResourceKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_id() {
        let id = ActorId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Actor(42)");
    }

    #[test]
    fn test_resource_key_parse() {
        let key = ResourceKey::parse("core:stone").unwrap();
        assert_eq!(key.namespace(), "core");
        assert_eq!(key.path(), "stone");
        assert_eq!(key.as_str(), "core:stone");
        assert_eq!(key, ResourceKey::new("core", "stone"));

        let nested = ResourceKey::parse("mod-a:ores/copper.raw").unwrap();
        assert_eq!(nested.path(), "ores/copper.raw");
    }

    #[test]
    fn test_resource_key_rejects_malformed() {
        assert!(ResourceKey::parse("stone").is_none());
        assert!(ResourceKey::parse(":stone").is_none());
        assert!(ResourceKey::parse("core:").is_none());
        assert!(ResourceKey::parse("core:st one").is_none());
        assert!(ResourceKey::parse("core:a:b").is_none());
    }

    #[test]
    #[should_panic(expected = "malformed resource key")]
    fn test_resource_key_new_panics() {
        let _ = ResourceKey::new("core", "");
    }

    #[test]
    fn test_resource_key_serde() {
        let key = ResourceKey::new("core", "dirt");
        let json = serde_json::to_string(&key).unwrap();
        let deserialized: ResourceKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, deserialized);
    }

    #[test]
    fn test_resource_key_deserialize_rejects_malformed() {
        assert!(serde_json::from_str::<ResourceKey>(r#""core:st\none""#).is_err());
        assert!(serde_json::from_str::<ResourceKey>(r#""stone""#).is_err());
    }
}
