//! Strongly-typed identifiers for the lockdown controller

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Application package identifier (e.g. `com.example.kiosk`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the id is a dotted Java-style name with at least two segments.
    ///
    /// Each segment starts with an ASCII letter and continues with letters,
    /// digits or underscores.
    pub fn is_well_formed(&self) -> bool {
        let mut segments = 0;
        for segment in self.0.split('.') {
            let mut chars = segment.chars();
            match chars.next() {
                Some(c) if c.is_ascii_alphabetic() => {}
                _ => return false,
            }
            if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return false;
            }
            segments += 1;
        }
        segments >= 2
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PackageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PackageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for PackageId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PackageId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Unique identifier for an overlay surface created by this process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlayId(Uuid);

impl OverlayId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OverlayId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_id_equality() {
        let a = PackageId::new("com.example.kiosk");
        let b = PackageId::from("com.example.kiosk");
        let c = PackageId::new("com.example.other");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a == "com.example.kiosk");
    }

    #[test]
    fn package_id_shape() {
        assert!(PackageId::new("com.hmdm.launcher").is_well_formed());
        assert!(PackageId::new("org.app_2.x9").is_well_formed());

        assert!(!PackageId::new("").is_well_formed());
        assert!(!PackageId::new("launcher").is_well_formed());
        assert!(!PackageId::new("com..launcher").is_well_formed());
        assert!(!PackageId::new("com.9lives").is_well_formed());
        assert!(!PackageId::new("com.example-app").is_well_formed());
        assert!(!PackageId::new("com.example.").is_well_formed());
    }

    #[test]
    fn overlay_id_uniqueness() {
        assert_ne!(OverlayId::new(), OverlayId::new());
    }

    #[test]
    fn package_id_serializes_as_plain_string() {
        let id = PackageId::new("com.example.kiosk");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"com.example.kiosk\"");

        let parsed: PackageId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
