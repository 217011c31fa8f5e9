//! Permission classification: flow direction and sensitivity weight.
//!
//! The permission map is an external collaborator: it classifies each
//! (class, permission) pairing into the direction information moves and
//! an integer sensitivity weight. Loading or parsing map data is out of
//! scope here; [`MemoryPermissionMap`] holds pre-classified entries.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Lowest valid permission weight and minimum-weight setting.
pub const MIN_WEIGHT: u8 = 1;
/// Highest valid permission weight and minimum-weight setting.
pub const MAX_WEIGHT: u8 = 10;

/// Direction of information flow granted by one permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowDirection {
    /// Information flows from the rule's target back to its source.
    Read,
    /// Information flows from the rule's source to its target.
    Write,
    /// Information flows both ways.
    Both,
    /// The permission moves no information; it never creates an edge
    /// and never influences a weight.
    Unmapped,
}

impl FlowDirection {
    /// Parse a direction from a map notation letter or word.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "r" | "read" => Some(Self::Read),
            "w" | "write" => Some(Self::Write),
            "b" | "both" => Some(Self::Both),
            "n" | "u" | "none" | "unmapped" => Some(Self::Unmapped),
            _ => None,
        }
    }

    /// Whether a permission with this direction moves information from
    /// the rule's source to its target.
    pub fn flows_write(self) -> bool {
        matches!(self, Self::Write | Self::Both)
    }

    /// Whether a permission with this direction moves information from
    /// the rule's target back to its source.
    pub fn flows_read(self) -> bool {
        matches!(self, Self::Read | Self::Both)
    }
}

impl fmt::Display for FlowDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
            Self::Both => write!(f, "both"),
            Self::Unmapped => write!(f, "unmapped"),
        }
    }
}

/// Classification of one (class, permission) pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEntry {
    /// Direction the permission moves information.
    pub direction: FlowDirection,
    /// Sensitivity weight in `[MIN_WEIGHT, MAX_WEIGHT]`.
    pub weight: u8,
}

/// Error type for permission map operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PermMapError {
    /// The pairing is missing from the map. Encountering this during a
    /// graph build is a configuration fault fatal to the build.
    #[error("permission map cannot resolve {class}:{permission}")]
    Unresolved {
        /// Object class of the failed lookup.
        class: String,
        /// Permission of the failed lookup.
        permission: String,
    },
    /// A weight outside the valid range was supplied to the map.
    #[error("permission weight {0} outside {MIN_WEIGHT}..={MAX_WEIGHT}")]
    WeightOutOfRange(u8),
}

/// Classification source for (class, permission) pairings.
pub trait PermissionMap {
    /// Resolve one pairing to its direction and weight.
    fn lookup(&self, class: &str, permission: &str) -> Result<PermissionEntry, PermMapError>;
}

/// In-memory permission map.
///
/// Uses BTreeMap for deterministic iteration order. Weights are
/// validated on insert so every stored entry is in range.
#[derive(Debug, Clone, Default)]
pub struct MemoryPermissionMap {
    entries: BTreeMap<(String, String), PermissionEntry>,
}

impl MemoryPermissionMap {
    /// Create a new empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a (class, permission) pairing.
    ///
    /// Replaces any previous classification of the same pairing.
    pub fn insert(
        &mut self,
        class: impl Into<String>,
        permission: impl Into<String>,
        direction: FlowDirection,
        weight: u8,
    ) -> Result<(), PermMapError> {
        if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
            return Err(PermMapError::WeightOutOfRange(weight));
        }
        self.entries.insert(
            (class.into(), permission.into()),
            PermissionEntry { direction, weight },
        );
        Ok(())
    }

    /// Number of classified pairings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PermissionMap for MemoryPermissionMap {
    fn lookup(&self, class: &str, permission: &str) -> Result<PermissionEntry, PermMapError> {
        self.entries
            .get(&(class.to_string(), permission.to_string()))
            .copied()
            .ok_or_else(|| PermMapError::Unresolved {
                class: class.to_string(),
                permission: permission.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut map = MemoryPermissionMap::new();
        map.insert("infoflow", "med_w", FlowDirection::Write, 5)
            .unwrap();

        let entry = map.lookup("infoflow", "med_w").unwrap();
        assert_eq!(entry.direction, FlowDirection::Write);
        assert_eq!(entry.weight, 5);
    }

    #[test]
    fn test_lookup_unresolved() {
        let map = MemoryPermissionMap::new();
        let err = map.lookup("infoflow", "med_w").unwrap_err();
        assert!(matches!(err, PermMapError::Unresolved { .. }));
    }

    #[test]
    fn test_weight_range_enforced() {
        let mut map = MemoryPermissionMap::new();

        assert!(map
            .insert("infoflow", "p", FlowDirection::Read, 0)
            .is_err());
        assert!(map
            .insert("infoflow", "p", FlowDirection::Read, 11)
            .is_err());
        assert!(map.insert("infoflow", "p", FlowDirection::Read, 1).is_ok());
        assert!(map
            .insert("infoflow", "p", FlowDirection::Read, 10)
            .is_ok());
    }

    #[test]
    fn test_direction_groups() {
        assert!(FlowDirection::Write.flows_write());
        assert!(FlowDirection::Both.flows_write());
        assert!(!FlowDirection::Read.flows_write());

        assert!(FlowDirection::Read.flows_read());
        assert!(FlowDirection::Both.flows_read());
        assert!(!FlowDirection::Write.flows_read());

        assert!(!FlowDirection::Unmapped.flows_read());
        assert!(!FlowDirection::Unmapped.flows_write());
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!(FlowDirection::from_str("r"), Some(FlowDirection::Read));
        assert_eq!(FlowDirection::from_str("w"), Some(FlowDirection::Write));
        assert_eq!(FlowDirection::from_str("both"), Some(FlowDirection::Both));
        assert_eq!(
            FlowDirection::from_str("u"),
            Some(FlowDirection::Unmapped)
        );
        assert_eq!(FlowDirection::from_str("x"), None);
    }
}
