use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an entity in a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Builds an id from a fixed bit pattern. Ids built this way order the
    /// same on every run, which keeps seeded worlds reproducible.
    pub fn from_bits(high: u64, low: u64) -> Self {
        Self(Uuid::from_u64_pair(high, low))
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// World geometry layer relative to the entity plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorldLayer {
    /// Drawn before entities (ground, backdrop).
    Below,
    /// Drawn after entities (canopy, weather overlays).
    Above,
}

impl std::fmt::Display for WorldLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorldLayer::Below => write!(f, "below"),
            WorldLayer::Above => write!(f, "above"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_uniqueness() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn from_bits_orders_by_high_word_first() {
        assert_eq!(EntityId::from_bits(1, 2), EntityId::from_bits(1, 2));
        assert!(EntityId::from_bits(0, u64::MAX) < EntityId::from_bits(1, 0));
    }

    #[test]
    fn world_layer_display() {
        assert_eq!(WorldLayer::Below.to_string(), "below");
        assert_eq!(WorldLayer::Above.to_string(), "above");
    }
}
