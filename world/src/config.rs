//! Map catalog configuration consumed by the launcher.
//!
//! A catalog holds every playable map; the launcher selects one by its
//! 1-based index and asks [`crate::World::from_map`] to build the world from
//! it. The catalog trusts its author: item positions are not checked against
//! each other, matching the generator's contract.

use serde::Deserialize;

use grid_hunt_core::WallRotation;

/// Catalog of playable maps, ordered by index.
#[derive(Clone, Debug, Deserialize)]
pub struct MapCatalog {
    /// Maps in catalog order; index 1 selects the first entry.
    pub maps: Vec<MapConfig>,
}

impl MapCatalog {
    /// Parses a catalog from its JSON representation.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Looks up a map by its 1-based index.
    #[must_use]
    pub fn map(&self, index: usize) -> Option<&MapConfig> {
        index.checked_sub(1).and_then(|slot| self.maps.get(slot))
    }
}

/// Static description of one playable map.
#[derive(Clone, Debug, Deserialize)]
pub struct MapConfig {
    /// World width in cells.
    pub width: u32,
    /// World height in cells.
    pub height: u32,
    /// Agent start descriptors; agent i+1 uses entry i.
    pub agents: Vec<AgentStart>,
    /// Key positions; key i belongs to agent i+1's hunt.
    pub keys: Vec<ItemPlacement>,
    /// Box positions; box i belongs to agent i+1's hunt.
    pub boxes: Vec<ItemPlacement>,
    /// Wall anchors and rotations.
    #[serde(default)]
    pub walls: Vec<WallPlacement>,
}

/// Start descriptor for one agent.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct AgentStart {
    /// Starting horizontal position.
    pub x: u32,
    /// Starting vertical position.
    pub y: u32,
    /// Cosmetic color used by observers; absent from the protocol.
    #[serde(default = "default_agent_color")]
    pub color: [u8; 3],
}

/// Fixed position of a key or box.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ItemPlacement {
    /// Horizontal position of the item.
    pub x: u32,
    /// Vertical position of the item.
    pub y: u32,
}

/// Anchor and orientation of one L-pentomino wall.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct WallPlacement {
    /// Horizontal anchor of the wall's 3x3 bounding box.
    pub x: u32,
    /// Vertical anchor of the wall's 3x3 bounding box.
    pub y: u32,
    /// Orientation of the L inside the bounding box.
    #[serde(default)]
    pub rotation: WallRotation,
}

fn default_agent_color() -> [u8; 3] {
    [0xc8, 0xc8, 0xc8]
}
