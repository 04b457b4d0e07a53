//! Block types and their rendering attributes.
//!
//! The grid treats every non-empty type identically; everything a renderer
//! needs to tell them apart lives in [`BLOCK_ATTRIBUTES`]. Adding a type means
//! adding a variant here and a row in the table.

use serde::{Deserialize, Serialize};

/// Category stored at a grid cell. `Empty` is always id 0.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    #[default]
    Empty = 0,
    Grass = 1,
    Sand = 2,
    Stone = 3,
    Water = 4,
    Wood = 5,
}

/// Per-type rendering attributes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockAttributes {
    /// Lowercase display / wire name
    pub name: &'static str,
    /// Linear RGB base color
    pub base_color: [f32; 3],
    /// Secondary color band used by procedural textures
    pub band_color: [f32; 3],
    /// PBR roughness
    pub roughness: f32,
    /// Amplitude of the per-instance brightness jitter
    pub tint_jitter: f32,
    /// 1.0 for solid blocks
    pub opacity: f32,
}

/// Attribute table indexed by block id
pub const BLOCK_ATTRIBUTES: [BlockAttributes; BlockType::COUNT] = [
    BlockAttributes {
        name: "empty",
        base_color: [0.0, 0.0, 0.0],
        band_color: [0.0, 0.0, 0.0],
        roughness: 1.0,
        tint_jitter: 0.0,
        opacity: 0.0,
    },
    BlockAttributes {
        name: "grass",
        base_color: [0.36, 0.62, 0.25],
        band_color: [0.47, 0.36, 0.22],
        roughness: 0.9,
        tint_jitter: 0.08,
        opacity: 1.0,
    },
    BlockAttributes {
        name: "sand",
        base_color: [0.86, 0.78, 0.55],
        band_color: [0.78, 0.69, 0.47],
        roughness: 0.95,
        tint_jitter: 0.05,
        opacity: 1.0,
    },
    BlockAttributes {
        name: "stone",
        base_color: [0.52, 0.53, 0.55],
        band_color: [0.41, 0.42, 0.44],
        roughness: 0.8,
        tint_jitter: 0.06,
        opacity: 1.0,
    },
    BlockAttributes {
        name: "water",
        base_color: [0.22, 0.45, 0.78],
        band_color: [0.30, 0.55, 0.85],
        roughness: 0.1,
        tint_jitter: 0.0,
        opacity: 0.7,
    },
    BlockAttributes {
        name: "wood",
        base_color: [0.55, 0.38, 0.21],
        band_color: [0.44, 0.29, 0.15],
        roughness: 0.85,
        tint_jitter: 0.07,
        opacity: 1.0,
    },
];

impl BlockType {
    /// Number of block types including `Empty`
    pub const COUNT: usize = 6;

    /// Every type that may be placed, in id order
    pub const PLACEABLE: [BlockType; 5] = [
        BlockType::Grass,
        BlockType::Sand,
        BlockType::Stone,
        BlockType::Water,
        BlockType::Wood,
    ];

    /// Decode a stored byte; unknown ids yield None.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(BlockType::Empty),
            1 => Some(BlockType::Grass),
            2 => Some(BlockType::Sand),
            3 => Some(BlockType::Stone),
            4 => Some(BlockType::Water),
            5 => Some(BlockType::Wood),
            _ => None,
        }
    }

    /// Look a type up by its lowercase name
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        BLOCK_ATTRIBUTES
            .iter()
            .position(|attrs| attrs.name == name)
            .and_then(|id| Self::from_id(id as u8))
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn is_empty(self) -> bool {
        self == BlockType::Empty
    }

    pub fn attributes(self) -> &'static BlockAttributes {
        &BLOCK_ATTRIBUTES[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.attributes().name
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
