//! NPC roster - the fixed cast of characters and their identifiers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("invalid roster data: {0}")]
    InvalidToml(#[from] toml::de::Error),
    #[error("duplicate npc id `{0}`")]
    DuplicateId(String),
}

/// One member of the cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Npc {
    /// Stable save id (favorability keys, event paths use this).
    pub id: String,
    /// Canonical display name - the form narrative tags resolve to.
    pub name: String,
}

/// The fixed cast, in authoring order.
///
/// The roster doubles as the NPC vocabulary for narrative tag matching:
/// a speaker tag is valid only if it resolves to one of these names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NpcRoster {
    npcs: Vec<Npc>,
}

impl NpcRoster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an NPC. Authoring order is preserved and meaningful:
    /// matcher tie-breaks keep the first-listed candidate.
    pub fn add(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.npcs.push(Npc {
            id: id.into(),
            name: name.into(),
        });
    }

    /// The built-in cast of the Thiên Sơn Phái scenario.
    pub fn builtin() -> Self {
        let mut roster = Self::new();
        for (id, name) in [
            ("A", "Phá Trận Tử"),
            ("B", "Động Đình Quân"),
            ("C", "Tiền Đường Quân"),
            ("D", "Tiêu Bạch Hô"),
            ("E", "Cơ Tự"),
            ("F", "Thi Diên Niên"),
            ("G", "Hô Diên Hiển"),
            ("H", "Vũ Chúc"),
            ("I", "An Mộ"),
            ("J", "Đường Mộc Lê"),
            ("K", "Lạc Tiềm U"),
            ("L", "Tạp Dịch Bí Ẩn"),
            ("M", "Huyền Thiên Thanh"),
            ("N", "Lộc Xuân Nhược"),
            ("O", "Linh Tuyết Phi"),
        ] {
            roster.add(id, name);
        }
        roster
    }

    /// Load a replacement cast from TOML config:
    /// `[[npcs]]` entries with `id` and `name`.
    pub fn from_toml_str(raw: &str) -> Result<Self, RosterError> {
        let roster: Self = toml::from_str(raw)?;
        for (index, npc) in roster.npcs.iter().enumerate() {
            if roster.npcs[..index].iter().any(|other| other.id == npc.id) {
                return Err(RosterError::DuplicateId(npc.id.clone()));
            }
        }
        Ok(roster)
    }

    /// Canonical name for a save id.
    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.npcs
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.name.as_str())
    }

    /// Save id for a canonical name.
    pub fn id_of(&self, name: &str) -> Option<&str> {
        self.npcs
            .iter()
            .find(|n| n.name == name)
            .map(|n| n.id.as_str())
    }

    /// All canonical names, in authoring order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.npcs.iter().map(|n| n.name.as_str())
    }

    /// All save ids, in authoring order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.npcs.iter().map(|n| n.id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.npcs.len()
    }
}
