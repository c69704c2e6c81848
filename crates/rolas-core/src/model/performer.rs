use serde::{Deserialize, Serialize};

use crate::model::ids::PerformerId;

/// The kind of a performer, mirrored by the seed rows of the `types` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerformerType {
    Person,
    Group,
    Unknown,
}

impl PerformerType {
    pub const ALL: [Self; 3] = [Self::Person, Self::Group, Self::Unknown];

    /// The `id_type` value stored in the `types` table.
    #[must_use]
    pub const fn id(self) -> i64 {
        match self {
            Self::Person => 0,
            Self::Group => 1,
            Self::Unknown => 2,
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Person => "Person",
            Self::Group => "Group",
            Self::Unknown => "Unknown",
        }
    }

    /// Map a stored `id_type` back to a type. Ids outside the seed set are
    /// read as `Unknown`.
    #[must_use]
    pub const fn from_id(id: i64) -> Self {
        match id {
            0 => Self::Person,
            1 => Self::Group,
            _ => Self::Unknown,
        }
    }
}

/// A named music act.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performer {
    pub id: PerformerId,
    pub kind: PerformerType,
    pub name: String,
}
