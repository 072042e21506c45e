use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Werewolf,
    Villager,
    Seer,
    Witch,
    Hunter,
    Guardian,
    #[default]
    Unknown,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Werewolf => write!(f, "werewolf"),
            Role::Villager => write!(f, "villager"),
            Role::Seer => write!(f, "seer"),
            Role::Witch => write!(f, "witch"),
            Role::Hunter => write!(f, "hunter"),
            Role::Guardian => write!(f, "guardian"),
            Role::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "werewolf" | "wolf" | "狼人" => Ok(Role::Werewolf),
            "villager" | "村民" => Ok(Role::Villager),
            "seer" | "预言家" => Ok(Role::Seer),
            "witch" | "女巫" => Ok(Role::Witch),
            "hunter" | "猎人" => Ok(Role::Hunter),
            "guardian" | "守卫" => Ok(Role::Guardian),
            "unknown" => Ok(Role::Unknown),
            other => Err(format!("Unrecognized role token: {other}")),
        }
    }
}

/// Where a role assignment came from. Variants are ordered by precedence, so
/// an incoming role only replaces the current one when its source compares
/// greater or equal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoleSource {
    #[default]
    Default,
    /// Werewolf team membership.
    Inferred,
    /// Role disclosed on elimination or in the final roles listing.
    Revealed,
    /// Entry in the explicit "Player Roles:" block.
    Declared,
}
