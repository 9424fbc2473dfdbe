use serde::{Deserialize, Serialize};

use super::leveling::xp_to_level;

/// XP awarded for every completed episode in the watch history.
pub const XP_PER_EPISODE: u64 = 50;

/// Cost of the first level step. The per-level cost grows arithmetically:
/// level 1->2 costs 100 XP, 2->3 costs 200 XP, 3->4 costs 300 XP, ...
pub const BASE_XP_PER_LEVEL: u64 = 100;

/// Cosmetic rank band, a pure step function of level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl Role {
    /// Band boundaries: Bronze[1-9], Silver[10-19], Gold[20-29],
    /// Platinum[30-39], Diamond[40+]. Total over all positive levels.
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=9 => Role::Bronze,
            10..=19 => Role::Silver,
            20..=29 => Role::Gold,
            30..=39 => Role::Platinum,
            _ => Role::Diamond,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Bronze => write!(f, "Bronze"),
            Role::Silver => write!(f, "Silver"),
            Role::Gold => write!(f, "Gold"),
            Role::Platinum => write!(f, "Platinum"),
            Role::Diamond => write!(f, "Diamond"),
        }
    }
}

/// Per-user gamification counters as persisted on the user record.
///
/// `level` and `role` are always derived from `xp`; this module is the sole
/// authority for that derivation and callers must never set them
/// independently of an XP change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceState {
    pub xp: u64,
    pub level: u32,
    pub role: Role,
}

impl ExperienceState {
    /// Derive a consistent state from a raw XP total.
    /// This is the only way to construct a valid ExperienceState.
    pub fn from_xp(xp: u64) -> Self {
        let level = xp_to_level(xp);
        Self {
            xp,
            level,
            role: Role::for_level(level),
        }
    }
}

impl Default for ExperienceState {
    fn default() -> Self {
        Self::from_xp(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_band_boundaries() {
        assert_eq!(Role::for_level(1), Role::Bronze);
        assert_eq!(Role::for_level(9), Role::Bronze);
        assert_eq!(Role::for_level(10), Role::Silver);
        assert_eq!(Role::for_level(19), Role::Silver);
        assert_eq!(Role::for_level(20), Role::Gold);
        assert_eq!(Role::for_level(29), Role::Gold);
        assert_eq!(Role::for_level(30), Role::Platinum);
        assert_eq!(Role::for_level(39), Role::Platinum);
        assert_eq!(Role::for_level(40), Role::Diamond);
        assert_eq!(Role::for_level(1000), Role::Diamond);
    }

    #[test]
    fn test_default_state_is_fresh_bronze() {
        let state = ExperienceState::default();
        assert_eq!(state.xp, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.role, Role::Bronze);
    }

    #[test]
    fn test_role_serializes_as_plain_name() {
        let json = serde_json::to_string(&Role::Platinum).unwrap();
        assert_eq!(json, "\"Platinum\"");
    }

    #[test]
    fn test_state_json_field_names() {
        let state = ExperienceState::from_xp(150);
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["xp"], 150);
        assert_eq!(json["level"], 2);
        assert_eq!(json["role"], "Bronze");
    }
}
