// src/domain/experience/mod.rs
//
// Experience domain: per-user XP counters and the deterministic
// level/role derivation behind the site's gamification.

mod entity;
mod invariants;
mod leveling;

pub use entity::{ExperienceState, Role, BASE_XP_PER_LEVEL, XP_PER_EPISODE};
pub use invariants::validate_experience;
pub use leveling::{
    apply_episode_xp, level_progress, level_to_total_xp, xp_for_next_level, xp_to_level,
    LevelProgress, XpAwardOutcome,
};
