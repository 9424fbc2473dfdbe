// src/domain/experience/leveling.rs
//
// Level arithmetic. Everything here is a pure function; callers own
// persistence and any notification side effects.

use serde::Serialize;

use super::entity::{ExperienceState, BASE_XP_PER_LEVEL};
use super::invariants::validate_experience;
use crate::domain::DomainResult;

/// Cumulative XP required to *have reached* `level`.
///
/// Triangular schedule: `BASE * (level - 1) * level / 2`, so
/// `level_to_total_xp(1) == 0` and the threshold sequence is strictly
/// increasing.
pub fn level_to_total_xp(level: u32) -> u64 {
    let l = level as u64;
    if l <= 1 {
        return 0;
    }
    BASE_XP_PER_LEVEL * (l - 1) * l / 2
}

/// XP needed to climb from `level` to `level + 1`.
pub fn xp_for_next_level(level: u32) -> u64 {
    level as u64 * BASE_XP_PER_LEVEL
}

/// Level reached with `total_xp` accumulated. Always at least 1.
///
/// Binary search over `level_to_total_xp` rather than the closed-form
/// floating-point inverse, so threshold values map exactly to their level
/// even for very large XP totals.
pub fn xp_to_level(total_xp: u64) -> u32 {
    let target = total_xp as u128;

    // Bracket the answer: threshold(lo) <= target < threshold(hi).
    let mut lo: u64 = 1;
    let mut hi: u64 = 2;
    while threshold(hi) <= target {
        lo = hi;
        hi *= 2;
    }

    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if threshold(mid) <= target {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    // Any u64 XP total derives a level well below u32::MAX.
    lo as u32
}

// Widened copy of level_to_total_xp used while the search bracket may
// overshoot the representable level range.
fn threshold(level: u64) -> u128 {
    if level <= 1 {
        return 0;
    }
    BASE_XP_PER_LEVEL as u128 * (level as u128 - 1) * level as u128 / 2
}

/// Result of applying an XP award to a user's experience counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct XpAwardOutcome {
    pub state: ExperienceState,
    pub xp_gained: u64,
    pub leveled_up: bool,
    pub previous_level: u32,
}

/// Add `award` XP to `state` and rederive level and role.
///
/// `leveled_up` reports a strict level increase and is the caller's trigger
/// for any level-up notification. A malformed input state fails fast with an
/// invariant violation instead of being silently repaired.
pub fn apply_episode_xp(state: &ExperienceState, award: u64) -> DomainResult<XpAwardOutcome> {
    validate_experience(state)?;

    let new_state = ExperienceState::from_xp(state.xp.saturating_add(award));

    Ok(XpAwardOutcome {
        state: new_state,
        xp_gained: award,
        leveled_up: new_state.level > state.level,
        previous_level: state.level,
    })
}

/// Progress through the current level, for profile progress bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelProgress {
    pub xp_into_level: u64,
    pub xp_for_level: u64,
    pub percent: u8,
}

/// Position of `state` inside its current level.
///
/// For a valid state `xp_into_level < xp_for_level` holds by construction of
/// `xp_to_level`, so `percent` is always in `[0, 100)`.
pub fn level_progress(state: &ExperienceState) -> DomainResult<LevelProgress> {
    validate_experience(state)?;

    let floor = level_to_total_xp(state.level);
    let ceiling = level_to_total_xp(state.level + 1);
    let xp_into_level = state.xp - floor;
    let xp_for_level = ceiling - floor;

    Ok(LevelProgress {
        xp_into_level,
        xp_for_level,
        percent: (100 * xp_into_level / xp_for_level) as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::experience::Role;

    #[test]
    fn test_thresholds_first_levels() {
        assert_eq!(level_to_total_xp(1), 0);
        assert_eq!(level_to_total_xp(2), 100);
        assert_eq!(level_to_total_xp(3), 300);
        assert_eq!(level_to_total_xp(4), 600);
    }

    #[test]
    fn test_xp_for_next_level_is_arithmetic() {
        assert_eq!(xp_for_next_level(1), 100);
        assert_eq!(xp_for_next_level(2), 200);
        assert_eq!(xp_for_next_level(3), 300);
        // Consecutive thresholds differ by exactly the per-level cost.
        for level in 1..200 {
            assert_eq!(
                level_to_total_xp(level + 1) - level_to_total_xp(level),
                xp_for_next_level(level)
            );
        }
    }

    #[test]
    fn test_round_trip_at_thresholds() {
        for level in 1..=100 {
            assert_eq!(xp_to_level(level_to_total_xp(level)), level);
        }
    }

    #[test]
    fn test_round_trip_just_below_thresholds() {
        for level in 2..=100 {
            assert_eq!(xp_to_level(level_to_total_xp(level) - 1), level - 1);
        }
    }

    #[test]
    fn test_zero_xp_is_level_one() {
        assert_eq!(xp_to_level(0), 1);
        assert_eq!(xp_to_level(99), 1);
        assert_eq!(xp_to_level(100), 2);
    }

    #[test]
    fn test_huge_xp_total_does_not_drift() {
        // Far beyond what the float inverse handles exactly.
        let level = 2_000_000;
        let at = level_to_total_xp(level);
        assert_eq!(xp_to_level(at), level);
        assert_eq!(xp_to_level(at - 1), level - 1);
        assert_eq!(xp_to_level(u64::MAX) > 0, true);
    }

    #[test]
    fn test_apply_episode_xp_levels_up() {
        let state = ExperienceState {
            xp: 90,
            level: 1,
            role: Role::Bronze,
        };
        let outcome = apply_episode_xp(&state, 50).unwrap();
        assert_eq!(outcome.state.xp, 140);
        assert_eq!(outcome.state.level, 2);
        assert_eq!(outcome.state.role, Role::Bronze);
        assert_eq!(outcome.xp_gained, 50);
        assert!(outcome.leveled_up);
        assert_eq!(outcome.previous_level, 1);
    }

    #[test]
    fn test_apply_episode_xp_below_threshold() {
        let state = ExperienceState::default();
        let outcome = apply_episode_xp(&state, 50).unwrap();
        assert_eq!(outcome.state.xp, 50);
        assert_eq!(outcome.state.level, 1);
        assert!(!outcome.leveled_up);
    }

    #[test]
    fn test_apply_episode_xp_rejects_malformed_state() {
        let state = ExperienceState {
            xp: 500,
            level: 1,
            role: Role::Bronze,
        };
        assert!(apply_episode_xp(&state, 50).is_err());
    }

    #[test]
    fn test_apply_episode_xp_role_promotion() {
        // Level 9 -> 10 crosses the Bronze/Silver boundary.
        let state = ExperienceState::from_xp(level_to_total_xp(10) - 1);
        assert_eq!(state.level, 9);
        let outcome = apply_episode_xp(&state, 1).unwrap();
        assert_eq!(outcome.state.level, 10);
        assert_eq!(outcome.state.role, Role::Silver);
        assert!(outcome.leveled_up);
    }

    #[test]
    fn test_level_progress_bounds() {
        for xp in (0..20_000).step_by(37) {
            let progress = level_progress(&ExperienceState::from_xp(xp)).unwrap();
            assert!(progress.percent < 100, "percent out of range at {} XP", xp);
            assert!(progress.xp_into_level < progress.xp_for_level);
        }
    }

    #[test]
    fn test_level_progress_values() {
        // 150 XP: level 2 spans [100, 300), so 50 into a 200 XP level.
        let progress = level_progress(&ExperienceState::from_xp(150)).unwrap();
        assert_eq!(progress.xp_into_level, 50);
        assert_eq!(progress.xp_for_level, 200);
        assert_eq!(progress.percent, 25);
    }

    #[test]
    fn test_level_progress_rejects_malformed_state() {
        let state = ExperienceState {
            xp: 0,
            level: 0,
            role: Role::Bronze,
        };
        assert!(level_progress(&state).is_err());
    }
}
