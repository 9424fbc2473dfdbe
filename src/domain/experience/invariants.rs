use super::entity::{ExperienceState, Role};
use super::leveling::xp_to_level;
use crate::domain::{DomainError, DomainResult};

/// Validates all ExperienceState invariants
/// These are the absolute rules that must hold for the counters to be valid
pub fn validate_experience(state: &ExperienceState) -> DomainResult<()> {
    if state.level == 0 {
        return Err(DomainError::InvariantViolation(
            "Experience level must be at least 1".to_string(),
        ));
    }

    let derived_level = xp_to_level(state.xp);
    if state.level != derived_level {
        return Err(DomainError::InvariantViolation(format!(
            "Level {} does not match level {} derived from {} XP",
            state.level, derived_level, state.xp
        )));
    }

    if state.role != Role::for_level(state.level) {
        return Err(DomainError::InvariantViolation(format!(
            "Role {} does not match level {}",
            state.role, state.level
        )));
    }

    Ok(())
}

/// Invariants that must hold true for the Experience domain:
///
/// 1. Levels start at 1; level 0 does not exist
/// 2. `level` is exactly `xp_to_level(xp)` after every mutation
/// 3. `role` is exactly `Role::for_level(level)` after every mutation
/// 4. XP only ever grows; no operation removes XP
/// 5. Malformed states fail fast, they are never silently repaired
