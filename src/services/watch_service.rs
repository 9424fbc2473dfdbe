// src/services/watch_service.rs
//
// Watch-history XP award orchestration
//
// ARCHITECTURE:
// - Loads experience counters, applies the award via the pure engine,
//   persists, and triggers the level-up notification
// - NO level/role arithmetic of its own; the experience domain is the
//   sole authority for that

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::experience::{
    apply_episode_xp, level_progress, Role, XpAwardOutcome, XP_PER_EPISODE,
};
use crate::error::AppResult;
use crate::repositories::UserExperienceRepository;

/// Collaborator that delivers level-up congratulations (email in production).
///
/// Only invoked when an award reports `leveled_up`; delivery failures are
/// logged and never fail the award itself.
#[cfg_attr(test, mockall::automock)]
pub trait LevelUpNotifier: Send + Sync {
    fn notify_level_up(&self, user_id: Uuid, new_level: u32, new_role: Role) -> AppResult<()>;
}

/// Level statistics for the profile and admin views
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelStats {
    pub current_level: u32,
    pub current_role: Role,
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
    pub xp_in_current_level: u64,
    pub xp_needed_for_next_level: u64,
    pub progress: u8,
    pub next_level: u32,
    pub next_role: Role,
}

pub struct WatchService {
    experience_repo: Arc<dyn UserExperienceRepository>,
    notifier: Arc<dyn LevelUpNotifier>,
}

impl WatchService {
    pub fn new(
        experience_repo: Arc<dyn UserExperienceRepository>,
        notifier: Arc<dyn LevelUpNotifier>,
    ) -> Self {
        Self {
            experience_repo,
            notifier,
        }
    }

    /// Award the per-episode XP for a newly recorded watch-history entry.
    ///
    /// Users with no stored counters start from the fresh level-1 state.
    pub fn record_episode_watched(&self, user_id: Uuid) -> AppResult<XpAwardOutcome> {
        let state = self.experience_repo.get(user_id)?.unwrap_or_default();

        let outcome = apply_episode_xp(&state, XP_PER_EPISODE)?;
        self.experience_repo.save(user_id, &outcome.state)?;

        if outcome.leveled_up {
            if let Err(err) =
                self.notifier
                    .notify_level_up(user_id, outcome.state.level, outcome.state.role)
            {
                log::warn!("level-up notification for {} failed: {}", user_id, err);
            }
        }

        Ok(outcome)
    }

    /// Level statistics for the profile page.
    pub fn level_stats(&self, user_id: Uuid) -> AppResult<LevelStats> {
        let state = self.experience_repo.get(user_id)?.unwrap_or_default();
        let progress = level_progress(&state)?;

        Ok(LevelStats {
            current_level: state.level,
            current_role: state.role,
            total_xp: state.xp,
            xp_in_current_level: progress.xp_into_level,
            xp_needed_for_next_level: progress.xp_for_level,
            progress: progress.percent,
            next_level: state.level + 1,
            next_role: Role::for_level(state.level + 1),
        })
    }
}
