// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file MUST declare all domain modules and re-export their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod catalog;
pub mod experience;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Catalog Domain (transient scrape results)
pub use catalog::{
    slug_from_link, title_from_slug, AnimeDetail, AnimeSummary, DownloadLink, DownloadOption,
    EpisodeRef, EpisodeStreamInfo, Genre, SearchResult, StreamMirror, PLACEHOLDER_IMAGE,
};

// Experience Domain (XP / level / role)
pub use experience::{
    apply_episode_xp, level_progress, level_to_total_xp, validate_experience, xp_for_next_level,
    xp_to_level, ExperienceState, LevelProgress, Role, XpAwardOutcome, BASE_XP_PER_LEVEL,
    XP_PER_EPISODE,
};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
