// src/lib.rs
// OtakuStream - Anime streaming core
//
// Architecture:
// - Domain-centric: leveling and catalog rules live in domain, pure and tested
// - Explicit: degraded results are typed (placeholders, empty listings), never implicit
// - Thin edges: scraping is parser (pure) behind client (I/O policy) behind fetcher (transport)

pub mod db;
pub mod domain;
pub mod error;
pub mod integrations;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API - Domain (Experience)
// ============================================================================

pub use domain::{
    apply_episode_xp,
    level_progress,
    level_to_total_xp,
    validate_experience,
    xp_for_next_level,
    xp_to_level,
    ExperienceState,
    LevelProgress,
    Role,
    XpAwardOutcome,
    BASE_XP_PER_LEVEL,
    XP_PER_EPISODE,
};

// ============================================================================
// PUBLIC API - Domain (Catalog)
// ============================================================================

pub use domain::{
    slug_from_link,
    title_from_slug,
    AnimeDetail,
    AnimeSummary,
    DownloadLink,
    DownloadOption,
    EpisodeRef,
    EpisodeStreamInfo,
    Genre,
    SearchResult,
    StreamMirror,
    PLACEHOLDER_IMAGE,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{SqliteUserExperienceRepository, UserExperienceRepository};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{LevelStats, LevelUpNotifier, WatchService};

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{FetchedPage, OtakuDesuClient, PageFetcher, ReqwestFetcher};
