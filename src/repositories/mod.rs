// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - Explicit SQL only

pub mod user_experience_repository;

pub use user_experience_repository::{SqliteUserExperienceRepository, UserExperienceRepository};
