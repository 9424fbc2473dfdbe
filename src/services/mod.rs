// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod watch_service;


pub use watch_service::{LevelStats, LevelUpNotifier, WatchService};
