// src/integrations/mod.rs
//
// External integrations
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Integrations return domain catalog records that services/handlers
//   consume; they never mutate persisted state

pub mod otakudesu;

pub use otakudesu::{FetchedPage, OtakuDesuClient, PageFetcher, ReqwestFetcher};
