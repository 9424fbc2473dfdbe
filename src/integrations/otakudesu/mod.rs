// src/integrations/otakudesu/mod.rs
//
// OtakuDesu content extraction
//
// ARCHITECTURE:
// - `fetch`: the injected HTTP capability (reqwest behind a trait)
// - `parser`: pure HTML -> catalog record functions
// - `client`: URL construction, timeouts, status policy, degradation
//
// The upstream is a scraped, unreliable site. Listing/browsing operations
// degrade to empty collections or placeholder records; only episode links
// surface failure, because a streaming link has no safe placeholder.

pub mod client;
pub mod fetch;
pub mod parser;

pub use client::{OtakuDesuClient, DEFAULT_BASE_URL};
pub use fetch::{FetchedPage, PageFetcher, ReqwestFetcher};
