// src/domain/catalog/mod.rs
//
// Catalog domain: typed records produced by the content extraction layer.
// All entities are transient, computed per request and never cached here.

mod entity;

pub use entity::{
    slug_from_link, title_from_slug, AnimeDetail, AnimeSummary, DownloadLink, DownloadOption,
    EpisodeRef, EpisodeStreamInfo, Genre, SearchResult, StreamMirror, PLACEHOLDER_IMAGE,
};
