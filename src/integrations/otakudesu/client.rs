// src/integrations/otakudesu/client.rs
//
// OtakuDesu scraping client
//
// Owns URL construction, per-operation timeouts, the detail politeness
// delay, and the degraded-result policy. All HTML interpretation lives in
// `parser`; all transport lives behind `PageFetcher`.

use std::sync::Arc;
use std::time::Duration;

use super::fetch::PageFetcher;
use super::parser;
use crate::domain::catalog::{
    AnimeDetail, AnimeSummary, EpisodeStreamInfo, Genre, SearchResult,
};
use crate::error::{AppError, AppResult};

pub const DEFAULT_BASE_URL: &str = "https://otakudesu.best";

/// The home page is heavy; everything else is a regular content page.
const LISTING_TIMEOUT: Duration = Duration::from_secs(20);
const PAGE_TIMEOUT: Duration = Duration::from_secs(15);

/// Single fixed pause before a detail fetch. Politeness toward the
/// upstream's rate limiter, not a retry backoff: one delay, one attempt.
const DETAIL_FETCH_DELAY: Duration = Duration::from_millis(500);

pub struct OtakuDesuClient {
    base_url: String,
    fetcher: Arc<dyn PageFetcher>,
}

impl OtakuDesuClient {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::with_base_url(fetcher, DEFAULT_BASE_URL)
    }

    /// Point the client somewhere else (mirrors, tests).
    pub fn with_base_url(fetcher: Arc<dyn PageFetcher>, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            fetcher,
        }
    }

    /// Latest-episode listing from the home page.
    ///
    /// Blocked access and an empty listing are indistinguishable here by
    /// design: the upstream is unreliable and empty is the safe degraded
    /// state for a browse page.
    pub async fn fetch_latest(&self) -> Vec<AnimeSummary> {
        let page = match self.fetcher.fetch(&self.base_url, LISTING_TIMEOUT).await {
            Ok(page) => page,
            Err(err) => {
                log::warn!("latest listing fetch failed: {}", err);
                return Vec::new();
            }
        };
        if page.blocked() {
            log::debug!("latest listing blocked with status {}", page.status);
            return Vec::new();
        }

        parser::parse_latest(&page.body)
    }

    /// Detail page for one anime.
    ///
    /// Always resolves to a renderable record: a blocked or failed fetch
    /// yields the placeholder synthesized from the slug.
    pub async fn fetch_detail(&self, slug: &str) -> AnimeDetail {
        let url = format!("{}/anime/{}", self.base_url, slug);

        tokio::time::sleep(DETAIL_FETCH_DELAY).await;

        let page = match self.fetcher.fetch(&url, PAGE_TIMEOUT).await {
            Ok(page) if !page.blocked() => page,
            Ok(page) => {
                log::warn!("detail fetch for {} blocked with status {}", slug, page.status);
                return AnimeDetail::unavailable(slug);
            }
            Err(err) => {
                log::warn!("detail fetch for {} failed: {}", slug, err);
                return AnimeDetail::unavailable(slug);
            }
        };

        parser::parse_detail(&page.body, slug)
    }

    /// Streaming and download links for one episode.
    ///
    /// The one operation that surfaces failure: there is no meaningful
    /// placeholder for a streaming link, so the caller gets an error and can
    /// offer a retry.
    pub async fn fetch_episode_links(&self, episode_slug: &str) -> AppResult<EpisodeStreamInfo> {
        let url = format!("{}/episode/{}", self.base_url, episode_slug);

        let page = self
            .fetcher
            .fetch(&url, PAGE_TIMEOUT)
            .await
            .map_err(|err| {
                log::warn!("episode links fetch for {} failed: {}", episode_slug, err);
                AppError::EpisodeLinks
            })?;
        if page.blocked() {
            log::warn!(
                "episode links fetch for {} blocked with status {}",
                episode_slug,
                page.status
            );
            return Err(AppError::EpisodeLinks);
        }

        Ok(parser::parse_episode_links(&page.body))
    }

    /// Search the upstream directly; on blocked access fall back to the
    /// latest listing filtered by case-insensitive title substring.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        let url = format!(
            "{}/?s={}&post_type=anime",
            self.base_url,
            urlencoding::encode(query)
        );

        match self.fetcher.fetch(&url, PAGE_TIMEOUT).await {
            Ok(page) if !page.blocked() => parser::parse_search_results(&page.body),
            Ok(page) => {
                log::debug!(
                    "search blocked with status {}, falling back to latest listing",
                    page.status
                );
                self.search_fallback(query).await
            }
            Err(err) => {
                log::warn!("search failed: {}, falling back to latest listing", err);
                self.search_fallback(query).await
            }
        }
    }

    async fn search_fallback(&self, query: &str) -> Vec<SearchResult> {
        let needle = query.to_lowercase();
        self.fetch_latest()
            .await
            .into_iter()
            .filter(|anime| anime.title.to_lowercase().contains(&needle))
            .map(SearchResult::from)
            .collect()
    }

    /// Genre index, deduplicated by slug. Blocked or failed is empty.
    pub async fn fetch_genres(&self) -> Vec<Genre> {
        let url = format!("{}/genre-list/", self.base_url);

        let page = match self.fetcher.fetch(&url, PAGE_TIMEOUT).await {
            Ok(page) => page,
            Err(err) => {
                log::warn!("genre index fetch failed: {}", err);
                return Vec::new();
            }
        };
        if page.blocked() {
            log::debug!("genre index blocked with status {}", page.status);
            return Vec::new();
        }

        parser::parse_genres(&page.body)
    }

    /// Listing for one genre. Blocked or failed is empty.
    pub async fn fetch_by_genre(&self, genre_slug: &str) -> Vec<AnimeSummary> {
        let url = format!("{}/genres/{}", self.base_url, genre_slug);

        let page = match self.fetcher.fetch(&url, PAGE_TIMEOUT).await {
            Ok(page) => page,
            Err(err) => {
                log::warn!("genre listing fetch for {} failed: {}", genre_slug, err);
                return Vec::new();
            }
        };
        if page.blocked() {
            return Vec::new();
        }

        parser::parse_genre_listing(&page.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::otakudesu::fetch::{FetchedPage, MockPageFetcher};

    const LATEST_PAGE: &str = r#"
    <div class="venz"><ul>
      <li>
        <div class="jdlflm">One Piece</div>
        <div class="epz">Episode 1120</div>
        <a href="https://otakudesu.best/anime/one-piece/"></a>
      </li>
      <li>
        <div class="jdlflm">Frieren</div>
        <div class="epz">Episode 28</div>
        <a href="https://otakudesu.best/anime/frieren/"></a>
      </li>
    </ul></div>
    "#;

    fn ok_page(body: &str) -> FetchedPage {
        FetchedPage {
            status: 200,
            body: body.to_string(),
        }
    }

    fn blocked_page() -> FetchedPage {
        FetchedPage {
            status: 403,
            body: String::new(),
        }
    }

    fn client_with(fetcher: MockPageFetcher) -> OtakuDesuClient {
        OtakuDesuClient::new(Arc::new(fetcher))
    }

    #[tokio::test]
    async fn test_fetch_latest_blocked_is_empty() {
        let mut fetcher = MockPageFetcher::new();
        fetcher.expect_fetch().returning(|_, _| Ok(blocked_page()));

        assert!(client_with(fetcher).fetch_latest().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_latest_transport_error_is_empty() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_, _| Err(AppError::Upstream("connection reset".to_string())));

        assert!(client_with(fetcher).fetch_latest().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_detail_blocked_yields_placeholder() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|url, _| url.ends_with("/anime/my-hero-academia"))
            .returning(|_, _| Ok(blocked_page()));

        let detail = client_with(fetcher).fetch_detail("my-hero-academia").await;

        assert!(detail.unavailable);
        assert_eq!(detail.title, "My Hero Academia");
        assert!(detail.genres.is_empty());
        assert!(detail.episodes.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_detail_parses_page() {
        let mut fetcher = MockPageFetcher::new();
        fetcher.expect_fetch().returning(|_, _| {
            Ok(ok_page(
                r#"<div class="jdlrx"><h1>Frieren</h1></div>
                   <div class="infozingle"><p>Status: Completed</p></div>"#,
            ))
        });

        let detail = client_with(fetcher).fetch_detail("frieren").await;

        assert!(!detail.unavailable);
        assert_eq!(detail.title, "Frieren");
        assert_eq!(detail.status, "Completed");
    }

    #[tokio::test]
    async fn test_fetch_episode_links_blocked_is_error() {
        let mut fetcher = MockPageFetcher::new();
        fetcher.expect_fetch().returning(|_, _| Ok(blocked_page()));

        let result = client_with(fetcher).fetch_episode_links("op-episode-1120").await;

        assert!(matches!(result, Err(AppError::EpisodeLinks)));
    }

    #[tokio::test]
    async fn test_fetch_episode_links_transport_error_is_error() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_, _| Err(AppError::Upstream("timeout".to_string())));

        let result = client_with(fetcher).fetch_episode_links("op-episode-1120").await;

        assert!(matches!(result, Err(AppError::EpisodeLinks)));
    }

    #[tokio::test]
    async fn test_search_encodes_query() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|url, _| url.contains("/?s=one%20piece&post_type=anime"))
            .returning(|_, _| Ok(ok_page("<html></html>")));

        assert!(client_with(fetcher).search("one piece").await.is_empty());
    }

    #[tokio::test]
    async fn test_search_blocked_falls_back_to_filtered_latest() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|url, _| url.contains("post_type=anime"))
            .times(1)
            .returning(|_, _| Ok(blocked_page()));
        fetcher
            .expect_fetch()
            .withf(|url, _| !url.contains("post_type=anime"))
            .times(1)
            .returning(|_, _| Ok(ok_page(LATEST_PAGE)));

        let results = client_with(fetcher).search("FRIEREN").await;

        // Case-insensitive substring match against the latest listing.
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Frieren");
        assert_eq!(results[0].rating, "N/A");
    }

    #[tokio::test]
    async fn test_search_fallback_failure_degrades_to_empty() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_, _| Err(AppError::Upstream("blocked".to_string())));

        assert!(client_with(fetcher).search("naruto").await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_genres_blocked_is_empty() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|url, _| url.ends_with("/genre-list/"))
            .returning(|_, _| Ok(blocked_page()));

        assert!(client_with(fetcher).fetch_genres().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_by_genre_parses_listing() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|url, _| url.ends_with("/genres/action"))
            .returning(|_, _| {
                Ok(ok_page(
                    r#"<div class="col-anime">
                         <div class="col-anime-title"><a href="/anime/bleach/">Bleach</a></div>
                       </div>"#,
                ))
            });

        let list = client_with(fetcher).fetch_by_genre("action").await;

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].slug, "bleach");
        assert_eq!(list[0].status, "Available");
    }
}
