use serde::{Deserialize, Serialize};

/// Thumbnail served whenever the source page carries no usable image.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-anime.jpg";

/// Last non-empty path segment of a link URL.
///
/// Slug derivation is identical for every scraped entity; no parser is
/// allowed to roll its own.
pub fn slug_from_link(link: &str) -> String {
    link.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("")
        .to_string()
}

/// Title-case a slug's dash-separated words
/// ("my-hero-academia" -> "My Hero Academia")
pub fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One entry of a listing page (latest updates, genre listing)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeSummary {
    pub title: String,
    /// Episode label as shown on the listing ("Episode 12"); empty on pages
    /// that do not carry one.
    #[serde(default)]
    pub episode: String,
    pub image: String,
    pub slug: String,
    pub link: String,
    pub status: String,
    /// Day-of-week label from the release schedule, when present.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub day: Option<String>,
    /// Rating cell from genre listings, when present.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rating: Option<String>,
}

/// Episode pointer inside an anime detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRef {
    pub title: String,
    pub slug: String,
    pub link: String,
}

/// Full detail-page record.
///
/// Always structurally complete: every field missing from the markup is
/// populated with its documented default, and a blocked fetch yields the
/// `unavailable` placeholder instead of an error so downstream code always
/// gets a renderable object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeDetail {
    pub slug: String,
    pub title: String,
    pub image: String,
    pub synopsis: String,
    pub rating: String,
    #[serde(rename = "type")]
    pub anime_type: String,
    pub status: String,
    #[serde(rename = "totalEpisodes")]
    pub total_episodes: String,
    pub duration: String,
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    pub producer: String,
    pub studio: String,
    /// Japanese-script title from the info table, when present.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub japanese: Option<String>,
    /// Alternate title ("Judul" row) from the info table, when present.
    #[serde(
        rename = "alternativeTitle",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub alternative_title: Option<String>,
    pub genres: Vec<String>,
    pub episodes: Vec<EpisodeRef>,
    /// Set when the source blocked or denied the fetch and the rest of the
    /// record is placeholder content.
    #[serde(rename = "_unavailable", default)]
    pub unavailable: bool,
}

impl AnimeDetail {
    /// Placeholder detail synthesized from the slug alone, returned when the
    /// source blocks the fetch.
    pub fn unavailable(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            title: title_from_slug(slug),
            image: PLACEHOLDER_IMAGE.to_string(),
            synopsis: "Anime details are temporarily unavailable due to access restrictions. \
                       Please try again later."
                .to_string(),
            rating: "N/A".to_string(),
            anime_type: "TV".to_string(),
            status: "Unknown".to_string(),
            total_episodes: "Unknown".to_string(),
            duration: "Unknown".to_string(),
            release_date: "Unknown".to_string(),
            producer: "Unknown".to_string(),
            studio: "Unknown".to_string(),
            japanese: None,
            alternative_title: None,
            genres: Vec::new(),
            episodes: Vec::new(),
            unavailable: true,
        }
    }
}

/// One streaming mirror on an episode page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMirror {
    pub quality: String,
    pub url: String,
}

/// One host offering a download at a given quality
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLink {
    pub host: String,
    pub url: String,
}

/// Download alternatives grouped by quality
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadOption {
    pub quality: String,
    pub links: Vec<DownloadLink>,
}

/// Streaming and download links for one episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeStreamInfo {
    pub title: String,
    pub streaming: Vec<StreamMirror>,
    pub download: Vec<DownloadOption>,
}

/// Search hit; summary-shaped but with genres attached when the search page
/// layout carries them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub image: String,
    pub slug: String,
    pub link: String,
    pub genres: Vec<String>,
    pub status: String,
    pub rating: String,
}

impl From<AnimeSummary> for SearchResult {
    fn from(summary: AnimeSummary) -> Self {
        Self {
            title: summary.title,
            image: summary.image,
            slug: summary.slug,
            link: summary.link,
            genres: Vec::new(),
            status: summary.status,
            rating: summary.rating.unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

/// Genre index entry, keyed (and deduplicated) by slug
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
    pub slug: String,
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_is_last_non_empty_segment() {
        assert_eq!(
            slug_from_link("https://otakudesu.best/anime/one-piece/"),
            "one-piece"
        );
        assert_eq!(slug_from_link("/anime/naruto"), "naruto");
        assert_eq!(slug_from_link(""), "");
    }

    #[test]
    fn test_title_from_slug_title_cases_words() {
        assert_eq!(title_from_slug("my-hero-academia"), "My Hero Academia");
        assert_eq!(title_from_slug("one-piece"), "One Piece");
        assert_eq!(title_from_slug("solo--leveling"), "Solo Leveling");
    }

    #[test]
    fn test_unavailable_placeholder_is_renderable() {
        let detail = AnimeDetail::unavailable("my-hero-academia");
        assert!(detail.unavailable);
        assert_eq!(detail.title, "My Hero Academia");
        assert_eq!(detail.image, PLACEHOLDER_IMAGE);
        assert_eq!(detail.rating, "N/A");
        assert!(detail.genres.is_empty());
        assert!(detail.episodes.is_empty());
    }

    #[test]
    fn test_detail_json_field_names() {
        let json = serde_json::to_value(AnimeDetail::unavailable("x")).unwrap();
        assert!(json.get("type").is_some());
        assert!(json.get("totalEpisodes").is_some());
        assert!(json.get("releaseDate").is_some());
        assert_eq!(json["_unavailable"], true);

        // Optional title rows are omitted entirely when absent.
        assert!(json.get("japanese").is_none());
        assert!(json.get("alternativeTitle").is_none());
    }

    #[test]
    fn test_detail_optional_titles_serialize_when_present() {
        let mut detail = AnimeDetail::unavailable("x");
        detail.japanese = Some("僕のヒーローアカデミア".to_string());
        detail.alternative_title = Some("My Hero Academia".to_string());

        let json = serde_json::to_value(detail).unwrap();
        assert_eq!(json["japanese"], "僕のヒーローアカデミア");
        assert_eq!(json["alternativeTitle"], "My Hero Academia");
    }

    #[test]
    fn test_summary_to_search_result_keeps_rating() {
        let summary = AnimeSummary {
            title: "Bleach".to_string(),
            episode: String::new(),
            image: PLACEHOLDER_IMAGE.to_string(),
            slug: "bleach".to_string(),
            link: "/anime/bleach/".to_string(),
            status: "Ongoing".to_string(),
            day: None,
            rating: Some("8.2".to_string()),
        };
        let result = SearchResult::from(summary);
        assert_eq!(result.rating, "8.2");
        assert!(result.genres.is_empty());
    }
}
