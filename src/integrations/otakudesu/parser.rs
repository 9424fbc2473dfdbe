// src/integrations/otakudesu/parser.rs
//
// Pure HTML -> catalog record extraction
//
// The upstream theme changes markup without notice, so listing-style pages
// are parsed through an ordered strategy list: each strategy is a pure
// extractor over the document and the first one producing any results wins.
// Every function here takes markup and returns records; no I/O.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::domain::catalog::{
    slug_from_link, title_from_slug, AnimeDetail, AnimeSummary, DownloadLink, DownloadOption,
    EpisodeRef, EpisodeStreamInfo, Genre, SearchResult, StreamMirror, PLACEHOLDER_IMAGE,
};

// ============================================================================
// TEXT HELPERS
// ============================================================================

fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn text_of(element: ElementRef) -> String {
    clean_text(&element.text().collect::<String>())
}

/// First non-empty text under `scope` matching `selector`.
fn first_text(scope: ElementRef, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(text_of)
        .filter(|text| !text.is_empty())
}

/// First non-empty attribute value under `scope` matching `selector`.
fn first_attr(scope: ElementRef, selector: &Selector, name: &str) -> Option<String> {
    scope
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(name))
        .map(str::to_string)
        .filter(|value| !value.is_empty())
}

fn doc_first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).unwrap();
    document
        .select(&selector)
        .next()
        .map(text_of)
        .filter(|text| !text.is_empty())
}

fn doc_first_attr(document: &Html, css: &str, name: &str) -> Option<String> {
    let selector = Selector::parse(css).unwrap();
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(name))
        .map(str::to_string)
        .filter(|value| !value.is_empty())
}

/// Value after the first of `labels` occurring in `text`, if any.
fn strip_label(text: &str, labels: &[&str]) -> Option<String> {
    for label in labels {
        if let Some(idx) = text.find(label) {
            return Some(text[idx + label.len()..].trim().to_string());
        }
    }
    None
}

fn fill(slot: &mut Option<String>, value: String) {
    if slot.is_none() && !value.is_empty() {
        *slot = Some(value);
    }
}

// ============================================================================
// LATEST UPDATES
// ============================================================================

/// Parse the home-page "latest updates" listing.
///
/// Entries missing a title or a link are skipped; zero matches is an
/// ordinary empty result, never an error.
pub fn parse_latest(html: &str) -> Vec<AnimeSummary> {
    let document = Html::parse_document(html);

    let entry_selector = Selector::parse(".venz ul li").unwrap();
    let title_selector = Selector::parse(".jdlflm").unwrap();
    let episode_selector = Selector::parse(".epz").unwrap();
    let day_selector = Selector::parse(".epztipe").unwrap();
    let image_selector = Selector::parse("img").unwrap();
    let anchor_selector = Selector::parse("a").unwrap();

    let mut list = Vec::new();
    for entry in document.select(&entry_selector) {
        let title = first_text(entry, &title_selector).unwrap_or_default();
        let link = first_attr(entry, &anchor_selector, "href").unwrap_or_default();
        if title.is_empty() || link.is_empty() {
            continue;
        }

        list.push(AnimeSummary {
            title,
            episode: first_text(entry, &episode_selector).unwrap_or_default(),
            image: first_attr(entry, &image_selector, "src")
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            slug: slug_from_link(&link),
            link,
            status: "Ongoing".to_string(),
            day: first_text(entry, &day_selector),
            rating: None,
        });
    }

    list
}

// ============================================================================
// ANIME DETAIL
// ============================================================================

/// Labelled fields of the detail-page info block.
///
/// One pass over the info rows matches each row against these tags instead
/// of re-scanning every row for every label. The source serves Indonesian
/// labels with occasional English variants; both are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailField {
    Japanese,
    AlternativeTitle,
    Rating,
    Producer,
    Type,
    Status,
    TotalEpisodes,
    Duration,
    ReleaseDate,
    Studio,
    Genre,
}

const DETAIL_FIELDS: &[DetailField] = &[
    DetailField::Japanese,
    DetailField::AlternativeTitle,
    DetailField::Rating,
    DetailField::Producer,
    DetailField::Type,
    DetailField::Status,
    DetailField::TotalEpisodes,
    DetailField::Duration,
    DetailField::ReleaseDate,
    DetailField::Studio,
    DetailField::Genre,
];

impl DetailField {
    fn labels(self) -> &'static [&'static str] {
        match self {
            DetailField::Japanese => &["Japanese:"],
            DetailField::AlternativeTitle => &["Judul:"],
            DetailField::Rating => &["Skor:", "Score:"],
            DetailField::Producer => &["Produser:", "Producer:"],
            DetailField::Type => &["Tipe:", "Type:"],
            DetailField::Status => &["Status:"],
            DetailField::TotalEpisodes => &["Total Episode:", "Episodes:"],
            DetailField::Duration => &["Durasi:", "Duration:"],
            DetailField::ReleaseDate => &["Tanggal Rilis:", "Released:"],
            DetailField::Studio => &["Studio:"],
            DetailField::Genre => &["Genre:", "Genres:"],
        }
    }

    /// First field whose label occurs in the row text, with the remainder
    /// after the label as the raw value.
    fn match_row(text: &str) -> Option<(DetailField, String)> {
        for field in DETAIL_FIELDS {
            if let Some(value) = strip_label(text, field.labels()) {
                return Some((*field, value));
            }
        }
        None
    }
}

/// Parse an anime detail page.
///
/// Every absent field gets its documented default; the result is always
/// structurally complete. The episode list is served newest-first and is
/// reversed to reading order.
pub fn parse_detail(html: &str, slug: &str) -> AnimeDetail {
    let document = Html::parse_document(html);

    let title = doc_first_text(&document, ".jdlrx h1")
        .or_else(|| doc_first_text(&document, "h1.entry-title"))
        .unwrap_or_else(|| title_from_slug(slug));

    let image = doc_first_attr(&document, ".fotoanime img", "src")
        .or_else(|| doc_first_attr(&document, ".wp-post-image", "src"))
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

    let synopsis = doc_first_text(&document, ".sinopc p")
        .or_else(|| doc_first_text(&document, ".entry-content p"))
        .unwrap_or_else(|| "No synopsis available.".to_string());

    let info_selector = Selector::parse(".infozingle p, .info p, .spe span").unwrap();
    let anchor_selector = Selector::parse("a").unwrap();

    let mut japanese = None;
    let mut alternative_title = None;
    let mut rating = None;
    let mut producer = None;
    let mut anime_type = None;
    let mut status = None;
    let mut total_episodes = None;
    let mut duration = None;
    let mut release_date = None;
    let mut studio = None;
    let mut genres: Option<Vec<String>> = None;

    for row in document.select(&info_selector) {
        let text = text_of(row);
        let Some((field, value)) = DetailField::match_row(&text) else {
            continue;
        };

        match field {
            DetailField::Japanese => fill(&mut japanese, value),
            DetailField::AlternativeTitle => fill(&mut alternative_title, value),
            DetailField::Rating => fill(&mut rating, value),
            DetailField::Producer => fill(&mut producer, value),
            DetailField::Type => fill(&mut anime_type, value),
            DetailField::Status => fill(&mut status, value),
            DetailField::TotalEpisodes => fill(&mut total_episodes, value),
            DetailField::Duration => fill(&mut duration, value),
            DetailField::ReleaseDate => fill(&mut release_date, value),
            DetailField::Studio => fill(&mut studio, value),
            DetailField::Genre => {
                let names: Vec<String> = row
                    .select(&anchor_selector)
                    .map(text_of)
                    .filter(|name| !name.is_empty())
                    .collect();
                if genres.is_none() && !names.is_empty() {
                    genres = Some(names);
                }
            }
        }
    }

    let episode_selector =
        Selector::parse(".episodelist ul li, .eplister ul li, .lstepsiode ul li").unwrap();

    let mut episodes = Vec::new();
    for item in document.select(&episode_selector) {
        let Some(anchor) = item.select(&anchor_selector).next() else {
            continue;
        };
        let title = text_of(anchor);
        let link = anchor.value().attr("href").unwrap_or_default().to_string();
        if title.is_empty() || link.is_empty() {
            continue;
        }
        episodes.push(EpisodeRef {
            title,
            slug: slug_from_link(&link),
            link,
        });
    }
    episodes.reverse();

    AnimeDetail {
        slug: slug.to_string(),
        title,
        image,
        synopsis,
        rating: rating.unwrap_or_else(|| "N/A".to_string()),
        anime_type: anime_type.unwrap_or_else(|| "TV".to_string()),
        status: status.unwrap_or_else(|| "Unknown".to_string()),
        total_episodes: total_episodes.unwrap_or_else(|| "Unknown".to_string()),
        duration: duration.unwrap_or_else(|| "24 min".to_string()),
        release_date: release_date.unwrap_or_else(|| "Unknown".to_string()),
        producer: producer.unwrap_or_else(|| "Unknown".to_string()),
        studio: studio.unwrap_or_else(|| "Unknown".to_string()),
        japanese,
        alternative_title,
        genres: genres.unwrap_or_default(),
        episodes,
        unavailable: false,
    }
}

// ============================================================================
// EPISODE STREAMING / DOWNLOAD LINKS
// ============================================================================

/// Parse streaming mirrors and grouped download links from an episode page.
pub fn parse_episode_links(html: &str) -> EpisodeStreamInfo {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a").unwrap();

    let title = doc_first_text(&document, ".venutama h1").unwrap_or_default();

    let mirror_selector = Selector::parse(".mirrorstream ul li").unwrap();
    let mut streaming = Vec::new();
    for item in document.select(&mirror_selector) {
        let Some(anchor) = item.select(&anchor_selector).next() else {
            continue;
        };
        let quality = text_of(anchor);
        let url = anchor.value().attr("href").unwrap_or_default().to_string();
        if quality.is_empty() || url.is_empty() {
            continue;
        }
        streaming.push(StreamMirror { quality, url });
    }

    let download_selector = Selector::parse(".download ul li").unwrap();
    let quality_selector = Selector::parse("strong").unwrap();
    let mut download = Vec::new();
    for item in document.select(&download_selector) {
        let quality = first_text(item, &quality_selector).unwrap_or_default();
        let links: Vec<DownloadLink> = item
            .select(&anchor_selector)
            .filter_map(|anchor| {
                let host = text_of(anchor);
                let url = anchor.value().attr("href")?.to_string();
                (!host.is_empty() && !url.is_empty()).then_some(DownloadLink { host, url })
            })
            .collect();
        if quality.is_empty() || links.is_empty() {
            continue;
        }
        download.push(DownloadOption { quality, links });
    }

    EpisodeStreamInfo {
        title,
        streaming,
        download,
    }
}

// ============================================================================
// SEARCH
// ============================================================================

/// One markup layout the search page has been seen using.
struct SearchStrategy {
    container: &'static str,
    title: &'static str,
    /// CSS for the labelled metadata rows (genres/status/rating), when the
    /// layout has them.
    meta_rows: Option<&'static str>,
}

const SEARCH_STRATEGIES: &[SearchStrategy] = &[
    SearchStrategy {
        container: ".chivsrc li",
        title: "h2 a",
        meta_rows: Some(".set"),
    },
    SearchStrategy {
        container: ".venz ul li",
        title: ".jdlflm",
        meta_rows: None,
    },
    SearchStrategy {
        container: "ul.chivsrc li",
        title: "a",
        meta_rows: Some(".set"),
    },
];

/// Parse search results, trying each known layout in order.
/// First strategy yielding at least one result wins.
pub fn parse_search_results(html: &str) -> Vec<SearchResult> {
    let document = Html::parse_document(html);
    for strategy in SEARCH_STRATEGIES {
        let results = extract_search_results(&document, strategy);
        if !results.is_empty() {
            return results;
        }
    }
    Vec::new()
}

fn extract_search_results(document: &Html, strategy: &SearchStrategy) -> Vec<SearchResult> {
    let container_selector = Selector::parse(strategy.container).unwrap();
    let title_selector = Selector::parse(strategy.title).unwrap();
    let image_selector = Selector::parse("img").unwrap();
    let anchor_selector = Selector::parse("a").unwrap();

    let mut results = Vec::new();
    for entry in document.select(&container_selector) {
        let title_el = entry.select(&title_selector).next();
        let title = title_el.map(text_of).unwrap_or_default();
        let link = title_el
            .and_then(|el| el.value().attr("href").map(str::to_string))
            .filter(|href| !href.is_empty())
            .or_else(|| first_attr(entry, &anchor_selector, "href"))
            .unwrap_or_default();
        if title.is_empty() || link.is_empty() {
            continue;
        }

        let mut genres = Vec::new();
        let mut status = None;
        let mut rating = None;
        if let Some(rows_css) = strategy.meta_rows {
            let rows_selector = Selector::parse(rows_css).unwrap();
            for row in entry.select(&rows_selector) {
                let text = text_of(row);
                if let Some(value) = strip_label(&text, &["Genres:", "Genre:"]) {
                    genres.extend(
                        value
                            .split(',')
                            .map(|genre| genre.trim().to_string())
                            .filter(|genre| !genre.is_empty()),
                    );
                } else if let Some(value) = strip_label(&text, &["Status:"]) {
                    fill(&mut status, value);
                } else if let Some(value) = strip_label(&text, &["Rating:"]) {
                    fill(&mut rating, value);
                }
            }
        }

        results.push(SearchResult {
            title,
            image: first_attr(entry, &image_selector, "src")
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            slug: slug_from_link(&link),
            link,
            genres,
            status: status.unwrap_or_else(|| "Unknown".to_string()),
            rating: rating.unwrap_or_else(|| "N/A".to_string()),
        });
    }

    results
}

// ============================================================================
// GENRES
// ============================================================================

fn genre_path_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/genres/").expect("valid genre path pattern"))
}

/// Parse the genre index: every anchor whose href matches the genre-path
/// pattern, deduplicated by slug.
///
/// Labels that are empty or implausibly long (>= 50 chars) are layout
/// artifacts and are dropped.
pub fn parse_genres(html: &str) -> Vec<Genre> {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a").unwrap();

    let mut genres = Vec::new();
    let mut seen = HashSet::new();
    for anchor in document.select(&anchor_selector) {
        let Some(link) = anchor.value().attr("href") else {
            continue;
        };
        if !genre_path_pattern().is_match(link) {
            continue;
        }

        let name = text_of(anchor);
        if name.is_empty() || name.chars().count() >= 50 {
            continue;
        }

        let slug = slug_from_link(link);
        if slug.is_empty() || !seen.insert(slug.clone()) {
            continue;
        }

        genres.push(Genre {
            name,
            slug,
            link: link.to_string(),
        });
    }

    genres
}

// ============================================================================
// GENRE LISTING
// ============================================================================

/// One markup layout a by-genre listing page has been seen using.
struct ListingStrategy {
    container: &'static str,
    title: &'static str,
    image: &'static str,
    rating: &'static str,
}

const GENRE_LISTING_STRATEGIES: &[ListingStrategy] = &[
    ListingStrategy {
        container: ".col-anime",
        title: ".col-anime-title a",
        image: ".col-anime-cover img",
        rating: ".col-anime-rating",
    },
    ListingStrategy {
        container: ".venz ul li",
        title: ".jdlflm",
        image: "img",
        rating: ".epztipe",
    },
    ListingStrategy {
        container: ".chivsrc li",
        title: "h2 a",
        image: "img",
        rating: ".set",
    },
];

/// Parse a by-genre listing page, trying each known layout in order.
/// Same first-match-wins policy as search.
pub fn parse_genre_listing(html: &str) -> Vec<AnimeSummary> {
    let document = Html::parse_document(html);
    for strategy in GENRE_LISTING_STRATEGIES {
        let list = extract_genre_listing(&document, strategy);
        if !list.is_empty() {
            return list;
        }
    }
    Vec::new()
}

fn extract_genre_listing(document: &Html, strategy: &ListingStrategy) -> Vec<AnimeSummary> {
    let container_selector = Selector::parse(strategy.container).unwrap();
    let title_selector = Selector::parse(strategy.title).unwrap();
    let image_selector = Selector::parse(strategy.image).unwrap();
    let rating_selector = Selector::parse(strategy.rating).unwrap();
    let anchor_selector = Selector::parse("a").unwrap();

    let mut list = Vec::new();
    for entry in document.select(&container_selector) {
        let title_el = entry.select(&title_selector).next();
        let title = title_el.map(text_of).unwrap_or_default();
        let link = title_el
            .and_then(|el| el.value().attr("href").map(str::to_string))
            .filter(|href| !href.is_empty())
            .or_else(|| first_attr(entry, &anchor_selector, "href"))
            .unwrap_or_default();
        if title.is_empty() || link.is_empty() {
            continue;
        }

        // Some layouts have a dedicated rating cell, others reuse labelled
        // `.set` rows; a row carrying some other label is not a rating.
        let rating = entry
            .select(&rating_selector)
            .map(text_of)
            .find_map(|text| match strip_label(&text, &["Rating:"]) {
                Some(value) => (!value.is_empty()).then_some(value),
                None => (!text.is_empty() && !text.contains(':')).then_some(text),
            });

        list.push(AnimeSummary {
            title,
            episode: String::new(),
            image: first_attr(entry, &image_selector, "src")
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            slug: slug_from_link(&link),
            link,
            status: "Available".to_string(),
            day: None,
            rating,
        });
    }

    list
}

// ============================================================================
// TESTS
// ============================================================================
