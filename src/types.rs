//! Core data types for catalogue items, filters and pages.
//!
//! - [`Category`] - the media kind being browsed (movie or tv)
//! - [`EraBucket`] - decade-based release filter and its [`DateRange`]
//! - [`Genre`] - reference data entry (id → name)
//! - [`MediaItem`] - one entry in a result listing
//! - [`MediaDetails`] - the full record behind a detail view
//! - [`ResultPage`] - one page of results as returned by a source
//!
//! # Examples
//!
//! ```rust
//! use eiga::types::*;
//!
//! let era = EraBucket::parse("2010s");
//! let range = era.date_range().unwrap();
//! assert_eq!(range.gte(), "2010-01-01");
//! assert_eq!(range.lte(), "2019-12-31");
//!
//! assert_eq!(Category::parse("tv"), Some(Category::Tv));
//! assert_eq!(Category::parse("series"), None);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base URL for TMDB-hosted images.
pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// The media kind being browsed.
///
/// Movie and tv have disjoint genre vocabularies and different upstream
/// field names, so most of the pipeline branches on this value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Movie,
    Tv,
}

impl Category {
    /// Both categories, in display order.
    pub const ALL: [Category; 2] = [Category::Movie, Category::Tv];

    /// Parses a URL or route value. Only `"movie"` and `"tv"` are recognized.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(Category::Movie),
            "tv" => Some(Category::Tv),
            _ => None,
        }
    }

    /// The value used in URLs and upstream paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Movie => "movie",
            Category::Tv => "tv",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Movie => "Movies",
            Category::Tv => "TV Shows",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive release-date range used by era filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Lower bound formatted as `YYYY-MM-DD`.
    pub fn gte(&self) -> String {
        self.from.format("%Y-%m-%d").to_string()
    }

    /// Upper bound formatted as `YYYY-MM-DD`.
    pub fn lte(&self) -> String {
        self.to.format("%Y-%m-%d").to_string()
    }

    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Coarse decade-based release filter.
///
/// The set is closed: any unrecognized URL value collapses to
/// [`EraBucket::All`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EraBucket {
    #[default]
    All,
    Twenties,
    Tens,
    Noughties,
    Classic,
}

impl EraBucket {
    /// All buckets, in display order.
    pub const ALL: [EraBucket; 5] = [
        EraBucket::All,
        EraBucket::Twenties,
        EraBucket::Tens,
        EraBucket::Noughties,
        EraBucket::Classic,
    ];

    /// Parses a URL value, collapsing anything unknown to `All`.
    pub fn parse(value: &str) -> Self {
        match value {
            "2020s" => EraBucket::Twenties,
            "2010s" => EraBucket::Tens,
            "2000s" => EraBucket::Noughties,
            "classic" => EraBucket::Classic,
            _ => EraBucket::All,
        }
    }

    /// The URL value for this bucket, `None` for `All` (kept out of URLs).
    pub fn as_query_value(&self) -> Option<&'static str> {
        match self {
            EraBucket::All => None,
            EraBucket::Twenties => Some("2020s"),
            EraBucket::Tens => Some("2010s"),
            EraBucket::Noughties => Some("2000s"),
            EraBucket::Classic => Some("classic"),
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            EraBucket::All => "All Time",
            EraBucket::Twenties => "2020s",
            EraBucket::Tens => "2010s",
            EraBucket::Noughties => "2000s",
            EraBucket::Classic => "90s - 50s",
        }
    }

    /// The fixed release-date range for this bucket, `None` for `All`.
    pub fn date_range(&self) -> Option<DateRange> {
        let (first_year, last_year) = match self {
            EraBucket::All => return None,
            EraBucket::Twenties => (2020, 2029),
            EraBucket::Tens => (2010, 2019),
            EraBucket::Noughties => (2000, 2009),
            EraBucket::Classic => (1950, 1999),
        };

        Some(DateRange {
            from: NaiveDate::from_ymd_opt(first_year, 1, 1)?,
            to: NaiveDate::from_ymd_opt(last_year, 12, 31)?,
        })
    }
}

/// Reference data entry mapping a genre id to its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// One page of results as returned by a source.
///
/// `items` keeps the order the server returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage<T> {
    pub page: u32,
    pub items: Vec<T>,
    pub total_pages: u32,
    pub total_items: u32,
}

impl<T> ResultPage<T> {
    /// An empty page, as a source reports when nothing matches.
    pub fn empty(page: u32) -> Self {
        Self {
            page,
            items: Vec::new(),
            total_pages: 0,
            total_items: 0,
        }
    }
}

/// A movie or tv show as it appears in a result listing.
///
/// TMDB numeric ids are carried as strings so that OMDb `imdbID`s fit the
/// same type.
///
/// # Examples
///
/// ```rust
/// use eiga::types::{Category, ImageSize, MediaItem};
///
/// let item = MediaItem {
///     id: "272".to_string(),
///     category: Category::Movie,
///     title: "Batman Begins".to_string(),
///     overview: None,
///     poster_path: Some("/poster.jpg".to_string()),
///     backdrop_path: None,
///     release_date: Some("2005-06-15".to_string()),
///     vote_average: Some(7.7),
///     vote_count: Some(10000),
///     genre_ids: vec![28, 80],
/// };
///
/// assert_eq!(item.year(), Some("2005"));
/// assert_eq!(
///     item.poster_url(ImageSize::Medium).as_deref(),
///     Some("https://image.tmdb.org/t/p/w342/poster.jpg")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Identifier within the source
    pub id: String,

    pub category: Category,

    /// Movie title or show name
    pub title: String,

    pub overview: Option<String>,

    /// Image path (TMDB) or absolute image URL (OMDb)
    pub poster_path: Option<String>,

    pub backdrop_path: Option<String>,

    /// Release date (movies) or first air date (tv), `YYYY-MM-DD` or a bare year
    pub release_date: Option<String>,

    pub vote_average: Option<f64>,

    pub vote_count: Option<u32>,

    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl MediaItem {
    /// The four-digit release year, if known.
    pub fn year(&self) -> Option<&str> {
        release_year(self.release_date.as_deref())
    }

    pub fn poster_url(&self, size: ImageSize) -> Option<String> {
        image_url(ImageKind::Poster, self.poster_path.as_deref(), size)
    }

    pub fn backdrop_url(&self, size: ImageSize) -> Option<String> {
        image_url(ImageKind::Backdrop, self.backdrop_path.as_deref(), size)
    }
}

/// A credited cast member of a movie or show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

impl CastMember {
    pub fn profile_url(&self, size: ImageSize) -> Option<String> {
        image_url(ImageKind::Profile, self.profile_path.as_deref(), size)
    }
}

/// The full record behind a detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDetails {
    pub id: String,
    pub category: Category,
    pub title: String,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub status: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    /// Runtime in minutes (episode runtime for tv)
    pub runtime: Option<u32>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

impl MediaDetails {
    pub fn year(&self) -> Option<&str> {
        release_year(self.release_date.as_deref())
    }

    pub fn poster_url(&self, size: ImageSize) -> Option<String> {
        image_url(ImageKind::Poster, self.poster_path.as_deref(), size)
    }

    pub fn backdrop_url(&self, size: ImageSize) -> Option<String> {
        image_url(ImageKind::Backdrop, self.backdrop_path.as_deref(), size)
    }
}

/// Which kind of image a path refers to; each kind has its own size ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Poster,
    Backdrop,
    Profile,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageSize {
    Small,
    #[default]
    Medium,
    Large,
    Original,
}

impl ImageKind {
    /// The TMDB size token for this kind at `size`.
    pub fn size_token(&self, size: ImageSize) -> &'static str {
        match (self, size) {
            (_, ImageSize::Original) => "original",
            (ImageKind::Poster, ImageSize::Small) => "w185",
            (ImageKind::Poster, ImageSize::Medium) => "w342",
            (ImageKind::Poster, ImageSize::Large) => "w500",
            (ImageKind::Backdrop, ImageSize::Small) => "w300",
            (ImageKind::Backdrop, ImageSize::Medium) => "w780",
            (ImageKind::Backdrop, ImageSize::Large) => "w1280",
            (ImageKind::Profile, ImageSize::Small) => "w45",
            (ImageKind::Profile, ImageSize::Medium) => "w185",
            (ImageKind::Profile, ImageSize::Large) => "h632",
        }
    }
}

/// Builds a displayable image URL.
///
/// TMDB paths (`/abc.jpg`) are resolved against [`TMDB_IMAGE_BASE`]; absolute
/// URLs, as OMDb returns them, pass through unchanged. Empty paths yield `None`.
pub fn image_url(kind: ImageKind, path: Option<&str>, size: ImageSize) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path.to_string());
    }
    Some(format!("{}/{}{}", TMDB_IMAGE_BASE, kind.size_token(size), path))
}

fn release_year(date: Option<&str>) -> Option<&str> {
    let date = date?;
    let year = date.get(..4)?;
    year.chars().all(|c| c.is_ascii_digit()).then_some(year)
}
