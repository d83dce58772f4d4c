use crate::{
    config::{Config, DEFAULT_OMDB_BASE_URL},
    error::{Error, Result},
    filters::FilterState,
    net::{HttpClient, json},
    params::{ParamBag, SearchQuery},
    source::Source,
    types::{CastMember, Category, Genre, MediaDetails, MediaItem, ResultPage},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Placeholder OMDb uses for missing fields
pub const EMPTY_DATA_VALUE: &str = "N/A";

/// Shown when a listing is requested without a search term
pub const DISCOVER_UNSUPPORTED_MESSAGE: &str = "Enter a title to search";

/// OMDb returns a fixed number of results per search page
pub const RESULTS_PER_PAGE: u32 = 10;

/// OMDb search response (after the envelope check)
#[derive(Debug, Deserialize)]
pub(crate) struct OmdbSearch {
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "totalResults", default)]
    total_results: String,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

/// OMDb title response (after the envelope check)
#[derive(Debug, Deserialize)]
pub(crate) struct OmdbDetails {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Released")]
    released: Option<String>,
    #[serde(rename = "Runtime")]
    runtime: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Actors")]
    actors: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes")]
    imdb_votes: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Website")]
    website: Option<String>,
}

/// Source backed by the Open Movie Database (OMDb).
///
/// OMDb is a key/string search API: every listing needs a search term, there
/// is no genre vocabulary, and failures come back as
/// `{"Response": "False", "Error": "..."}` with HTTP 200. Those errors are
/// surfaced verbatim.
///
/// # Examples
///
/// ```rust,no_run
/// use eiga::prelude::*;
/// use eiga::sources::OmdbSource;
///
/// # async fn example() -> eiga::Result<()> {
/// let source = OmdbSource::new("<api key>");
/// let page = source.search(Category::Tv, &SearchQuery::new("the office", 1)).await?;
/// for item in page.items {
///     println!("{} ({})", item.title, item.year().unwrap_or("?"));
/// }
/// # Ok(())
/// # }
/// ```
pub struct OmdbSource {
    client: HttpClient,
    api_base: String,
    api_key: String,
}

impl OmdbSource {
    /// Create an OMDb source with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: HttpClient::new("omdb")
                .with_rate_limit(250)
                .with_max_retries(3),
            api_base: DEFAULT_OMDB_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Create an OMDb source from configuration.
    ///
    /// # Errors
    ///
    /// * [`Error::Config`] - If no API key is configured
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .omdb_api_key
            .clone()
            .ok_or_else(|| Error::config("OMDb requires EIGA_OMDB_API_KEY"))?;

        Ok(Self {
            client: HttpClient::new("omdb")
                .with_rate_limit(config.rate_limit_ms)
                .with_max_retries(config.max_retries),
            api_base: config.omdb_base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Point the source at another API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// OMDb's `type` value for a category
    fn media_type(category: Category) -> &'static str {
        match category {
            Category::Movie => "movie",
            Category::Tv => "series",
        }
    }

    async fn request(&self, params: &[(&str, &str)]) -> Result<Value> {
        let mut all = vec![("apikey", self.api_key.as_str())];
        all.extend_from_slice(params);
        let url = format!("{}/", self.api_base);
        self.client.get_json_with(&url, &all).await
    }
}

/// Map an OMDb search response to a result page
pub(crate) fn map_search(search: OmdbSearch, category: Category, page: u32) -> ResultPage<MediaItem> {
    let total_items = search.total_results.trim().parse::<u32>().unwrap_or(0);
    ResultPage {
        page,
        items: search
            .search
            .into_iter()
            .map(|item| MediaItem {
                id: item.imdb_id,
                category,
                title: item.title,
                overview: None,
                poster_path: present(item.poster),
                backdrop_path: None,
                release_date: present(item.year),
                vote_average: None,
                vote_count: None,
                genre_ids: Vec::new(),
            })
            .collect(),
        total_pages: total_items.div_ceil(RESULTS_PER_PAGE),
        total_items,
    }
}

/// Map an OMDb title response to MediaDetails.
///
/// OMDb genres carry no ids; they are reported with id `0`.
pub(crate) fn map_details(details: OmdbDetails, category: Category) -> MediaDetails {
    let release_date = present(details.released)
        .and_then(|released| NaiveDate::parse_from_str(&released, "%d %b %Y").ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .or_else(|| present(details.year));

    let genres: Vec<Genre> = present(details.genre)
        .map(|genre| {
            split_list(&genre)
                .map(|name| Genre { id: 0, name })
                .collect()
        })
        .unwrap_or_default();

    let cast: Vec<CastMember> = parse_actors(details.actors.as_deref())
        .into_iter()
        .map(|name| CastMember {
            name,
            character: None,
            profile_path: None,
        })
        .collect();

    MediaDetails {
        id: details.imdb_id.clone(),
        category,
        title: details.title,
        overview: present(details.plot),
        tagline: None,
        status: None,
        poster_path: present(details.poster),
        backdrop_path: None,
        release_date,
        runtime: present(details.runtime).and_then(|r| {
            r.split_whitespace().next().and_then(|m| m.parse::<u32>().ok())
        }),
        vote_average: present(details.imdb_rating).and_then(|r| r.parse::<f64>().ok()),
        vote_count: present(details.imdb_votes).and_then(|v| v.replace(',', "").parse::<u32>().ok()),
        genres,
        homepage: present(details.website),
        imdb_id: Some(details.imdb_id),
        cast,
    }
}

/// Splits OMDb's comma-separated actor list, treating `"N/A"` as empty.
///
/// ```rust
/// use eiga::sources::omdb::parse_actors;
///
/// assert_eq!(parse_actors(Some("Christian Bale, Michael Caine")), vec!["Christian Bale", "Michael Caine"]);
/// assert!(parse_actors(Some("N/A")).is_empty());
/// assert!(parse_actors(None).is_empty());
/// ```
pub fn parse_actors(actors: Option<&str>) -> Vec<String> {
    match actors {
        None | Some(EMPTY_DATA_VALUE) => Vec::new(),
        Some(actors) => split_list(actors).collect(),
    }
}

fn split_list(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && v != EMPTY_DATA_VALUE
    })
}

#[async_trait]
impl Source for OmdbSource {
    fn id(&self) -> &'static str {
        "omdb"
    }

    fn name(&self) -> &'static str {
        "OMDb"
    }

    fn base_url(&self) -> &str {
        &self.api_base
    }

    /// OMDb cannot list without a search term, so browsing is reported as a
    /// business error asking for one.
    async fn discover(
        &self,
        category: Category,
        params: &ParamBag,
    ) -> Result<ResultPage<MediaItem>> {
        debug!(%category, page = ?params.get("page"), "omdb has no browse endpoint");
        Err(Error::source(self.id(), DISCOVER_UNSUPPORTED_MESSAGE))
    }

    async fn search(
        &self,
        category: Category,
        query: &SearchQuery,
    ) -> Result<ResultPage<MediaItem>> {
        let page = query.page.to_string();
        let body = self
            .request(&[
                ("s", query.query.as_str()),
                ("type", Self::media_type(category)),
                ("page", page.as_str()),
            ])
            .await?;

        let search: OmdbSearch = json::decode_envelope(self.id(), body)?;
        Ok(map_search(search, category, query.page))
    }

    async fn details(&self, category: Category, id: &str) -> Result<MediaDetails> {
        let body = self.request(&[("i", id), ("plot", "full")]).await?;
        let details: OmdbDetails = json::decode_envelope(self.id(), body)?;
        Ok(map_details(details, category))
    }

    async fn genres(&self, category: Category) -> Result<Vec<Genre>> {
        debug!(%category, "omdb has no genre list");
        Ok(Vec::new())
    }

    fn discover_params(&self, filter: &FilterState, page: u32) -> ParamBag {
        let mut params = ParamBag::new();
        params.set("type", Self::media_type(filter.category));
        params.set("page", page);
        params
    }
}
