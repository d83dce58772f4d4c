use crate::{
    config::{Config, DEFAULT_TMDB_BASE_URL},
    error::{Error, Result},
    net::HttpClient,
    params::{ParamBag, SearchQuery},
    source::Source,
    types::{CastMember, Category, Genre, MediaDetails, MediaItem, ResultPage},
};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// TMDB paginated list response
#[derive(Debug, Deserialize)]
pub(crate) struct TmdbPage {
    page: u32,
    #[serde(default)]
    results: Vec<TmdbListItem>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u32,
}

/// Movie or tv entry as listed by discover/search
#[derive(Debug, Deserialize)]
pub(crate) struct TmdbListItem {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    vote_average: Option<f64>,
    vote_count: Option<u32>,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

/// Movie or tv details with appended credits
#[derive(Debug, Deserialize)]
pub(crate) struct TmdbDetails {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    overview: Option<String>,
    tagline: Option<String>,
    status: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    runtime: Option<u32>,
    #[serde(default)]
    episode_run_time: Vec<u32>,
    vote_average: Option<f64>,
    vote_count: Option<u32>,
    #[serde(default)]
    genres: Vec<Genre>,
    homepage: Option<String>,
    imdb_id: Option<String>,
    credits: Option<TmdbCredits>,
}

#[derive(Debug, Deserialize)]
struct TmdbCredits {
    #[serde(default)]
    cast: Vec<TmdbCastMember>,
}

#[derive(Debug, Deserialize)]
struct TmdbCastMember {
    name: String,
    character: Option<String>,
    profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenreList {
    #[serde(default)]
    genres: Vec<Genre>,
}

/// Source backed by The Movie Database (TMDB) v3 API.
///
/// Supports structured discover filters (genres, release-date ranges,
/// minimum vote average), free-text search, details with credits, and
/// per-category genre lists.
///
/// Authenticates with a read access token (bearer header) or a v3 API key
/// (query parameter).
///
/// # Examples
///
/// ```rust,no_run
/// use eiga::prelude::*;
/// use eiga::sources::TmdbSource;
///
/// # async fn example() -> eiga::Result<()> {
/// let source = TmdbSource::with_token("<read access token>");
/// let page = source.search(Category::Movie, &SearchQuery::new("batman", 1)).await?;
/// println!("{} of {} pages", page.page, page.total_pages);
/// # Ok(())
/// # }
/// ```
pub struct TmdbSource {
    client: HttpClient,
    api_base: String,
    api_key: Option<String>,
    language: Option<String>,
}

impl TmdbSource {
    /// Create a TMDB source authenticated with a read access token
    pub fn with_token(token: &str) -> Self {
        Self {
            client: Self::default_client().with_header("Authorization", &format!("Bearer {}", token)),
            api_base: DEFAULT_TMDB_BASE_URL.to_string(),
            api_key: None,
            language: None,
        }
    }

    /// Create a TMDB source authenticated with a v3 API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            client: Self::default_client(),
            api_base: DEFAULT_TMDB_BASE_URL.to_string(),
            api_key: Some(api_key.into()),
            language: None,
        }
    }

    /// Create a TMDB source from configuration.
    ///
    /// # Errors
    ///
    /// * [`Error::Config`] - If neither a token nor an API key is configured
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = HttpClient::new("tmdb")
            .with_rate_limit(config.rate_limit_ms)
            .with_max_retries(config.max_retries);

        let client = match (&config.tmdb_token, &config.tmdb_api_key) {
            (Some(token), _) => client.with_header("Authorization", &format!("Bearer {}", token)),
            (None, Some(_)) => client,
            (None, None) => {
                return Err(Error::config(
                    "TMDB requires EIGA_TMDB_TOKEN or EIGA_TMDB_API_KEY",
                ));
            }
        };

        Ok(Self {
            client,
            api_base: config.tmdb_base_url.trim_end_matches('/').to_string(),
            api_key: config.tmdb_api_key.clone(),
            language: config.language.clone(),
        })
    }

    /// Response language, for example `en-US`
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Point the source at another API root (a proxy or a test server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn default_client() -> HttpClient {
        HttpClient::new("tmdb").with_rate_limit(250).with_max_retries(3)
    }

    /// Request parameters with credentials and language appended
    fn request_params<'a>(
        &self,
        params: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Vec<(String, String)> {
        let mut all: Vec<(String, String)> = params
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if let Some(key) = &self.api_key {
            all.push(("api_key".to_string(), key.clone()));
        }
        if let Some(language) = &self.language {
            all.push(("language".to_string(), language.clone()));
        }
        all
    }

    async fn fetch_page(
        &self,
        path: &str,
        category: Category,
        params: Vec<(String, String)>,
    ) -> Result<ResultPage<MediaItem>> {
        let url = format!("{}/{}", self.api_base, path);
        let response: TmdbPage = self.client.get_json_with(&url, &params).await?;
        debug!(
            path,
            page = response.page,
            results = response.results.len(),
            "tmdb page fetched"
        );
        Ok(map_page(response, category))
    }
}

pub(crate) fn map_page(page: TmdbPage, category: Category) -> ResultPage<MediaItem> {
    ResultPage {
        page: page.page,
        items: page
            .results
            .into_iter()
            .map(|item| map_list_item(item, category))
            .collect(),
        total_pages: page.total_pages,
        total_items: page.total_results,
    }
}

/// Map a TMDB list entry to a MediaItem
fn map_list_item(item: TmdbListItem, category: Category) -> MediaItem {
    let (title, release_date) = match category {
        Category::Movie => (item.title.or(item.name), item.release_date.or(item.first_air_date)),
        Category::Tv => (item.name.or(item.title), item.first_air_date.or(item.release_date)),
    };

    MediaItem {
        id: item.id.to_string(),
        category,
        title: title.unwrap_or_default(),
        overview: non_empty(item.overview),
        poster_path: non_empty(item.poster_path),
        backdrop_path: non_empty(item.backdrop_path),
        release_date: non_empty(release_date),
        vote_average: item.vote_average,
        vote_count: item.vote_count,
        genre_ids: item.genre_ids,
    }
}

/// Map TMDB details (with credits) to MediaDetails
pub(crate) fn map_details(details: TmdbDetails, category: Category) -> MediaDetails {
    let (title, release_date, runtime) = match category {
        Category::Movie => (
            details.title.or(details.name),
            details.release_date.or(details.first_air_date),
            details.runtime,
        ),
        Category::Tv => (
            details.name.or(details.title),
            details.first_air_date.or(details.release_date),
            details.episode_run_time.first().copied().or(details.runtime),
        ),
    };

    let cast: Vec<CastMember> = details
        .credits
        .map(|credits| {
            credits
                .cast
                .into_iter()
                .map(|member| CastMember {
                    name: member.name,
                    character: non_empty(member.character),
                    profile_path: non_empty(member.profile_path),
                })
                .collect()
        })
        .unwrap_or_default();

    MediaDetails {
        id: details.id.to_string(),
        category,
        title: title.unwrap_or_default(),
        overview: non_empty(details.overview),
        tagline: non_empty(details.tagline),
        status: non_empty(details.status),
        poster_path: non_empty(details.poster_path),
        backdrop_path: non_empty(details.backdrop_path),
        release_date: non_empty(release_date),
        runtime: runtime.filter(|&minutes| minutes > 0),
        vote_average: details.vote_average,
        vote_count: details.vote_count,
        genres: details.genres,
        homepage: non_empty(details.homepage),
        imdb_id: non_empty(details.imdb_id),
        cast,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl Source for TmdbSource {
    fn id(&self) -> &'static str {
        "tmdb"
    }

    fn name(&self) -> &'static str {
        "The Movie Database"
    }

    fn base_url(&self) -> &str {
        &self.api_base
    }

    async fn discover(
        &self,
        category: Category,
        params: &ParamBag,
    ) -> Result<ResultPage<MediaItem>> {
        let params = self.request_params(params.iter());
        self.fetch_page(&format!("discover/{}", category), category, params)
            .await
    }

    async fn search(
        &self,
        category: Category,
        query: &SearchQuery,
    ) -> Result<ResultPage<MediaItem>> {
        let page = query.page.to_string();
        let params = self.request_params([("query", query.query.as_str()), ("page", page.as_str())]);
        self.fetch_page(&format!("search/{}", category), category, params)
            .await
    }

    async fn details(&self, category: Category, id: &str) -> Result<MediaDetails> {
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::not_found(format!("{} with ID '{}'", category, id)));
        }

        let url = format!("{}/{}/{}", self.api_base, category, id);
        let params = self.request_params([("append_to_response", "credits")]);
        let details: TmdbDetails = self.client.get_json_with(&url, &params).await?;
        Ok(map_details(details, category))
    }

    async fn genres(&self, category: Category) -> Result<Vec<Genre>> {
        let url = format!("{}/genre/{}/list", self.api_base, category);
        let params = self.request_params(std::iter::empty());
        let list: TmdbGenreList = self.client.get_json_with(&url, &params).await?;
        Ok(list.genres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_tv_listing_fields() {
        let page: TmdbPage = serde_json::from_value(json!({
            "page": 1,
            "results": [{
                "id": 1399,
                "name": "Game of Thrones",
                "first_air_date": "2011-04-17",
                "poster_path": "/got.jpg",
                "backdrop_path": "",
                "vote_average": 8.4,
                "vote_count": 22000,
                "genre_ids": [18, 10765]
            }],
            "total_pages": 7,
            "total_results": 140
        }))
        .unwrap();

        let page = map_page(page, Category::Tv);
        assert_eq!(page.total_pages, 7);
        assert_eq!(page.total_items, 140);
        let item = &page.items[0];
        assert_eq!(item.id, "1399");
        assert_eq!(item.title, "Game of Thrones");
        assert_eq!(item.release_date.as_deref(), Some("2011-04-17"));
        assert_eq!(item.backdrop_path, None);
        assert_eq!(item.genre_ids, vec![18, 10765]);
    }

    #[test]
    fn maps_movie_details_with_credits() {
        let details: TmdbDetails = serde_json::from_value(json!({
            "id": 272,
            "title": "Batman Begins",
            "overview": "After training with his mentor...",
            "poster_path": "/poster.jpg",
            "backdrop_path": "/backdrop.jpg",
            "genres": [{ "id": 28, "name": "Action" }],
            "vote_average": 7.7,
            "vote_count": 10000,
            "homepage": null,
            "tagline": null,
            "status": "Released",
            "release_date": "2005-06-15",
            "runtime": 140,
            "imdb_id": "tt0372784",
            "credits": { "cast": [{ "name": "Christian Bale", "character": "Bruce Wayne", "profile_path": null }] }
        }))
        .unwrap();

        let details = map_details(details, Category::Movie);
        assert_eq!(details.title, "Batman Begins");
        assert_eq!(details.runtime, Some(140));
        assert_eq!(details.homepage, None);
        assert_eq!(details.genres[0].name, "Action");
        assert_eq!(details.cast[0].character.as_deref(), Some("Bruce Wayne"));
    }
}
