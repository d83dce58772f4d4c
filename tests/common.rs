//! Common test utilities
//!
//! A scripted in-memory [`Source`] shared by the controller and session tests.
// Common test utilities - all must be public

use async_trait::async_trait;
use eiga::prelude::*;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::oneshot;

#[allow(dead_code)]
pub const TEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A request the mock received.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Discover { category: Category, params: ParamBag },
    Search { category: Category, query: SearchQuery },
    Details { category: Category, id: String },
    Genres(Category),
}

/// Scripted reply for one listing or details request.
pub enum Reply<T> {
    Ready(Result<T>),
    /// Resolves when the test sends on the paired channel.
    Gated(oneshot::Receiver<Result<T>>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> Result<T> {
        match self {
            Reply::Ready(result) => result,
            Reply::Gated(rx) => rx
                .await
                .unwrap_or_else(|_| Err(Error::Other("gate dropped".to_string()))),
        }
    }
}

/// In-memory source replaying scripted replies in order.
///
/// Listing requests (discover and search) share one queue. An exhausted queue
/// answers with an empty page.
#[derive(Default)]
pub struct MockSource {
    calls: Mutex<Vec<Call>>,
    listings: Mutex<VecDeque<Reply<ResultPage<MediaItem>>>>,
    details: Mutex<VecDeque<Reply<MediaDetails>>>,
    genres: Mutex<HashMap<Category, Vec<Genre>>>,
    genre_failures: Mutex<VecDeque<Error>>,
    genre_gates: Mutex<VecDeque<oneshot::Receiver<Result<Vec<Genre>>>>>,
}

#[allow(dead_code)]
impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, page: ResultPage<MediaItem>) -> &Self {
        self.listings.lock().push_back(Reply::Ready(Ok(page)));
        self
    }

    pub fn push_error(&self, error: Error) -> &Self {
        self.listings.lock().push_back(Reply::Ready(Err(error)));
        self
    }

    /// Queues a listing reply that waits for the returned sender.
    pub fn push_gate(&self) -> oneshot::Sender<Result<ResultPage<MediaItem>>> {
        let (tx, rx) = oneshot::channel();
        self.listings.lock().push_back(Reply::Gated(rx));
        tx
    }

    pub fn push_details(&self, result: Result<MediaDetails>) -> &Self {
        self.details.lock().push_back(Reply::Ready(result));
        self
    }

    pub fn push_details_gate(&self) -> oneshot::Sender<Result<MediaDetails>> {
        let (tx, rx) = oneshot::channel();
        self.details.lock().push_back(Reply::Gated(rx));
        tx
    }

    pub fn set_genres(&self, category: Category, genres: Vec<Genre>) -> &Self {
        self.genres.lock().insert(category, genres);
        self
    }

    /// The next genre request fails with `error`.
    pub fn fail_next_genres(&self, error: Error) -> &Self {
        self.genre_failures.lock().push_back(error);
        self
    }

    /// The next genre request waits until the returned sender fires.
    pub fn push_genres_gate(&self) -> oneshot::Sender<Result<Vec<Genre>>> {
        let (tx, rx) = oneshot::channel();
        self.genre_gates.lock().push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn listing_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Discover { .. } | Call::Search { .. }))
            .collect()
    }

    pub fn genre_calls(&self) -> Vec<Category> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Genres(category) => Some(category),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn next_listing(&self, page: u32) -> Reply<ResultPage<MediaItem>> {
        self.listings
            .lock()
            .pop_front()
            .unwrap_or_else(|| Reply::Ready(Ok(ResultPage::empty(page))))
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &'static str {
        "mock"
    }

    fn name(&self) -> &'static str {
        "Mock"
    }

    fn base_url(&self) -> &str {
        "https://mock.invalid"
    }

    async fn discover(&self, category: Category, params: &ParamBag) -> Result<ResultPage<MediaItem>> {
        self.record(Call::Discover {
            category,
            params: params.clone(),
        });
        let page = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
        let reply = self.next_listing(page);
        reply.resolve().await
    }

    async fn search(&self, category: Category, query: &SearchQuery) -> Result<ResultPage<MediaItem>> {
        self.record(Call::Search {
            category,
            query: query.clone(),
        });
        let reply = self.next_listing(query.page);
        reply.resolve().await
    }

    async fn details(&self, category: Category, id: &str) -> Result<MediaDetails> {
        self.record(Call::Details {
            category,
            id: id.to_string(),
        });
        let reply = self
            .details
            .lock()
            .pop_front()
            .unwrap_or_else(|| Reply::Ready(Err(Error::not_found(id))));
        reply.resolve().await
    }

    async fn genres(&self, category: Category) -> Result<Vec<Genre>> {
        self.record(Call::Genres(category));
        if let Some(error) = self.genre_failures.lock().pop_front() {
            return Err(error);
        }
        let gate = self.genre_gates.lock().pop_front();
        if let Some(rx) = gate {
            return Reply::Gated(rx).resolve().await;
        }
        Ok(self.genres.lock().get(&category).cloned().unwrap_or_default())
    }
}

#[allow(dead_code)]
pub fn item(id: u32, title: &str) -> MediaItem {
    MediaItem {
        id: id.to_string(),
        category: Category::Movie,
        title: title.to_string(),
        overview: None,
        poster_path: None,
        backdrop_path: None,
        release_date: Some("2005-06-15".to_string()),
        vote_average: Some(7.7),
        vote_count: Some(10_000),
        genre_ids: vec![28],
    }
}

/// A page holding one item per title, ids counting up from `first_id`.
#[allow(dead_code)]
pub fn page(number: u32, first_id: u32, titles: &[&str], total_pages: u32) -> ResultPage<MediaItem> {
    ResultPage {
        page: number,
        items: titles
            .iter()
            .enumerate()
            .map(|(i, title)| item(first_id + i as u32, title))
            .collect(),
        total_pages,
        total_items: total_pages * 20,
    }
}

#[allow(dead_code)]
pub fn details(id: &str, title: &str) -> MediaDetails {
    MediaDetails {
        id: id.to_string(),
        category: Category::Movie,
        title: title.to_string(),
        overview: Some("After training with his mentor...".to_string()),
        tagline: Some("Evil fears the knight.".to_string()),
        status: Some("Released".to_string()),
        poster_path: Some("/poster.jpg".to_string()),
        backdrop_path: None,
        release_date: Some("2005-06-15".to_string()),
        runtime: Some(140),
        vote_average: Some(7.7),
        vote_count: Some(10_000),
        genres: vec![Genre {
            id: 28,
            name: "Action".to_string(),
        }],
        homepage: None,
        imdb_id: Some("tt0372784".to_string()),
        cast: Vec::new(),
    }
}

#[allow(dead_code)]
pub fn genre(id: u32, name: &str) -> Genre {
    Genre {
        id,
        name: name.to_string(),
    }
}

#[allow(dead_code)]
pub fn titles(items: &[MediaItem]) -> Vec<&str> {
    items.iter().map(|i| i.title.as_str()).collect()
}
