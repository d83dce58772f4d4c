//! Results controller and genre cache tests
//!
//! Driven by the scripted mock source, no network access.

use eiga::prelude::*;
use std::sync::Arc;

mod common;
use common::{Call, MockSource, details, genre, page, titles};

fn controller(source: &Arc<MockSource>) -> ResultsController {
    ResultsController::new(source.clone())
}

fn filter(query: &str) -> FilterState {
    FilterState::from_query(&RawQuery::parse(query))
}

#[cfg(test)]
mod results_tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_state() {
        let source = Arc::new(MockSource::new());
        let state = controller(&source).snapshot();
        assert!(state.items.is_empty());
        assert_eq!(state.current_page, 1);
        assert_eq!(state.total_pages, 0);
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert!(!state.has_more());
    }

    #[tokio::test]
    async fn test_refresh_uses_discover_without_search() {
        let source = Arc::new(MockSource::new());
        source.push_page(page(1, 272, &["Batman Begins"], 3));
        let results = controller(&source);

        results.refresh(&filter("genres=28&era=2000s")).await;

        let state = results.snapshot();
        assert_eq!(titles(&state.items), vec!["Batman Begins"]);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.total_pages, 3);
        assert!(state.has_more());
        assert!(!state.loading);

        match &source.listing_calls()[0] {
            Call::Discover { category, params } => {
                assert_eq!(*category, Category::Movie);
                assert_eq!(params.get("with_genres"), Some("28"));
                assert_eq!(params.get("primary_release_date.gte"), Some("2000-01-01"));
            }
            other => panic!("expected discover, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refresh_uses_search_with_term() {
        let source = Arc::new(MockSource::new());
        source.push_page(page(1, 1396, &["Breaking Bad"], 1));
        let results = controller(&source);

        results.refresh(&filter("search=breaking&mediaType=tv&genres=18")).await;

        assert_eq!(
            source.listing_calls(),
            vec![Call::Search {
                category: Category::Tv,
                query: SearchQuery::new("breaking", 1),
            }]
        );
        assert!(!results.has_more());
    }

    #[tokio::test]
    async fn test_load_more_appends() {
        let source = Arc::new(MockSource::new());
        source
            .push_page(page(1, 1, &["Batman Begins"], 3))
            .push_page(page(2, 2, &["Batman Returns"], 3));
        let results = controller(&source);

        results.refresh(&filter("genres=28")).await;
        results.load_more().await;

        let state = results.snapshot();
        assert_eq!(titles(&state.items), vec!["Batman Begins", "Batman Returns"]);
        assert_eq!(state.current_page, 2);
        assert!(state.has_more());

        // load_more reuses the last filter
        match &source.listing_calls()[1] {
            Call::Discover { params, .. } => {
                assert_eq!(params.get("page"), Some("2"));
                assert_eq!(params.get("with_genres"), Some("28"));
            }
            other => panic!("expected discover, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_page_one_failure_clears_items() {
        let source = Arc::new(MockSource::new());
        source
            .push_page(page(1, 1, &["Batman Begins"], 3))
            .push_error(Error::Other("Network error".to_string()));
        let results = controller(&source);

        results.refresh(&FilterState::default()).await;
        assert_eq!(results.items().len(), 1);

        results.refresh(&FilterState::default()).await;
        let state = results.snapshot();
        assert!(state.items.is_empty());
        assert_eq!(state.total_pages, 0);
        assert_eq!(state.error.as_deref(), Some("Network error"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_later_page_failure_keeps_items() {
        let source = Arc::new(MockSource::new());
        source
            .push_page(page(1, 1, &["Batman Begins"], 3))
            .push_error(Error::Other("Network error".to_string()));
        let results = controller(&source);

        results.refresh(&FilterState::default()).await;
        results.load_more().await;

        let state = results.snapshot();
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.error.as_deref(), Some("Network error"));
        assert_eq!(state.current_page, 1);
        assert_eq!(state.total_pages, 3);
    }

    #[tokio::test]
    async fn test_failure_without_message_uses_fallback() {
        let source = Arc::new(MockSource::new());
        source.push_error(Error::Other(String::new()));
        let results = controller(&source);

        results.refresh(&FilterState::default()).await;
        assert_eq!(results.error().as_deref(), Some("Something went wrong"));
    }

    #[tokio::test]
    async fn test_business_error_is_shown_verbatim() {
        let source = Arc::new(MockSource::new());
        source.push_error(Error::source("omdb", "Too many results."));
        let results = controller(&source);

        results.refresh(&filter("search=a")).await;
        assert_eq!(results.error().as_deref(), Some("Too many results."));
    }

    #[tokio::test]
    async fn test_new_fetch_clears_previous_error() {
        let source = Arc::new(MockSource::new());
        source
            .push_error(Error::Other("Network error".to_string()))
            .push_page(page(1, 1, &["Alien"], 1));
        let results = controller(&source);

        results.refresh(&FilterState::default()).await;
        assert!(results.error().is_some());

        results.refresh(&FilterState::default()).await;
        assert_eq!(results.error(), None);
        assert_eq!(titles(&results.items()), vec!["Alien"]);
    }

    #[tokio::test]
    async fn test_apply_filters_only_refetches_on_change() {
        let source = Arc::new(MockSource::new());
        let results = controller(&source);

        assert!(results.apply_filters(&filter("genres=28")).await);
        assert!(!results.apply_filters(&filter("genres=28")).await);
        assert!(results.apply_filters(&filter("genres=28,12")).await);
        assert_eq!(source.listing_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let source = Arc::new(MockSource::new());
        let slow = source.push_gate();
        source.push_page(page(1, 2, &["Fresh"], 1));
        let results = controller(&source);
        let old = filter("genres=28");

        futures::join!(results.refresh(&old), async {
            results.refresh(&filter("genres=12")).await;
            assert_eq!(titles(&results.items()), vec!["Fresh"]);
            slow.send(Ok(page(1, 1, &["Stale"], 9))).ok();
        });

        let state = results.snapshot();
        assert_eq!(titles(&state.items), vec!["Fresh"]);
        assert_eq!(state.total_pages, 1);
        assert!(!state.loading);
        assert_eq!(results.last_filter(), Some(filter("genres=12")));
    }

    #[tokio::test]
    async fn test_stale_failure_is_discarded() {
        let source = Arc::new(MockSource::new());
        let slow = source.push_gate();
        source.push_page(page(1, 2, &["Fresh"], 1));
        let results = controller(&source);
        let old = filter("era=2020s");

        futures::join!(results.refresh(&old), async {
            results.refresh(&filter("era=2010s")).await;
            slow.send(Err(Error::Other("timeout".to_string()))).ok();
        });

        assert_eq!(results.error(), None);
        assert_eq!(titles(&results.items()), vec!["Fresh"]);
    }

    #[tokio::test]
    async fn test_load_more_waits_for_pending_reset() {
        let source = Arc::new(MockSource::new());
        source
            .push_page(page(1, 1, &["Batman Begins"], 3))
            .push_page(page(2, 2, &["Batman Returns"], 3));
        let gate = source.push_gate();
        let results = controller(&source);

        results.refresh(&filter("genres=28")).await;
        results.load_more().await;

        let next = filter("genres=12");
        futures::join!(results.refresh(&next), async {
            // the list still shows genre 28 while genre 12 is loading
            results.load_more().await;
            gate.send(Ok(page(1, 10, &["Jumanji"], 2))).ok();
        });

        let state = results.snapshot();
        assert_eq!(titles(&state.items), vec!["Jumanji"]);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.total_pages, 2);

        let calls = source.listing_calls();
        assert_eq!(calls.len(), 3);
        match calls.last() {
            Some(Call::Discover { params, .. }) => {
                assert_eq!(params.get("page"), Some("1"));
                assert_eq!(params.get("with_genres"), Some("12"));
            }
            other => panic!("expected discover, got {:?}", other),
        }

        // paging resumes from the new list
        source.push_page(page(2, 11, &["Zathura"], 2));
        results.load_more().await;
        assert_eq!(titles(&results.items()), vec!["Jumanji", "Zathura"]);
        match source.listing_calls().last() {
            Some(Call::Discover { params, .. }) => {
                assert_eq!(params.get("page"), Some("2"));
                assert_eq!(params.get("with_genres"), Some("12"));
            }
            other => panic!("expected discover, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_loading_while_in_flight() {
        let source = Arc::new(MockSource::new());
        let gate = source.push_gate();
        let results = controller(&source);
        let current = FilterState::default();

        futures::join!(results.refresh(&current), async {
            assert!(results.is_loading());
            gate.send(Ok(page(1, 1, &["Alien"], 1))).ok();
        });

        assert!(!results.is_loading());
    }

    #[tokio::test]
    async fn test_fetch_media_details() {
        let source = Arc::new(MockSource::new());
        source.push_details(Ok(details("272", "Batman Begins")));
        let results = controller(&source);

        results.fetch_media_details(Category::Movie, "272").await;

        let selected = results.selected_media().unwrap();
        assert_eq!(selected.title, "Batman Begins");
        assert_eq!(selected.runtime, Some(140));
        assert_eq!(
            source.calls(),
            vec![Call::Details {
                category: Category::Movie,
                id: "272".to_string(),
            }]
        );

        results.clear_selected_media();
        assert_eq!(results.selected_media(), None);
    }

    #[tokio::test]
    async fn test_fetch_media_details_failure_clears_selection() {
        let source = Arc::new(MockSource::new());
        source
            .push_details(Ok(details("272", "Batman Begins")))
            .push_details(Err(Error::source("tmdb", "The resource you requested could not be found.")));
        let results = controller(&source);

        results.fetch_media_details(Category::Movie, "272").await;
        results.fetch_media_details(Category::Movie, "999999").await;

        let state = results.snapshot();
        assert_eq!(state.selected_media, None);
        assert_eq!(
            state.error.as_deref(),
            Some("The resource you requested could not be found.")
        );
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_stale_details_are_discarded() {
        let source = Arc::new(MockSource::new());
        let slow = source.push_details_gate();
        source.push_details(Ok(details("155", "The Dark Knight")));
        let results = controller(&source);

        futures::join!(results.fetch_media_details(Category::Movie, "272"), async {
            results.fetch_media_details(Category::Movie, "155").await;
            slow.send(Ok(details("272", "Batman Begins"))).ok();
        });

        assert_eq!(results.selected_media().unwrap().title, "The Dark Knight");
    }
}

#[cfg(test)]
mod genre_tests {
    use super::*;

    fn genre_source() -> Arc<MockSource> {
        let source = Arc::new(MockSource::new());
        source
            .set_genres(Category::Movie, vec![genre(28, "Action"), genre(12, "Adventure")])
            .set_genres(Category::Tv, vec![genre(18, "Drama")]);
        source
    }

    #[tokio::test]
    async fn test_fetch_populates_and_caches() {
        let source = genre_source();
        let cache = GenreCache::new(source.clone());

        cache.fetch(Category::Movie).await;

        let state = cache.snapshot();
        assert_eq!(state.genres.len(), 2);
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert!(cache.is_cached(Category::Movie));
        assert!(!cache.is_cached(Category::Tv));
        assert_eq!(cache.name_of(12).as_deref(), Some("Adventure"));
    }

    #[tokio::test]
    async fn test_toggling_back_uses_cache() {
        let source = genre_source();
        let cache = GenreCache::new(source.clone());

        cache.fetch(Category::Movie).await;
        cache.fetch(Category::Tv).await;
        assert_eq!(cache.genres(), vec![genre(18, "Drama")]);

        cache.fetch(Category::Movie).await;
        assert_eq!(cache.genres().len(), 2);
        assert_eq!(source.genre_calls(), vec![Category::Movie, Category::Tv]);
    }

    #[tokio::test]
    async fn test_failure_empties_live_genres() {
        let source = genre_source();
        source.fail_next_genres(Error::Other("Network error".to_string()));
        let cache = GenreCache::new(source.clone());

        cache.fetch(Category::Movie).await;

        let state = cache.snapshot();
        assert!(state.genres.is_empty());
        assert_eq!(state.error.as_deref(), Some("Network error"));
        assert!(!state.loading);
        assert!(!cache.is_cached(Category::Movie));

        // a failed category is fetched again next time
        cache.fetch(Category::Movie).await;
        assert_eq!(cache.genres().len(), 2);
        assert_eq!(cache.snapshot().error, None);
        assert_eq!(source.genre_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_superseded_fetch_keeps_cached_category() {
        let source = genre_source();
        let cache = GenreCache::new(source.clone());
        cache.fetch(Category::Tv).await;

        let slow = source.push_genres_gate();
        futures::join!(cache.fetch(Category::Movie), async {
            // switching back to tv is a cache hit while movies are in flight
            cache.fetch(Category::Tv).await;
            slow.send(Ok(vec![genre(28, "Action")])).ok();
        });

        let state = cache.snapshot();
        assert_eq!(state.genres, vec![genre(18, "Drama")]);
        assert!(!state.loading);
        assert_eq!(state.error, None);
        // the late response still lands in the cache
        assert!(cache.is_cached(Category::Movie));
    }

    #[tokio::test]
    async fn test_apply_category_fetches_on_first_call_and_changes() {
        let source = genre_source();
        let cache = GenreCache::new(source.clone());

        assert!(cache.apply_category(Category::Movie).await);
        assert!(!cache.apply_category(Category::Movie).await);
        assert!(cache.apply_category(Category::Tv).await);
        assert!(cache.apply_category(Category::Movie).await);

        // the switch back to movies was served from the cache
        assert_eq!(source.genre_calls(), vec![Category::Movie, Category::Tv]);
    }
}
