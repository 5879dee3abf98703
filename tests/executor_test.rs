mod common;

#[cfg(test)]
mod in_memory_strategy {
    use abraje::search::{
        executor::{InMemoryExecutor, QueryExecutor},
        filter::Filter,
        pagination::PageRequest,
        SearchError,
    };
    use serde_json::json;

    use crate::common::scenario_store;

    fn titles(executor: &InMemoryExecutor, filter: &Filter) -> Vec<String> {
        executor
            .execute(filter, &PageRequest::default())
            .unwrap()
            .data
            .into_iter()
            .map(|post| post.title)
            .collect()
    }

    fn scenario_executor() -> InMemoryExecutor {
        let (_, posts) = scenario_store();
        InMemoryExecutor::new(posts)
    }

    #[test]
    fn query_matches_titles_case_insensitively() {
        let executor = scenario_executor();
        let filter = Filter::normalize(Some("villa"), None, None);
        assert_eq!(titles(&executor, &filter), vec!["Villa Moderne"]);
    }

    #[test]
    fn category_matches_the_post_type() {
        let executor = scenario_executor();
        let filter = Filter::normalize(None, Some("appartement"), None);
        assert_eq!(titles(&executor, &filter), vec!["Appartement Centre"]);
    }

    #[test]
    fn category_all_returns_everything() {
        let executor = scenario_executor();
        let filter = Filter::normalize(None, Some("all"), None);
        assert_eq!(
            titles(&executor, &filter),
            vec!["Villa Moderne", "Appartement Centre"]
        );
    }

    #[test]
    fn city_matches_the_slug_exactly() {
        let executor = scenario_executor();
        let filter = Filter::normalize(None, None, Some("rabat"));
        assert_eq!(titles(&executor, &filter), vec!["Appartement Centre"]);

        let filter = Filter::normalize(None, None, Some("Rabat"));
        assert!(titles(&executor, &filter).is_empty());
    }

    #[test]
    fn predicates_are_combined() {
        let executor = scenario_executor();
        let filter = Filter::normalize(Some("villa"), Some("maison"), Some("rabat"));
        assert!(titles(&executor, &filter).is_empty());

        let filter = Filter::normalize(Some("villa"), Some("maison"), Some("casablanca"));
        assert_eq!(titles(&executor, &filter), vec!["Villa Moderne"]);
    }

    #[test]
    fn blank_query_does_not_affect_results() {
        let executor = scenario_executor();
        let everything = titles(&executor, &Filter::default());
        for raw in ["", "   "] {
            let filter = Filter::normalize(Some(raw), None, None);
            assert_eq!(titles(&executor, &filter), everything);
        }
    }

    #[test]
    fn input_order_is_preserved() {
        let (_, posts) = scenario_store();
        let reversed: Vec<_> = posts.iter().rev().cloned().collect();
        let executor = InMemoryExecutor::new(reversed.clone());

        let result = executor
            .execute(&Filter::default(), &PageRequest::default())
            .unwrap();
        assert_eq!(result.data, reversed);
    }

    #[test]
    fn serialized_pages_and_arrays_are_accepted() {
        let (_, posts) = scenario_store();
        let page = abraje::search::pagination::Page::from_vec(
            posts.clone(),
            &PageRequest::default(),
            &Filter::default(),
        );

        let from_page = InMemoryExecutor::from_json(&serde_json::to_value(&page).unwrap()).unwrap();
        assert_eq!(from_page.posts(), posts.as_slice());

        let from_array =
            InMemoryExecutor::from_json(&serde_json::to_value(&posts).unwrap()).unwrap();
        assert_eq!(from_array.posts(), posts.as_slice());
    }

    #[test]
    fn non_sequence_source_is_an_invalid_argument() {
        for source in [json!(null), json!("posts"), json!(42), json!({ "items": [] })] {
            let err = InMemoryExecutor::from_json(&source).unwrap_err();
            assert!(matches!(err, SearchError::InvalidArgument(_)), "{source}");
        }
    }

    #[test]
    fn malformed_post_is_an_invalid_argument() {
        let err = InMemoryExecutor::from_json(&json!([{ "title": "Villa Moderne" }])).unwrap_err();
        match err {
            SearchError::InvalidArgument(message) => assert!(message.contains("index 0")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

#[cfg(test)]
mod strategy_equivalence {
    use std::sync::Arc;

    use abraje::{
        models::post::Post,
        search::{
            executor::{InMemoryExecutor, QueryExecutor, StoreExecutor},
            filter::Filter,
            pagination::PageRequest,
        },
        store::ListingStore,
    };

    use crate::common::catalogue_store;

    fn filters() -> Vec<Filter> {
        let queries = [None, Some(""), Some("villa"), Some("APPART"), Some("100%"), Some("_"), Some("zzz")];
        let categories = [
            None,
            Some("all"),
            Some("appartement"),
            Some("maison"),
            Some("terrain"),
            Some("bureau"),
            Some("hotel"),
            Some("bogus"),
        ];
        let cities = [None, Some("casablanca"), Some("rabat"), Some("marrakech"), Some("nowhere")];

        let mut filters = Vec::new();
        for query in queries {
            for category in categories {
                for city in cities {
                    filters.push(Filter::normalize(query, category, city));
                }
            }
        }
        filters
    }

    fn every_page(executor: &dyn QueryExecutor, filter: &Filter, per_page: u32) -> Vec<Post> {
        let mut collected = Vec::new();
        let mut page_number = 1;
        loop {
            let page = executor
                .execute(filter, &PageRequest::new(page_number, per_page))
                .unwrap();
            collected.extend(page.data.iter().cloned());
            if !page.has_more_pages() {
                return collected;
            }
            page_number += 1;
        }
    }

    #[test]
    fn both_strategies_return_the_same_records() {
        let store = catalogue_store();
        let in_memory = InMemoryExecutor::new(store.all_posts().unwrap());
        let store_backed = StoreExecutor::new(store.clone() as Arc<dyn ListingStore>);

        for filter in filters() {
            let expected = in_memory.filter(&filter);
            let actual = every_page(&store_backed, &filter, 3);
            assert_eq!(actual, expected, "filter {filter:?}");
        }
    }

    #[test]
    fn results_satisfy_every_predicate_and_nothing_is_missed() {
        let store = catalogue_store();
        let all = store.all_posts().unwrap();
        let in_memory = InMemoryExecutor::new(all.clone());

        for filter in filters() {
            let kept = every_page(&in_memory, &filter, 4);
            for post in &all {
                let satisfies = filter
                    .query()
                    .map_or(true, |q| post.title.to_lowercase().contains(&q.to_lowercase()))
                    && filter
                        .category()
                        .map_or(true, |c| post.property_type == c.slug())
                    && filter.city().map_or(true, |c| post.city == c);
                assert_eq!(kept.contains(post), satisfies, "{filter:?} / {}", post.title);
            }
        }
    }

    #[test]
    fn executing_does_not_touch_the_store() {
        let store = catalogue_store();
        let before = store.all_posts().unwrap();
        let executor = StoreExecutor::new(store.clone() as Arc<dyn ListingStore>);

        for filter in filters().into_iter().take(20) {
            executor.execute(&filter, &PageRequest::default()).unwrap();
        }

        assert_eq!(store.all_posts().unwrap(), before);
    }

    #[test]
    fn pagination_metadata_matches_between_strategies() {
        let store = catalogue_store();
        let in_memory = InMemoryExecutor::new(store.all_posts().unwrap());
        let store_backed = StoreExecutor::new(store.clone() as Arc<dyn ListingStore>);
        let filter = Filter::normalize(None, None, Some("rabat"));

        for page in 1..=3 {
            let request = PageRequest::new(page, 2);
            let a = in_memory.execute(&filter, &request).unwrap();
            let b = store_backed.execute(&filter, &request).unwrap();
            assert_eq!(a, b);
        }
    }
}
