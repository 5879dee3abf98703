#[cfg(test)]
mod filter_normalization {
    use abraje::search::filter::{Category, Filter};

    #[test]
    fn all_and_omitted_category_are_the_same_filter() {
        let all = Filter::normalize(None, Some("all"), None);
        let omitted = Filter::normalize(None, None, None);
        assert_eq!(all, omitted);
        assert_eq!(all.category(), None);
        assert!(all.is_empty());
    }

    #[test]
    fn unknown_category_means_no_category_filter() {
        let filter = Filter::normalize(None, Some("chateau"), None);
        assert_eq!(filter.category(), None);
        assert_eq!(filter, Filter::default());
    }

    #[test]
    fn known_categories_and_aliases_are_parsed() {
        assert_eq!(
            Filter::normalize(None, Some("appartement"), None).category(),
            Some(Category::Apartment)
        );
        assert_eq!(
            Filter::normalize(None, Some(" House "), None).category(),
            Some(Category::House)
        );
        assert_eq!(
            Filter::normalize(None, Some("LAND"), None).category(),
            Some(Category::Land)
        );
        assert_eq!(
            Filter::normalize(None, Some("bureau"), None).category(),
            Some(Category::Office)
        );
        assert_eq!(
            Filter::normalize(None, Some("hotel"), None).category(),
            Some(Category::Hotel)
        );
    }

    #[test]
    fn blank_queries_mean_no_query_filter() {
        let omitted = Filter::normalize(None, None, None);
        for raw in ["", " ", "\t\n  "] {
            let filter = Filter::normalize(Some(raw), None, None);
            assert_eq!(filter.query(), None);
            assert_eq!(filter, omitted);
        }
    }

    #[test]
    fn query_and_city_are_trimmed() {
        let filter = Filter::normalize(Some("  villa "), None, Some(" rabat "));
        assert_eq!(filter.query(), Some("villa"));
        assert_eq!(filter.city(), Some("rabat"));
    }

    #[test]
    fn blank_city_means_no_city_filter() {
        assert_eq!(Filter::normalize(None, None, Some("  ")).city(), None);
    }

    #[test]
    fn cities_are_not_validated() {
        let filter = Filter::normalize(None, None, Some("atlantis"));
        assert_eq!(filter.city(), Some("atlantis"));
    }

    #[test]
    fn normalize_is_idempotent() {
        let raw = [
            (Some(" Villa "), Some("maison"), Some("casablanca")),
            (None, Some("nope"), None),
            (Some(""), Some("all"), Some("")),
            (Some("studio"), None, Some("rabat")),
        ];

        for (query, category, city) in raw {
            let first = Filter::normalize(query, category, city);
            let second = Filter::normalize(query, category, city);
            assert_eq!(first, second);

            let renormalized = Filter::normalize(
                first.query(),
                first.category().map(|c| c.slug()),
                first.city(),
            );
            assert_eq!(first, renormalized);
        }
    }

    #[test]
    fn all_is_never_stored_as_a_category() {
        let filter = Filter::default().with_category(Category::All);
        assert_eq!(filter.category(), None);
    }

    #[test]
    fn query_pairs_skip_absent_predicates() {
        let filter = Filter::normalize(Some("villa"), Some("all"), Some("rabat"));
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("query", "villa".to_string()),
                ("city", "rabat".to_string())
            ]
        );
    }

    #[test]
    fn categories_round_trip_through_their_slugs() {
        for category in Category::ALL {
            assert_eq!(Category::from_slug(category.slug()), Some(category));
        }
    }
}
