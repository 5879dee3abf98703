use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::post::Post;

/// Property categories offered by the search bar.
///
/// The wire slugs are the French ones used in `posts.type`; the English names
/// are accepted as aliases when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    All,
    #[serde(rename = "appartement")]
    Apartment,
    #[serde(rename = "maison")]
    House,
    #[serde(rename = "terrain")]
    Land,
    #[serde(rename = "bureau")]
    Office,
    Hotel,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::All,
        Category::Apartment,
        Category::House,
        Category::Land,
        Category::Office,
        Category::Hotel,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Apartment => "appartement",
            Category::House => "maison",
            Category::Land => "terrain",
            Category::Office => "bureau",
            Category::Hotel => "hotel",
        }
    }

    /// Display name shown in the category dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "Toutes les catégories",
            Category::Apartment => "Appartements",
            Category::House => "Maisons",
            Category::Land => "Terrains",
            Category::Office => "Bureaux",
            Category::Hotel => "Hôtels",
        }
    }

    /// Returns `None` for anything outside the fixed category set.
    pub fn from_slug(raw: &str) -> Option<Category> {
        match raw.trim().to_lowercase().as_str() {
            "all" => Some(Category::All),
            "appartement" | "apartment" => Some(Category::Apartment),
            "maison" | "house" => Some(Category::House),
            "terrain" | "land" => Some(Category::Land),
            "bureau" | "office" => Some(Category::Office),
            "hotel" | "hôtel" => Some(Category::Hotel),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Canonical search criteria.
///
/// Every predicate is optional and an absent predicate matches everything.
/// A `Filter` never carries `Category::All`, an empty query or an empty city:
/// those are folded into "no predicate" by [`Filter::normalize`] and the
/// `with_*` builders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Filter {
    query: Option<String>,
    category: Option<Category>,
    city: Option<String>,
}

impl Filter {
    /// Builds a filter from raw user input.
    ///
    /// Unknown categories fall back to "all categories" instead of failing;
    /// the city slug is not checked against any list of known cities.
    pub fn normalize(
        raw_query: Option<&str>,
        raw_category: Option<&str>,
        raw_city: Option<&str>,
    ) -> Filter {
        let category = raw_category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .and_then(|c| {
                let parsed = Category::from_slug(c);
                if parsed.is_none() {
                    debug!("Unknown category {:?}, searching all categories", c);
                }
                parsed
            });

        Filter::default()
            .with_query(raw_query.unwrap_or_default())
            .with_category(category.unwrap_or(Category::All))
            .with_city(raw_city.unwrap_or_default())
    }

    pub fn with_query(mut self, query: &str) -> Filter {
        self.query = non_blank(query);
        self
    }

    pub fn with_category(mut self, category: Category) -> Filter {
        self.category = match category {
            Category::All => None,
            other => Some(other),
        };
        self
    }

    pub fn with_city(mut self, city: &str) -> Filter {
        self.city = non_blank(city);
        self
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.category.is_none() && self.city.is_none()
    }

    /// The in-memory predicate. The store translates the same three checks
    /// into SQL and both must agree.
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(query) = &self.query {
            if !post.title.to_lowercase().contains(&query.to_lowercase()) {
                return false;
            }
        }

        if let Some(category) = self.category {
            if post.property_type != category.slug() {
                return false;
            }
        }

        if let Some(city) = &self.city {
            if &post.city != city {
                return false;
            }
        }

        true
    }

    /// Query-string pairs for this filter, absent predicates omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(query) = &self.query {
            pairs.push(("query", query.clone()));
        }
        if let Some(category) = self.category {
            pairs.push(("category", category.slug().to_string()));
        }
        if let Some(city) = &self.city {
            pairs.push(("city", city.clone()));
        }
        pairs
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
