#![allow(dead_code)]

use std::sync::Arc;

use abraje::{
    models::{post::InsertablePost, post::Post, user::InsertableUser},
    store::{memory::MemoryListingStore, ListingStore},
};
use rust_decimal::Decimal;

pub fn new_user(store: &dyn ListingStore, name: &str) -> i64 {
    store
        .create_user(InsertableUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        })
        .unwrap()
        .id
}

pub fn new_post(user_id: i64, title: &str, property_type: &str, city: &str) -> InsertablePost {
    InsertablePost {
        city: city.to_string(),
        sector: "centre".to_string(),
        price: Decimal::new(125_000_000, 2),
        product: "vente".to_string(),
        property_type: property_type.to_string(),
        bedrooms: 3,
        bathrooms: 2,
        area: Decimal::new(12_050, 2),
        address: "12 rue des Orangers".to_string(),
        address_maps: "https://maps.example.com/?q=33.57,-7.59".to_string(),
        title: title.to_string(),
        description: "Belle propriété lumineuse".to_string(),
        image: None,
        user_id,
    }
}

/// The two listings used throughout the search scenarios.
pub fn scenario_store() -> (Arc<MemoryListingStore>, Vec<Post>) {
    let store = Arc::new(MemoryListingStore::new());
    let owner = new_user(&*store, "Amine");

    let villa = store
        .create_post(new_post(owner, "Villa Moderne", "maison", "casablanca"))
        .unwrap();
    let appartement = store
        .create_post(new_post(owner, "Appartement Centre", "appartement", "rabat"))
        .unwrap();

    (store, vec![villa, appartement])
}

/// A wider catalogue for equivalence checks.
pub fn catalogue_store() -> Arc<MemoryListingStore> {
    let store = Arc::new(MemoryListingStore::new());
    let owner = new_user(&*store, "Sara");

    let listings = [
        ("Villa Moderne", "maison", "casablanca"),
        ("Appartement Centre", "appartement", "rabat"),
        ("Villa avec piscine", "maison", "marrakech"),
        ("Studio meublé", "appartement", "casablanca"),
        ("Terrain agricole", "terrain", "fes"),
        ("Bureau open space", "bureau", "casablanca"),
        ("Hôtel de charme", "hotel", "marrakech"),
        ("Appartement vue mer", "appartement", "tanger"),
        ("VILLA contemporaine", "maison", "rabat"),
        ("Plateau de bureaux 100%", "bureau", "rabat"),
    ];
    for (title, property_type, city) in listings {
        store
            .create_post(new_post(owner, title, property_type, city))
            .unwrap();
    }

    store
}
