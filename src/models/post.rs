use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{models::user::User, store::StoreError};

/// Bedrooms and bathrooms are stored as unsigned tiny integers.
const MAX_ROOM_COUNT: i16 = 255;

/// Integer digits left by `NUMERIC(15,2)`.
const PRICE_INTEGER_DIGITS: u32 = 13;
/// Integer digits left by `NUMERIC(8,2)`.
const AREA_INTEGER_DIGITS: u32 = 6;
const AMOUNT_SCALE: u32 = 2;

/// A property advertisement.
///
/// `city` holds the city slug the search bar filters on; `city_slug` is
/// accepted as an alias when posts come back from a client.
#[derive(
    Debug, Clone, PartialEq, Associations, Identifiable, Queryable, Selectable, Serialize, Deserialize,
)]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(table_name = crate::db::schema::posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Post {
    pub id: i64,
    #[serde(alias = "city_slug")]
    pub city: String,
    pub sector: String,
    pub price: Decimal,
    pub product: String,
    #[diesel(column_name = type_)]
    #[serde(rename = "type")]
    pub property_type: String,
    pub bedrooms: i16,
    pub bathrooms: i16,
    pub area: Decimal,
    pub address: String,
    pub address_maps: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub likes: i32,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, Deserialize)]
#[diesel(table_name = crate::db::schema::posts)]
pub struct InsertablePost {
    #[serde(alias = "city_slug")]
    pub city: String,
    pub sector: String,
    pub price: Decimal,
    pub product: String,
    #[diesel(column_name = type_)]
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(default)]
    pub bedrooms: i16,
    #[serde(default)]
    pub bathrooms: i16,
    pub area: Decimal,
    pub address: String,
    pub address_maps: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub user_id: i64,
}

impl InsertablePost {
    pub fn validate(&self) -> Result<(), StoreError> {
        require_text("city", &self.city)?;
        require_text("sector", &self.sector)?;
        require_text("type", &self.property_type)?;
        require_text("title", &self.title)?;
        require_amount("price", self.price, PRICE_INTEGER_DIGITS)?;
        require_amount("area", self.area, AREA_INTEGER_DIGITS)?;
        require_room_count("bedrooms", self.bedrooms)?;
        require_room_count("bathrooms", self.bathrooms)
    }
}

/// Partial update of a post. Unset fields are left untouched; an explicit
/// `"image": null` removes the image.
#[derive(Debug, Clone, Default, AsChangeset, Deserialize)]
#[diesel(table_name = crate::db::schema::posts)]
pub struct PostChanges {
    #[serde(alias = "city_slug")]
    pub city: Option<String>,
    pub sector: Option<String>,
    pub price: Option<Decimal>,
    pub product: Option<String>,
    #[diesel(column_name = type_)]
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub bedrooms: Option<i16>,
    pub bathrooms: Option<i16>,
    pub area: Option<Decimal>,
    pub address: Option<String>,
    pub address_maps: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub image: Option<Option<String>>,
}

impl PostChanges {
    pub fn validate(&self) -> Result<(), StoreError> {
        for (field, value) in [
            ("city", &self.city),
            ("sector", &self.sector),
            ("type", &self.property_type),
            ("title", &self.title),
        ] {
            if let Some(value) = value {
                require_text(field, value)?;
            }
        }
        if let Some(price) = self.price {
            require_amount("price", price, PRICE_INTEGER_DIGITS)?;
        }
        if let Some(area) = self.area {
            require_amount("area", area, AREA_INTEGER_DIGITS)?;
        }
        if let Some(bedrooms) = self.bedrooms {
            require_room_count("bedrooms", bedrooms)?;
        }
        if let Some(bathrooms) = self.bathrooms {
            require_room_count("bathrooms", bathrooms)?;
        }
        Ok(())
    }

    /// Applies the set fields onto an already loaded post.
    pub fn apply(self, post: &mut Post) {
        let PostChanges {
            city,
            sector,
            price,
            product,
            property_type,
            bedrooms,
            bathrooms,
            area,
            address,
            address_maps,
            title,
            description,
            image,
        } = self;

        if let Some(v) = city {
            post.city = v;
        }
        if let Some(v) = sector {
            post.sector = v;
        }
        if let Some(v) = price {
            post.price = v;
        }
        if let Some(v) = product {
            post.product = v;
        }
        if let Some(v) = property_type {
            post.property_type = v;
        }
        if let Some(v) = bedrooms {
            post.bedrooms = v;
        }
        if let Some(v) = bathrooms {
            post.bathrooms = v;
        }
        if let Some(v) = area {
            post.area = v;
        }
        if let Some(v) = address {
            post.address = v;
        }
        if let Some(v) = address_maps {
            post.address_maps = v;
        }
        if let Some(v) = title {
            post.title = v;
        }
        if let Some(v) = description {
            post.description = v;
        }
        if let Some(v) = image {
            post.image = v;
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Keeps a decimal inside a `NUMERIC(p,2)` column with `integer_digits`
/// digits before the point.
fn require_amount(field: &str, value: Decimal, integer_digits: u32) -> Result<(), StoreError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(StoreError::Invalid(format!("{field} must not be negative")));
    }
    if value.normalize().scale() > AMOUNT_SCALE {
        return Err(StoreError::Invalid(format!(
            "{field} must have at most {AMOUNT_SCALE} decimal places"
        )));
    }
    if value.trunc() >= Decimal::from(10_i64.pow(integer_digits)) {
        return Err(StoreError::Invalid(format!(
            "{field} must be below 10^{integer_digits}"
        )));
    }
    Ok(())
}

fn require_room_count(field: &str, value: i16) -> Result<(), StoreError> {
    if !(0..=MAX_ROOM_COUNT).contains(&value) {
        return Err(StoreError::Invalid(format!(
            "{field} must be between 0 and {MAX_ROOM_COUNT}"
        )));
    }
    Ok(())
}

/// A field that is present maps to `Some`, even when it is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
