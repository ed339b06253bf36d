//! Advertisement DTOs - Data Transfer Objects for listings

use crate::entities::Advertisement;
use crate::entities::advertisement::has_contact;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdvertisementDTO {
    pub advertisement_id: i32,
    pub user_id: i32,
    pub category: String,
    pub subcategory: String,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub telegram: Option<String>,
    pub discord: Option<String>,
    pub price: Option<f64>,
    pub is_vip: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Advertisement> for AdvertisementDTO {
    fn from(value: Advertisement) -> Self {
        Self {
            advertisement_id: value.advertisement_id,
            user_id: value.user_id,
            category: value.category,
            subcategory: value.subcategory,
            title: value.title,
            description: value.description,
            images: value.images.0,
            telegram: value.telegram,
            discord: value.discord,
            price: value.price,
            is_vip: value.is_vip,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Create body. At least one contact handle is required.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[validate(schema(function = "validate_contacts"))]
pub struct CreateAdvertisementDTO {
    #[validate(length(min = 1, max = 64, message = "Category must be between 1 and 64 characters"))]
    pub category: String,

    #[validate(length(min = 1, max = 64, message = "Subcategory must be between 1 and 64 characters"))]
    pub subcategory: String,

    #[validate(length(min = 1, max = 120, message = "Title must be between 1 and 120 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    #[serde(default)]
    pub description: String,

    #[validate(length(max = 10, message = "At most 10 images per advertisement"))]
    #[serde(default)]
    pub images: Vec<String>,

    #[validate(length(max = 64))]
    pub telegram: Option<String>,

    #[validate(length(max = 64))]
    pub discord: Option<String>,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
}

fn validate_contacts(dto: &CreateAdvertisementDTO) -> Result<(), ValidationError> {
    if has_contact(dto.telegram.as_deref(), dto.discord.as_deref()) {
        Ok(())
    } else {
        Err(ValidationError::new("missing_contact")
            .with_message("At least one of telegram or discord is required".into()))
    }
}

impl CreateAdvertisementDTO {
    /// Trims the contact handles, turning blank ones into `None`
    pub fn normalized(mut self) -> Self {
        self.telegram = normalize_handle(self.telegram);
        self.discord = normalize_handle(self.discord);
        self
    }
}

/// Insert DTO: a validated body bound to its owner
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewAdvertisementDTO {
    pub user_id: i32,
    pub category: String,
    pub subcategory: String,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub telegram: Option<String>,
    pub discord: Option<String>,
    pub price: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl NewAdvertisementDTO {
    pub fn from_request(user_id: i32, body: CreateAdvertisementDTO) -> Self {
        let body = body.normalized();
        Self {
            user_id,
            category: body.category,
            subcategory: body.subcategory,
            title: body.title,
            description: body.description,
            images: body.images,
            telegram: body.telegram,
            discord: body.discord,
            price: body.price,
            created_at: Utc::now(),
        }
    }
}

/// Partial update. For the contact handles an empty string clears the field.
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
#[validate(schema(function = "validate_price_update"))]
pub struct UpdateAdvertisementDTO {
    #[validate(length(min = 1, max = 64))]
    pub category: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub subcategory: Option<String>,

    #[validate(length(min = 1, max = 120))]
    pub title: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(length(max = 10, message = "At most 10 images per advertisement"))]
    pub images: Option<Vec<String>>,

    #[validate(length(max = 64))]
    pub telegram: Option<String>,

    #[validate(length(max = 64))]
    pub discord: Option<String>,

    /// Absent leaves the price alone, `null` clears it
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Option<f64>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn validate_price_update(dto: &UpdateAdvertisementDTO) -> Result<(), ValidationError> {
    match dto.price {
        Some(Some(price)) if price < 0.0 => Err(ValidationError::new("range")
            .with_message("Price cannot be negative".into())),
        _ => Ok(()),
    }
}

impl UpdateAdvertisementDTO {
    /// Contacts as they would be stored after applying this update on `current`
    pub fn merged_contacts(&self, current: &Advertisement) -> (Option<String>, Option<String>) {
        let merge = |update: &Option<String>, existing: &Option<String>| match update {
            Some(value) => normalize_handle(Some(value.clone())),
            None => existing.clone(),
        };
        (
            merge(&self.telegram, &current.telegram),
            merge(&self.discord, &current.discord),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.subcategory.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.images.is_none()
            && self.telegram.is_none()
            && self.discord.is_none()
            && self.price.is_none()
    }
}

/// Query string of the public listing
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AdvertisementFilter {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub search: Option<String>,
    pub user_id: Option<i32>,
    pub vip_only: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub fn normalize_handle(handle: Option<String>) -> Option<String> {
    handle
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chair(telegram: Option<&str>, discord: Option<&str>) -> CreateAdvertisementDTO {
        CreateAdvertisementDTO {
            category: "furniture".to_string(),
            subcategory: "chairs".to_string(),
            title: "Chair".to_string(),
            description: String::new(),
            images: vec![],
            telegram: telegram.map(str::to_string),
            discord: discord.map(str::to_string),
            price: Some(10.0),
        }
    }

    #[test]
    fn test_one_contact_is_enough() {
        assert!(chair(Some("@seller"), None).validate().is_ok());
        assert!(chair(None, Some("seller#1")).validate().is_ok());
    }

    #[test]
    fn test_missing_contact_is_rejected() {
        assert!(chair(None, None).validate().is_err());
        assert!(chair(Some(""), Some("  ")).validate().is_err());
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let mut dto = chair(Some("@seller"), None);
        dto.price = Some(-1.0);
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_price_absent_null_and_value() {
        let absent: UpdateAdvertisementDTO = serde_json::from_str(r#"{"title":"Stool"}"#).unwrap();
        assert_eq!(absent.price, None);

        let cleared: UpdateAdvertisementDTO = serde_json::from_str(r#"{"price":null}"#).unwrap();
        assert_eq!(cleared.price, Some(None));
        assert!(!cleared.is_empty());
        assert!(cleared.validate().is_ok());

        let negative: UpdateAdvertisementDTO = serde_json::from_str(r#"{"price":-5.0}"#).unwrap();
        assert_eq!(negative.price, Some(Some(-5.0)));
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_normalized_drops_blank_handles() {
        let dto = chair(Some("  @seller "), Some("   ")).normalized();
        assert_eq!(dto.telegram.as_deref(), Some("@seller"));
        assert_eq!(dto.discord, None);
    }
}
