//! Advertisement entity - A classified listing owned by one user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Advertisement {
    pub advertisement_id: i32,
    pub user_id: i32,
    pub category: String,
    pub subcategory: String,
    pub title: String,
    pub description: String,
    // ordered image references, stored as a JSON array
    pub images: Json<Vec<String>>,
    pub telegram: Option<String>,
    pub discord: Option<String>,
    pub price: Option<f64>,
    pub is_vip: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// True when at least one of the two contact handles is present and not blank
pub fn has_contact(telegram: Option<&str>, discord: Option<&str>) -> bool {
    let present = |handle: Option<&str>| handle.is_some_and(|h| !h.trim().is_empty());
    present(telegram) || present(discord)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_contact() {
        assert!(has_contact(Some("@chair_seller"), None));
        assert!(has_contact(None, Some("seller#0001")));
        assert!(!has_contact(None, None));
        assert!(!has_contact(Some("   "), Some("")));
    }
}
