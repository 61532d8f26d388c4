//! Catalog item types.

use serde::{Deserialize, Serialize};

use super::id::ItemId;
use super::price::Price;
use super::serde_helpers::null_as_default_string;

/// Image shown when an item has no image URL.
pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.svg";

/// A product in the public catalog.
///
/// Unknown fields from the backend are ignored and missing text fields
/// default to empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default_string")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default_string")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default_string")]
    pub brand: String,
    pub price: Price,
    /// Comma-separated image URLs.
    #[serde(default, deserialize_with = "null_as_default_string")]
    pub image_urls: String,
    #[serde(default, deserialize_with = "null_as_default_string")]
    pub status: String,
}

impl Item {
    /// Iterate over the item's image URLs.
    pub fn images(&self) -> impl Iterator<Item = &str> {
        split_image_urls(&self.image_urls)
    }

    /// The first image URL, or the placeholder.
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.images().next().unwrap_or(PLACEHOLDER_IMAGE)
    }
}

/// Split a comma-separated image list, skipping blanks.
pub(crate) fn split_image_urls(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|url| !url.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_from_backend_json() {
        let item: Item = serde_json::from_value(serde_json::json!({
            "id": 42,
            "name": "Trail Runner",
            "status": "active",
            "created_at": "2024-01-01T00:00:00Z",
            "description": "Lightweight shoe",
            "price": 89.99,
            "category": "Shoes",
            "brand": "Acme",
            "image_urls": "/img/a.jpg, /img/b.jpg"
        }))
        .unwrap();

        assert_eq!(item.id, ItemId::new(42));
        assert_eq!(item.price, Price::from_cents(8999));
        assert_eq!(item.images().collect::<Vec<_>>(), vec!["/img/a.jpg", "/img/b.jpg"]);
        assert_eq!(item.primary_image(), "/img/a.jpg");
    }

    #[test]
    fn test_item_without_images_uses_placeholder() {
        let item: Item = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Mystery Box",
            "price": 5,
            "image_urls": null
        }))
        .unwrap();

        assert_eq!(item.primary_image(), PLACEHOLDER_IMAGE);
        assert!(item.description.is_empty());
    }
}
