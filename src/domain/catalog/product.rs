//! Catalog product records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a product record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncSource {
    /// Entered by hand or seeded.
    #[default]
    Manual,
    /// Upserted by the Shopify sync engine.
    Shopify,
}

impl SyncSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Shopify => "shopify",
        }
    }
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Remote variant identifier.
    pub id: String,
    /// Variant title (e.g. "M / Black").
    pub title: String,
    /// Variant price.
    pub price: f64,
    /// Whether the variant can currently be bought.
    pub available: bool,
    /// Stock keeping unit, when the store assigns one.
    pub sku: Option<String>,
    /// Units on hand.
    pub inventory_quantity: i32,
}

/// A catalog product, locally stored and optionally tied to a remote
/// platform record via `external_key`.
///
/// A given `external_key` identifies at most one record; re-syncing the
/// same remote product updates the existing record in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Local identity, assigned by the store on insert.
    pub id: Option<Uuid>,
    /// Remote platform identity; the upsert match key when present.
    pub external_key: Option<String>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub url: Option<String>,
    pub in_stock: bool,
    pub quantity: i32,
    pub rating: f64,
    pub variants: Vec<ProductVariant>,
    /// Sync provenance.
    pub source: SyncSource,
    pub synced_at: Option<DateTime<Utc>>,
}

impl ProductRecord {
    /// A minimal manual record, useful for seeding and tests.
    pub fn manual(name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            external_key: None,
            name: name.into(),
            description: String::new(),
            price,
            category: category.into(),
            tags: Vec::new(),
            image: None,
            url: None,
            in_stock: true,
            quantity: 0,
            rating: 4.5,
            variants: Vec::new(),
            source: SyncSource::Manual,
            synced_at: None,
        }
    }

    /// The key used to reference this product from a conversation turn:
    /// the external key when present, otherwise the local id.
    pub fn reference_key(&self) -> String {
        self.external_key
            .clone()
            .or_else(|| self.id.map(|id| id.to_string()))
            .unwrap_or_default()
    }

    /// Compares the synced content of two records, ignoring identity and
    /// provenance timestamps. Drives the "changed" count during sync.
    pub fn same_content(&self, other: &Self) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.price == other.price
            && self.category == other.category
            && self.tags == other.tags
            && self.image == other.image
            && self.url == other.url
            && self.in_stock == other.in_stock
            && self.quantity == other.quantity
            && self.variants == other.variants
    }

    /// True if every token matches this record: case-insensitive substring
    /// on name, description, or category, or an exact tag match.
    ///
    /// This is the local-search predicate; the SQL store mirrors it.
    pub fn matches_any_token(&self, tokens: &[String]) -> bool {
        let name = self.name.to_lowercase();
        let description = self.description.to_lowercase();
        let category = self.category.to_lowercase();
        let tags: Vec<String> = self.tags.iter().map(|t| t.to_lowercase()).collect();

        tokens.iter().any(|token| {
            let token = token.to_lowercase();
            name.contains(&token)
                || description.contains(&token)
                || category.contains(&token)
                || tags.iter().any(|t| t == &token)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dress() -> ProductRecord {
        let mut p = ProductRecord::manual("Floral Midi Dress", "Dresses", 1499.0);
        p.description = "A breezy summer dress".to_string();
        p.tags = vec!["summer".to_string(), "floral".to_string()];
        p
    }

    #[test]
    fn reference_key_prefers_external_key() {
        let mut p = dress();
        p.id = Some(Uuid::new_v4());
        p.external_key = Some("shopify-42".to_string());
        assert_eq!(p.reference_key(), "shopify-42");
    }

    #[test]
    fn same_content_ignores_identity_and_sync_time() {
        let mut a = dress();
        let mut b = dress();
        a.id = Some(Uuid::new_v4());
        b.synced_at = Some(Utc::now());
        assert!(a.same_content(&b));

        b.price = 999.0;
        assert!(!a.same_content(&b));
    }

    #[test]
    fn token_matching_covers_all_fields() {
        let p = dress();
        assert!(p.matches_any_token(&["midi".to_string()]));
        assert!(p.matches_any_token(&["breezy".to_string()]));
        assert!(p.matches_any_token(&["dresses".to_string()]));
        assert!(p.matches_any_token(&["floral".to_string()])); // exact tag
        assert!(!p.matches_any_token(&["sneaker".to_string()]));
    }

    #[test]
    fn tag_match_is_exact_not_substring() {
        let p = dress();
        // "summ" is not a tag and appears nowhere else
        assert!(!p.matches_any_token(&["summ".to_string()]));
        assert!(p.matches_any_token(&["summer".to_string()]));
    }
}
