//! Catalog models.

use serde::{Deserialize, Serialize};

/// Full product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub stock: i32,
    pub image: String,
}

/// Row returned by the product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub image: String,
}

impl From<&Product> for ProductSummary {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            price: p.price,
            image: p.image.clone(),
        }
    }
}

/// Product submitted by an admin for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    pub stock: i32,
    #[serde(default)]
    pub image: String,
}

/// Partial product update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i32>,
    pub image: Option<String>,
}

impl ProductPatch {
    /// Treat empty strings and zero numbers as "unchanged", which is how the
    /// storefront admin panel encodes untouched form fields.
    pub fn normalized(self) -> Self {
        fn text(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }
        Self {
            name: text(self.name),
            description: text(self.description),
            price: self.price.filter(|p| *p != 0),
            stock: self.stock.filter(|s| *s != 0),
            image: text(self.image),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.image.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_drops_blank_fields() {
        let patch = ProductPatch {
            name: Some("".into()),
            description: Some("  ".into()),
            price: Some(0),
            stock: Some(0),
            image: Some("w.png".into()),
        }
        .normalized();

        assert_eq!(
            patch,
            ProductPatch {
                image: Some("w.png".into()),
                ..Default::default()
            }
        );
        assert!(!patch.is_empty());
    }

    #[test]
    fn normalized_keeps_real_values() {
        let patch = ProductPatch {
            name: Some("Widget".into()),
            price: Some(12),
            stock: Some(3),
            ..Default::default()
        };
        assert_eq!(patch.clone().normalized(), patch);
    }
}
