//! Static product catalog for the stand.
//!
//! Items are defined once at process start and never persisted on their own;
//! orders snapshot the catalog data they reference, so later price edits do
//! not rewrite history.

use serde::{Deserialize, Serialize};

/// A purchasable item. `unit_price` is in COP (integer pesos, no cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "unitPrice", alias = "price")]
    pub unit_price: i64,
}

impl CatalogItem {
    pub fn new(id: &str, name: &str, unit_price: i64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            unit_price,
        }
    }
}

/// The stand's menu.
pub fn default_catalog() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new("perro_sencillo", "Perro Sencillo", 6000),
        CatalogItem::new("choriperro", "Choriperro", 9000),
        CatalogItem::new("perro_suizo", "Perro Suizo", 10000),
        CatalogItem::new("perro_mixto_S&S", "Perro Mixto S&S", 11000),
        CatalogItem::new("tocisuizo", "Tocisuizo", 12000),
        CatalogItem::new("italo_suizo", "Italo Suizo", 12000),
        CatalogItem::new("S&S_burguer", "S&S Burguer", 13000),
        CatalogItem::new("S&S_maxi_burguer", "S&S Maxi Burguer", 16000),
        CatalogItem::new("gaseosa", "Gaseosa", 3000),
        CatalogItem::new("combo_sencillo", "Combo Sencillo", 9000),
        CatalogItem::new("combo_tocisuizo", "Combo Tocisuizo", 15000),
        CatalogItem::new("combo_S&S_burguer", "Combo S&S Burguer", 16000),
    ]
}

/// Look up an item by id.
pub fn find_item<'a>(catalog: &'a [CatalogItem], id: &str) -> Option<&'a CatalogItem> {
    catalog.iter().find(|item| item.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_unique_ids_and_valid_prices() {
        let catalog = default_catalog();
        assert!(!catalog.is_empty());
        for (i, item) in catalog.iter().enumerate() {
            assert!(item.unit_price >= 0, "{} has negative price", item.id);
            assert!(
                !catalog[i + 1..].iter().any(|other| other.id == item.id),
                "duplicate id {}",
                item.id
            );
        }
    }

    #[test]
    fn find_item_by_id() {
        let catalog = default_catalog();
        let item = find_item(&catalog, "gaseosa").expect("gaseosa should exist");
        assert_eq!(item.unit_price, 3000);
        assert!(find_item(&catalog, "no_such_item").is_none());
    }

    #[test]
    fn catalog_item_accepts_legacy_price_field() {
        // Records written by the original app use `price` instead of `unitPrice`
        // and carry an extra `image` field.
        let item: CatalogItem = serde_json::from_str(
            r#"{ "id": "gaseosa", "name": "Gaseosa", "price": 3000, "image": "/img/g.png" }"#,
        )
        .expect("legacy catalog item should parse");
        assert_eq!(item.unit_price, 3000);
    }
}
