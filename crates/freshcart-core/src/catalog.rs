//! # Catalog Search
//!
//! Case-insensitive substring filters behind the Products and Brands
//! search boxes. An empty query keeps everything.
//!
//! Also picks the "related products" strip of the product detail screen.

use crate::types::{Brand, Category, Product, ProductDetail};

/// Most products shown under "related products".
pub const MAX_RELATED_PRODUCTS: usize = 8;
use crate::validation::normalize_search_query;

fn matches(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}

/// Products whose title contains `query`.
///
/// ## Example
/// ```rust
/// use freshcart_core::catalog::filter_products;
/// use freshcart_core::{Money, Product};
///
/// let shirt = Product {
///     id: "1".into(),
///     title: "Linen Shirt".into(),
///     image_cover: String::new(),
///     price: Money::from_cents(1500),
///     ratings_average: 4.2,
///     category_id: None,
///     brand_id: None,
/// };
/// let products = vec![shirt];
/// assert_eq!(filter_products(&products, "SHIRT").len(), 1);
/// assert!(filter_products(&products, "shoe").is_empty());
/// ```
pub fn filter_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = normalize_search_query(query);
    products
        .iter()
        .filter(|p| matches(&p.title, &needle))
        .collect()
}

/// Brands whose name contains `query`.
pub fn filter_brands<'a>(brands: &'a [Brand], query: &str) -> Vec<&'a Brand> {
    let needle = normalize_search_query(query);
    brands.iter().filter(|b| matches(&b.name, &needle)).collect()
}

/// Categories whose name contains `query`.
pub fn filter_categories<'a>(categories: &'a [Category], query: &str) -> Vec<&'a Category> {
    let needle = normalize_search_query(query);
    categories
        .iter()
        .filter(|c| matches(&c.name, &needle))
        .collect()
}

/// Products sharing the brand or the category of `detail`, without the
/// product itself, in listing order and capped at [`MAX_RELATED_PRODUCTS`].
pub fn related_products<'a>(detail: &ProductDetail, products: &'a [Product]) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| p.id != detail.id)
        .filter(|p| {
            p.brand_id.as_deref() == Some(detail.brand.id.as_str())
                || p.category_id.as_deref() == Some(detail.category.id.as_str())
        })
        .take(MAX_RELATED_PRODUCTS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Money;

    fn product(title: &str) -> Product {
        Product {
            id: title.to_lowercase(),
            title: title.to_string(),
            image_cover: String::new(),
            price: Money::from_cents(100),
            ratings_average: 0.0,
            category_id: None,
            brand_id: None,
        }
    }

    fn listed(id: &str, category: &str, brand: &str) -> Product {
        Product {
            id: id.to_string(),
            category_id: Some(category.to_string()),
            brand_id: Some(brand.to_string()),
            ..product(id)
        }
    }

    fn detail(id: &str, category: &str, brand_id: &str) -> ProductDetail {
        ProductDetail {
            id: id.to_string(),
            title: id.to_string(),
            slug: id.to_string(),
            description: None,
            quantity: 1,
            sold: 0,
            price: Money::from_cents(100),
            image_cover: String::new(),
            images: Vec::new(),
            ratings_average: 0.0,
            ratings_quantity: 0,
            category: Category {
                id: category.to_string(),
                name: category.to_string(),
                slug: category.to_string(),
                image: None,
            },
            brand: brand(brand_id),
            subcategories: Vec::new(),
        }
    }

    fn brand(name: &str) -> Brand {
        Brand {
            id: name.to_lowercase(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            image: None,
        }
    }

    #[test]
    fn test_filter_products_case_insensitive() {
        let products = vec![product("Woman Shawl"), product("Men Shirt"), product("Socks")];

        let hits: Vec<&str> = filter_products(&products, " sh ")
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(hits, vec!["Woman Shawl", "Men Shirt"]);
        assert_eq!(filter_products(&products, "").len(), 3);
    }

    #[test]
    fn test_filter_brands() {
        let brands = vec![brand("Canon"), brand("Dell"), brand("Adidas")];
        assert_eq!(filter_brands(&brands, "DE").len(), 1);
        assert_eq!(filter_brands(&brands, "a").len(), 2);
        assert!(filter_brands(&brands, "zz").is_empty());
    }

    #[test]
    fn test_related_by_brand_or_category() {
        let products = vec![
            listed("same", "men", "puma"),
            listed("brand", "kids", "puma"),
            listed("cat", "men", "nike"),
            listed("other", "kids", "nike"),
            product("loose"),
        ];
        let related: Vec<&str> = related_products(&detail("same", "men", "Puma"), &products)
            .iter()
            .map(|p| p.id.as_str())
            .collect();

        assert_eq!(related, vec!["brand", "cat"]);
    }

    #[test]
    fn test_related_capped() {
        let products: Vec<Product> = (0..12)
            .map(|i| listed(&format!("p{}", i), "men", "puma"))
            .collect();
        let related = related_products(&detail("p3", "men", "Puma"), &products);

        assert_eq!(related.len(), MAX_RELATED_PRODUCTS);
        assert!(related.iter().all(|p| p.id != "p3"));
        assert_eq!(related[3].id, "p4");
    }
}
