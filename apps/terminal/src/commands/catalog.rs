//! # Catalog Commands
//!
//! Lists are fetched whole and filtered locally; a failed load replaces
//! the screen with a retryable error.

use tracing::{debug, warn};

use freshcart_client::Storefront;
use freshcart_core::catalog::{
    filter_brands, filter_categories, filter_products, related_products,
};
use freshcart_core::validation::{normalize_search_query, validate_product_id};
use freshcart_core::Screen;

use crate::error::{AppError, AppResult};
use crate::render::View;
use crate::state::AppState;

pub async fn products<S: Storefront>(
    app: &mut AppState<S>,
    search: Option<String>,
) -> AppResult<View> {
    let query = search
        .map(|s| normalize_search_query(&s))
        .filter(|s| !s.is_empty());
    app.navigator.navigate(Screen::Products {
        initial_search: query.clone(),
    });

    let all = app
        .backend
        .list_products()
        .await
        .map_err(AppError::full_screen)?;
    let products: Vec<_> = filter_products(&all, query.as_deref().unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();
    debug!(total = all.len(), shown = products.len(), "Products filtered");

    Ok(View::Products { query, products })
}

pub async fn product<S: Storefront>(app: &mut AppState<S>, id: &str) -> AppResult<View> {
    validate_product_id(id)?;
    let id = id.trim();
    app.navigator.navigate(Screen::ProductDetails {
        product_id: id.to_string(),
    });

    let product = app
        .backend
        .product_detail(id)
        .await
        .map_err(AppError::full_screen)?;

    // Best-effort: a failed listing leaves the related section empty.
    let related = match app.backend.list_products().await {
        Ok(all) => related_products(&product, &all)
            .into_iter()
            .cloned()
            .collect(),
        Err(e) => {
            warn!(error = %e, "Could not load related products");
            Vec::new()
        }
    };

    Ok(View::ProductDetail {
        product: Box::new(product),
        related,
    })
}

pub async fn brands<S: Storefront>(
    app: &mut AppState<S>,
    search: Option<String>,
) -> AppResult<View> {
    app.navigator.navigate(Screen::Brands);
    let all = app
        .backend
        .list_brands()
        .await
        .map_err(AppError::full_screen)?;
    let brands = filter_brands(&all, search.as_deref().unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();
    Ok(View::Brands { brands })
}

/// Categories have no screen of their own; they show on Home.
pub async fn categories<S: Storefront>(
    app: &mut AppState<S>,
    search: Option<String>,
) -> AppResult<View> {
    app.navigator.navigate(Screen::Home);
    let all = app
        .backend
        .list_categories()
        .await
        .map_err(AppError::full_screen)?;
    let categories = filter_categories(&all, search.as_deref().unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();
    Ok(View::Categories { categories })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::*;
    use crate::error::{ErrorCode, Surface};

    #[tokio::test]
    async fn test_products_search() {
        let mut app = signed_in();
        let view = products(&mut app, Some("  SHIRT ".into())).await.unwrap();

        match view {
            View::Products { query, products } => {
                assert_eq!(query.as_deref(), Some("shirt"));
                assert_eq!(products.len(), 1);
                assert_eq!(products[0].id, "p-shirt");
            }
            other => panic!("unexpected view {other:?}"),
        }
        assert_eq!(
            app.navigator.current(),
            &Screen::Products {
                initial_search: Some("shirt".into())
            }
        );
    }

    #[tokio::test]
    async fn test_blank_search_lists_all() {
        let mut app = signed_in();
        match products(&mut app, Some("   ".into())).await.unwrap() {
            View::Products { query, products } => {
                assert_eq!(query, None);
                assert_eq!(products.len(), 3);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_products_load_failure_is_full_screen() {
        let mut app = signed_in();
        app.backend.fail_next(503, None);

        let err = products(&mut app, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ServerError);
        assert_eq!(err.surface, Surface::FullScreen { retry: true });

        // Retry succeeds once the server recovers.
        assert!(products(&mut app, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_product_detail() {
        let mut app = signed_in();
        match product(&mut app, "p-sock").await.unwrap() {
            View::ProductDetail { product, related } => {
                assert_eq!(product.title, "Wool Socks");
                assert_eq!(product.price.to_decimal_string(), "5.50");
                assert_eq!(product.brand.name, "Adidas");
                let ids: Vec<&str> = related.iter().map(|p| p.id.as_str()).collect();
                assert_eq!(ids, vec!["p-shirt"]);
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_related_load_failure_keeps_detail() {
        let mut app = signed_in();
        // The detail call succeeds, the listing behind it fails.
        app.backend.fail_next_after(1, 503, None);

        match product(&mut app, "p-shirt").await.unwrap() {
            View::ProductDetail { product, related } => {
                assert_eq!(product.id, "p-shirt");
                assert!(related.is_empty());
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let mut app = signed_in();
        let err = product(&mut app, "nope").await.unwrap_err();
        assert_eq!(err.message, "No product for this id nope");
        assert!(matches!(err.surface, Surface::FullScreen { .. }));

        let err = product(&mut app, "  ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_brand_and_category_filters() {
        let mut app = signed_in();
        match brands(&mut app, Some("adi".into())).await.unwrap() {
            View::Brands { brands } => assert_eq!(brands[0].name, "Adidas"),
            other => panic!("unexpected view {other:?}"),
        }
        assert_eq!(app.navigator.current(), &Screen::Brands);

        match categories(&mut app, Some("men's".into())).await.unwrap() {
            View::Categories { categories } => assert_eq!(categories.len(), 2),
            other => panic!("unexpected view {other:?}"),
        }
    }
}
