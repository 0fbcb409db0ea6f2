//! # Wire Format
//!
//! JSON shapes of the storefront backend and their conversion into the
//! validated core types.
//!
//! ## Boundary Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP body ──► *Dto (serde, lenient) ──► core type (validated)          │
//! │                                                                         │
//! │  • Missing optional fields default instead of failing the request      │
//! │  • Prices become Money exactly once, here                              │
//! │  • Cart lines with count 0 never reach CartState                       │
//! │  • `product` may be a populated object or a bare id                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cart Response
//! ```json
//! {
//!   "status": "success",
//!   "numOfCartItems": 2,
//!   "cartId": "6650...",
//!   "data": {
//!     "_id": "6650...",
//!     "products": [
//!       { "_id": "line1", "count": 2, "price": 10, "product": { "_id": "p1", "title": "Shirt" } }
//!     ],
//!     "totalCartPrice": 25.5
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use freshcart_core::{
    Brand, CartItem, CartSnapshot, Category, Money, PaymentMethod, Product, ProductDetail,
    ShippingAddress, Subcategory, UserProfile,
};

// =============================================================================
// Envelopes
// =============================================================================

/// `{ data: T }` wrapper used by every catalog endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Error body. The backend uses several shapes:
/// `{ message }`, `{ errors: { msg } }`, `{ errors: [{ msg }] }`, `{ error }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<ErrorDetails>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetails {
    Many(Vec<ErrorDetail>),
    One(ErrorDetail),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub msg: Option<String>,
}

impl ErrorBody {
    /// The most specific message the body carries.
    pub fn into_message(self) -> Option<String> {
        let from_errors = match self.errors {
            Some(ErrorDetails::One(d)) => d.msg,
            Some(ErrorDetails::Many(list)) => list.into_iter().find_map(|d| d.msg),
            None => None,
        };
        self.message
            .or(from_errors)
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}

// =============================================================================
// Catalog DTOs
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_cover: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub ratings_average: f64,
    #[serde(default)]
    pub category: Option<IdRef>,
    #[serde(default)]
    pub brand: Option<IdRef>,
}

/// A reference to another document: populated with an `_id`, or the bare id.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdRef {
    Populated {
        #[serde(rename = "_id")]
        id: String,
    },
    Id(String),
}

impl IdRef {
    pub fn into_id(self) -> String {
        match self {
            IdRef::Populated { id } | IdRef::Id(id) => id,
        }
    }
}

impl From<ProductDto> for Product {
    fn from(dto: ProductDto) -> Self {
        Product {
            id: dto.id,
            title: dto.title,
            image_cover: dto.image_cover,
            price: Money::from_decimal(dto.price),
            ratings_average: dto.ratings_average,
            category_id: dto.category.map(IdRef::into_id),
            brand_id: dto.brand.map(IdRef::into_id),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<CategoryDto> for Category {
    fn from(dto: CategoryDto) -> Self {
        Category {
            id: dto.id,
            name: dto.name,
            slug: dto.slug,
            image: dto.image,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrandDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<BrandDto> for Brand {
    fn from(dto: BrandDto) -> Self {
        Brand {
            id: dto.id,
            name: dto.name,
            slug: dto.slug,
            image: dto.image,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubcategoryDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub category: String,
}

impl From<SubcategoryDto> for Subcategory {
    fn from(dto: SubcategoryDto) -> Self {
        Subcategory {
            id: dto.id,
            name: dto.name,
            slug: dto.slug,
            category: dto.category,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub sold: Option<u32>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image_cover: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub ratings_average: f64,
    #[serde(default)]
    pub ratings_quantity: u32,
    pub category: CategoryDto,
    pub brand: BrandDto,
    #[serde(default)]
    pub subcategory: Vec<SubcategoryDto>,
}

impl From<ProductDetailDto> for ProductDetail {
    fn from(dto: ProductDetailDto) -> Self {
        ProductDetail {
            id: dto.id,
            title: dto.title,
            slug: dto.slug,
            description: dto.description,
            quantity: dto.quantity,
            sold: dto.sold.unwrap_or(0),
            price: Money::from_decimal(dto.price),
            image_cover: dto.image_cover,
            images: dto.images,
            ratings_average: dto.ratings_average,
            ratings_quantity: dto.ratings_quantity,
            category: dto.category.into(),
            brand: dto.brand.into(),
            subcategories: dto.subcategory.into_iter().map(Into::into).collect(),
        }
    }
}

// =============================================================================
// Cart DTOs
// =============================================================================

/// Response of every `/cart` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponseDto {
    #[serde(default)]
    pub num_of_cart_items: Option<u32>,
    #[serde(default)]
    pub cart_id: Option<String>,
    #[serde(default)]
    pub data: Option<CartDataDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDataDto {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub num_of_cart_items: Option<u32>,
    #[serde(default)]
    pub products: Vec<CartLineDto>,
    #[serde(default)]
    pub total_cart_price: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartLineDto {
    #[serde(rename = "_id")]
    pub id: String,
    /// Missing counts mean one unit.
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub product: Option<CartProductRef>,
}

/// The `product` field of a cart line: populated or a bare id.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CartProductRef {
    Populated(CartProductDto),
    Id(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProductDto {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image_cover: Option<String>,
}

impl From<CartLineDto> for CartItem {
    fn from(dto: CartLineDto) -> Self {
        let (product_id, title, image_url) = match dto.product {
            Some(CartProductRef::Populated(p)) => (Some(p.id), p.title, p.image_cover),
            Some(CartProductRef::Id(id)) => (Some(id), None, None),
            None => (None, None, None),
        };
        CartItem {
            cart_item_id: dto.id,
            product_id,
            title,
            image_url,
            unit_price: dto.price.map(Money::from_decimal),
            quantity: dto.count.unwrap_or(1),
        }
    }
}

impl From<CartResponseDto> for CartSnapshot {
    fn from(dto: CartResponseDto) -> Self {
        let data = dto.data.unwrap_or_default();
        let cart_id = dto.cart_id.or(data.id);
        let reported_count = dto.num_of_cart_items.or(data.num_of_cart_items);
        let reported_total = data.total_cart_price.map(Money::from_decimal);
        let lines = data.products.into_iter().map(CartItem::from).collect();

        CartSnapshot::from_lines(cart_id, reported_count, reported_total, lines)
    }
}

// =============================================================================
// Auth DTOs
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub re_password: &'a str,
    pub phone: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResetCodeRequest<'a> {
    pub reset_code: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest<'a> {
    pub email: &'a str,
    pub new_password: &'a str,
}

/// Sign in, sign up and reset password responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponseDto {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl From<UserDto> for UserProfile {
    fn from(dto: UserDto) -> Self {
        UserProfile {
            name: dto.name,
            email: dto.email,
            role: dto.role,
        }
    }
}

/// Forgot password and verify code responses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponseDto {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Checkout DTOs
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest<'a> {
    pub shipping_address: &'a ShippingAddress,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutResponseDto {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session: Option<SessionDto>,
    #[serde(default)]
    pub data: Option<CheckoutDataDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutDataDto {
    #[serde(default)]
    pub session: Option<SessionDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionDto {
    #[serde(default)]
    pub url: Option<String>,
}

impl CheckoutResponseDto {
    /// `session.url`, else `data.session.url`.
    pub fn redirect_url(&self) -> Option<&str> {
        self.session
            .as_ref()
            .and_then(|s| s.url.as_deref())
            .or_else(|| {
                self.data
                    .as_ref()
                    .and_then(|d| d.session.as_ref())
                    .and_then(|s| s.url.as_deref())
            })
            .filter(|u| !u.trim().is_empty())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_cart(value: serde_json::Value) -> CartSnapshot {
        serde_json::from_value::<CartResponseDto>(value).unwrap().into()
    }

    #[test]
    fn test_cart_total_computed_from_lines() {
        let snapshot = parse_cart(json!({
            "data": {
                "_id": "cart-1",
                "products": [
                    { "_id": "l1", "count": 2, "price": 10, "product": { "_id": "p1", "title": "Shirt" } },
                    { "_id": "l2", "count": 1, "price": 5.5, "product": "p2" }
                ]
            }
        }));

        assert_eq!(snapshot.total_price.to_decimal_string(), "25.50");
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.item_count, 2);
        assert_eq!(snapshot.cart_id.as_deref(), Some("cart-1"));
        assert_eq!(snapshot.items[0].title.as_deref(), Some("Shirt"));
        assert_eq!(snapshot.items[1].product_id.as_deref(), Some("p2"));
        assert_eq!(snapshot.items[1].title, None);
    }

    #[test]
    fn test_cart_count_fallback_chain() {
        let top = parse_cart(json!({
            "numOfCartItems": 9,
            "cartId": "top",
            "data": { "_id": "inner", "numOfCartItems": 4, "products": [] }
        }));
        assert_eq!(top.item_count, 9);
        assert_eq!(top.cart_id.as_deref(), Some("top"));

        let nested = parse_cart(json!({
            "data": { "numOfCartItems": 4, "products": [] }
        }));
        assert_eq!(nested.item_count, 4);

        let counted = parse_cart(json!({
            "data": { "products": [ { "_id": "l1", "price": 3 } ] }
        }));
        assert_eq!(counted.item_count, 1);
        assert_eq!(counted.items[0].quantity, 1);
    }

    #[test]
    fn test_cart_reported_total_is_rounded() {
        let snapshot = parse_cart(json!({
            "data": { "products": [], "totalCartPrice": 19.999 }
        }));
        assert_eq!(snapshot.total_price.to_decimal_string(), "20.00");
    }

    #[test]
    fn test_cart_zero_count_lines_dropped() {
        let snapshot = parse_cart(json!({
            "data": { "products": [
                { "_id": "l1", "count": 0, "price": 10, "product": "p1" },
                { "_id": "l2", "count": 3, "price": 1, "product": "p2" }
            ] }
        }));
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].cart_item_id, "l2");
    }

    #[test]
    fn test_cart_huge_price_is_clamped() {
        let snapshot = parse_cart(json!({
            "numOfCartItems": 1,
            "data": { "_id": "c1", "products": [
                { "_id": "l1", "count": 3, "price": 1e17, "product": "p1" }
            ] }
        }));
        let line = &snapshot.items[0];
        assert_eq!(line.unit_price.map(|p| p.cents()), Some(Money::MAX_WIRE_CENTS));
        assert_eq!(snapshot.total_price.cents(), Money::MAX_WIRE_CENTS * 3);
    }

    #[test]
    fn test_empty_cart_response() {
        let snapshot = parse_cart(json!({ "status": "success" }));
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.item_count, 0);
        assert!(snapshot.total_price.is_zero());
    }

    #[test]
    fn test_error_body_shapes() {
        let body: ErrorBody = serde_json::from_value(json!({ "message": "Invalid Token" })).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Invalid Token"));

        let body: ErrorBody =
            serde_json::from_value(json!({ "errors": { "msg": "Invalid email" } })).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Invalid email"));

        let body: ErrorBody =
            serde_json::from_value(json!({ "errors": [{ "param": "x" }, { "msg": "second" }] }))
                .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("second"));

        let body: ErrorBody = serde_json::from_value(json!({ "message": "" })).unwrap();
        assert_eq!(body.into_message(), None);
    }

    #[test]
    fn test_product_detail_conversion() {
        let dto: ProductDetailDto = serde_json::from_value(json!({
            "_id": "p1",
            "title": "Woman Shawl",
            "slug": "woman-shawl",
            "quantity": 225,
            "sold": 1,
            "price": 149,
            "imageCover": "cover.jpg",
            "images": ["a.jpg"],
            "ratingsAverage": 4.8,
            "ratingsQuantity": 18,
            "category": { "_id": "c1", "name": "Women's Fashion", "slug": "womens-fashion" },
            "brand": { "_id": "b1", "name": "DeFacto", "slug": "defacto" },
            "subcategory": [{ "_id": "s1", "name": "Women's Clothing", "slug": "womens-clothing", "category": "c1" }]
        }))
        .unwrap();

        let detail: ProductDetail = dto.into();
        assert_eq!(detail.price.to_decimal_string(), "149.00");
        assert_eq!(detail.brand.name, "DeFacto");
        assert_eq!(detail.subcategories.len(), 1);
        assert!(detail.in_stock());
    }

    #[test]
    fn test_product_listing_refs() {
        let products: DataEnvelope<Vec<ProductDto>> = serde_json::from_value(json!({
            "data": [
                {
                    "_id": "p1", "title": "Woman Shawl", "price": 149,
                    "category": { "_id": "c1", "name": "Women's Fashion" },
                    "brand": { "_id": "b1", "name": "DeFacto" }
                },
                { "_id": "p2", "title": "Socks", "price": 5.5, "category": "c2" }
            ]
        }))
        .unwrap();

        let products: Vec<Product> = products.data.into_iter().map(Product::from).collect();
        assert_eq!(products[0].category_id.as_deref(), Some("c1"));
        assert_eq!(products[0].brand_id.as_deref(), Some("b1"));
        assert_eq!(products[1].category_id.as_deref(), Some("c2"));
        assert_eq!(products[1].brand_id, None);
    }

    #[test]
    fn test_checkout_redirect_url() {
        let top: CheckoutResponseDto =
            serde_json::from_value(json!({ "session": { "url": "https://pay/1" } })).unwrap();
        assert_eq!(top.redirect_url(), Some("https://pay/1"));

        let nested: CheckoutResponseDto =
            serde_json::from_value(json!({ "data": { "session": { "url": "https://pay/2" } } }))
                .unwrap();
        assert_eq!(nested.redirect_url(), Some("https://pay/2"));

        let none: CheckoutResponseDto =
            serde_json::from_value(json!({ "message": "success" })).unwrap();
        assert_eq!(none.redirect_url(), None);
    }

    #[test]
    fn test_request_bodies_use_camel_case() {
        let body = serde_json::to_value(SignUpRequest {
            name: "Mona",
            email: "m@x.io",
            password: "secret1",
            re_password: "secret1",
            phone: "01012345678",
        })
        .unwrap();
        assert_eq!(body["rePassword"], "secret1");

        let address = ShippingAddress {
            details: "d".into(),
            phone: "p".into(),
            city: "c".into(),
        };
        let body = serde_json::to_value(CheckoutRequest {
            shipping_address: &address,
            payment_method: PaymentMethod::Cash,
        })
        .unwrap();
        assert_eq!(body["paymentMethod"], "cash");
        assert_eq!(body["shippingAddress"]["city"], "c");
    }
}
