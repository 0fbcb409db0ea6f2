//! # In-Memory Storefront
//!
//! A scripted stand-in for the backend implementing every collaborator
//! trait. Used by the store, auth and checkout tests; other crates reach
//! it through the `test-util` feature.
//!
//! ## Scripting
//! ```text
//! fail_next(status, message)  next cart, catalog or checkout call fails once
//! fail_next_after(n, ..)      same, after letting n calls through
//! delay_next(duration)        next cart call answers late
//! cart_calls()                how many cart calls reached the fake
//! cart_log()                  which cart calls, e.g. "update p1 3"
//! ```
//!
//! Mutations are applied when a call arrives and the snapshot is taken at
//! that moment; only the answer is delayed. This lets tests reorder
//! responses the way a slow network would.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use freshcart_core::{
    AuthToken, Brand, CartItem, CartSnapshot, Category, LoginForm, Money, PaymentMethod, Product,
    ProductDetail, RegistrationForm, ShippingAddress, UserProfile,
};

use crate::api::{AccountApi, AuthGrant, CartApi, CatalogApi, CheckoutApi, CheckoutReceipt};
use crate::error::{ClientError, ClientResult};

/// Reset code the fake "mails" to every account.
pub const FAKE_RESET_CODE: &str = "123456";

#[derive(Debug, Clone)]
struct Account {
    name: String,
    password: String,
}

#[derive(Debug, Clone, Default)]
struct Cart {
    id: String,
    /// (product id, count), in insertion order.
    lines: Vec<(String, u32)>,
}

#[derive(Debug, Default)]
struct Inner {
    products: Vec<Product>,
    brands: Vec<Brand>,
    categories: Vec<Category>,
    carts: HashMap<String, Cart>,
    accounts: HashMap<String, Account>,
    reset_requested: Option<String>,
    /// One slot per upcoming call; `None` lets that call through.
    failures: VecDeque<Option<(u16, Option<String>)>>,
    delays: VecDeque<Duration>,
    cart_log: Vec<String>,
    last_checkout: Option<(String, ShippingAddress, PaymentMethod)>,
}

/// In-memory backend.
#[derive(Debug, Default)]
pub struct FakeStorefront {
    inner: Mutex<Inner>,
    cart_calls: AtomicUsize,
    issue_tokens: AtomicBool,
    omit_redirect: AtomicBool,
}

impl FakeStorefront {
    /// An empty storefront that issues tokens.
    pub fn new() -> Self {
        let fake = Self::default();
        fake.issue_tokens.store(true, Ordering::SeqCst);
        fake
    }

    /// A storefront with a small catalog.
    pub fn with_catalog() -> Self {
        let fake = Self::new();
        fake.add_product("p-shirt", "Cotton Shirt", 10.0, "c-men", "b-defacto");
        fake.add_product("p-sock", "Wool Socks", 5.5, "c-men", "b-adidas");
        fake.add_product("p-shawl", "Woman Shawl", 149.0, "c-women", "b-defacto");
        fake.with_inner(|inner| {
            inner.brands = vec![
                brand("b-defacto", "DeFacto"),
                brand("b-adidas", "Adidas"),
                brand("b-puma", "Puma"),
            ];
            inner.categories = vec![
                Category {
                    id: "c-women".into(),
                    name: "Women's Fashion".into(),
                    slug: "womens-fashion".into(),
                    image: None,
                },
                Category {
                    id: "c-men".into(),
                    name: "Men's Fashion".into(),
                    slug: "mens-fashion".into(),
                    image: None,
                },
            ];
        });
        fake
    }

    pub fn add_product(
        &self,
        id: &str,
        title: &str,
        price: f64,
        category_id: &str,
        brand_id: &str,
    ) {
        self.with_inner(|inner| {
            inner.products.push(Product {
                id: id.to_string(),
                title: title.to_string(),
                image_cover: format!("{}.jpg", id),
                price: Money::from_decimal(price),
                ratings_average: 4.5,
                category_id: Some(category_id.to_string()),
                brand_id: Some(brand_id.to_string()),
            })
        });
    }

    pub fn add_account(&self, name: &str, email: &str, password: &str) {
        self.with_inner(|inner| {
            inner.accounts.insert(
                email.to_string(),
                Account {
                    name: name.to_string(),
                    password: password.to_string(),
                },
            );
        });
    }

    /// Puts `count` of `product_id` into the cart of `token`.
    pub fn seed_cart(&self, token: &AuthToken, product_id: &str, count: u32) {
        self.with_inner(|inner| {
            let cart = cart_for(&mut inner.carts, token);
            set_line(cart, product_id, count);
        });
    }

    /// Makes the next cart, catalog or checkout call fail. A `None` message
    /// models a body without one.
    pub fn fail_next(&self, status: u16, message: Option<&str>) {
        self.fail_next_after(0, status, message);
    }

    /// Lets `skip` calls through, then fails the one after.
    pub fn fail_next_after(&self, skip: usize, status: u16, message: Option<&str>) {
        self.with_inner(|inner| {
            inner.failures.extend(std::iter::repeat(None).take(skip));
            inner
                .failures
                .push_back(Some((status, message.map(str::to_string))));
        });
    }

    /// Delays the answer of the next cart call.
    pub fn delay_next(&self, delay: Duration) {
        self.with_inner(|inner| inner.delays.push_back(delay));
    }

    /// When false, auth responses come back without a token.
    pub fn set_issue_tokens(&self, issue: bool) {
        self.issue_tokens.store(issue, Ordering::SeqCst);
    }

    /// When true, online checkout sessions come back without a URL.
    pub fn set_omit_redirect(&self, omit: bool) {
        self.omit_redirect.store(omit, Ordering::SeqCst);
    }

    /// Number of cart calls that reached the fake.
    pub fn cart_calls(&self) -> usize {
        self.cart_calls.load(Ordering::SeqCst)
    }

    /// Cart calls in arrival order: `fetch`, `add <id>`, `update <id> <n>`,
    /// `remove <id>`.
    pub fn cart_log(&self) -> Vec<String> {
        self.with_inner(|inner| inner.cart_log.clone())
    }

    /// The server-side view of the cart of `token`.
    pub fn server_cart(&self, token: &AuthToken) -> CartSnapshot {
        self.with_inner(|inner| {
            let products = inner.products.clone();
            let cart = cart_for(&mut inner.carts, token);
            snapshot_of(cart, &products)
        })
    }

    /// Arguments of the most recent checkout call.
    pub fn last_checkout(&self) -> Option<(String, ShippingAddress, PaymentMethod)> {
        self.with_inner(|inner| inner.last_checkout.clone())
    }

    fn with_inner<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    fn take_failure(&self) -> ClientResult<()> {
        match self.with_inner(|inner| inner.failures.pop_front().flatten()) {
            None => Ok(()),
            Some((401, message)) => Err(ClientError::Unauthorized(
                message.unwrap_or_else(|| "Unauthorized".to_string()),
            )),
            Some((status, Some(message))) => Err(ClientError::Api { status, message }),
            Some((status, None)) => Err(ClientError::Status(status)),
        }
    }

    /// Runs one cart call: count it, apply `mutate`, then answer late if
    /// a delay was scripted.
    async fn cart_call<F>(
        &self,
        label: String,
        token: &AuthToken,
        mutate: F,
    ) -> ClientResult<CartSnapshot>
    where
        F: FnOnce(&mut Cart, &[Product]) -> ClientResult<()> + Send,
    {
        self.cart_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.with_inner(|inner| {
            inner.cart_log.push(label);
            inner.delays.pop_front()
        });

        let result = self.take_failure().and_then(|()| {
            self.with_inner(|inner| {
                let products = inner.products.clone();
                let cart = cart_for(&mut inner.carts, token);
                mutate(cart, &products)?;
                Ok(snapshot_of(cart, &products))
            })
        });

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }

    fn grant(&self, email: &str, account: &Account) -> AuthGrant {
        let token = if self.issue_tokens.load(Ordering::SeqCst) {
            AuthToken::new(format!("token-{}", Uuid::new_v4()))
        } else {
            None
        };
        AuthGrant {
            token,
            user: Some(UserProfile {
                name: account.name.clone(),
                email: email.to_string(),
                role: Some("user".to_string()),
            }),
            message: Some("success".to_string()),
        }
    }
}

fn brand(id: &str, name: &str) -> Brand {
    Brand {
        id: id.to_string(),
        name: name.to_string(),
        slug: name.to_lowercase(),
        image: None,
    }
}

fn cart_for<'a>(carts: &'a mut HashMap<String, Cart>, token: &AuthToken) -> &'a mut Cart {
    carts
        .entry(token.as_str().to_string())
        .or_insert_with(|| Cart {
            id: format!("cart-{}", Uuid::new_v4()),
            lines: Vec::new(),
        })
}

fn set_line(cart: &mut Cart, product_id: &str, count: u32) {
    match cart.lines.iter_mut().find(|(id, _)| id == product_id) {
        Some(line) => line.1 = count,
        None => cart.lines.push((product_id.to_string(), count)),
    }
    cart.lines.retain(|(_, c)| *c > 0);
}

fn not_in_cart(product_id: &str) -> ClientError {
    ClientError::Api {
        status: 404,
        message: format!("No product in cart for this id: {}", product_id),
    }
}

fn snapshot_of(cart: &Cart, products: &[Product]) -> CartSnapshot {
    let lines = cart
        .lines
        .iter()
        .map(|(product_id, count)| {
            let product = products.iter().find(|p| &p.id == product_id);
            CartItem {
                cart_item_id: format!("line-{}", product_id),
                product_id: Some(product_id.clone()),
                title: product.map(|p| p.title.clone()),
                image_url: product.map(|p| p.image_cover.clone()),
                unit_price: product.map(|p| p.price),
                quantity: *count,
            }
        })
        .collect();
    CartSnapshot::from_lines(Some(cart.id.clone()), None, None, lines)
}

#[async_trait]
impl CartApi for FakeStorefront {
    async fn fetch_cart_snapshot(&self, token: &AuthToken) -> ClientResult<CartSnapshot> {
        self.cart_call("fetch".to_string(), token, |_, _| Ok(()))
            .await
    }

    async fn add_item(&self, product_id: &str, token: &AuthToken) -> ClientResult<CartSnapshot> {
        let label = format!("add {}", product_id);
        self.cart_call(label, token, |cart, products| {
            if !products.iter().any(|p| p.id == product_id) {
                return Err(ClientError::Api {
                    status: 404,
                    message: format!("No product for this id {}", product_id),
                });
            }
            let count = cart
                .lines
                .iter()
                .find(|(id, _)| id == product_id)
                .map_or(0, |(_, c)| *c);
            set_line(cart, product_id, count + 1);
            Ok(())
        })
        .await
    }

    async fn set_item_quantity(
        &self,
        token: &AuthToken,
        product_id: &str,
        count: u32,
    ) -> ClientResult<CartSnapshot> {
        let label = format!("update {} {}", product_id, count);
        self.cart_call(label, token, |cart, _| {
            if !cart.lines.iter().any(|(id, _)| id == product_id) {
                return Err(not_in_cart(product_id));
            }
            set_line(cart, product_id, count);
            Ok(())
        })
        .await
    }

    async fn remove_item(
        &self,
        token: &AuthToken,
        product_id: &str,
    ) -> ClientResult<CartSnapshot> {
        let label = format!("remove {}", product_id);
        self.cart_call(label, token, |cart, _| {
            if !cart.lines.iter().any(|(id, _)| id == product_id) {
                return Err(not_in_cart(product_id));
            }
            set_line(cart, product_id, 0);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl CatalogApi for FakeStorefront {
    async fn list_products(&self) -> ClientResult<Vec<Product>> {
        self.take_failure()?;
        Ok(self.with_inner(|inner| inner.products.clone()))
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.take_failure()?;
        Ok(self.with_inner(|inner| inner.categories.clone()))
    }

    async fn list_brands(&self) -> ClientResult<Vec<Brand>> {
        self.take_failure()?;
        Ok(self.with_inner(|inner| inner.brands.clone()))
    }

    async fn product_detail(&self, product_id: &str) -> ClientResult<ProductDetail> {
        self.take_failure()?;
        self.with_inner(|inner| {
            let product = inner
                .products
                .iter()
                .find(|p| p.id == product_id)
                .ok_or_else(|| ClientError::Api {
                    status: 404,
                    message: format!("No product for this id {}", product_id),
                })?;
            let category = inner
                .categories
                .iter()
                .find(|c| product.category_id.as_deref() == Some(c.id.as_str()))
                .cloned()
                .unwrap_or_else(|| Category {
                    id: "c-misc".into(),
                    name: "Misc".into(),
                    slug: "misc".into(),
                    image: None,
                });
            let brand = inner
                .brands
                .iter()
                .find(|b| product.brand_id.as_deref() == Some(b.id.as_str()))
                .cloned()
                .unwrap_or_else(|| brand("b-none", "Generic"));

            Ok(ProductDetail {
                id: product.id.clone(),
                title: product.title.clone(),
                slug: product.title.to_lowercase().replace(' ', "-"),
                description: Some(format!("{} from the fake storefront", product.title)),
                quantity: 10,
                sold: 0,
                price: product.price,
                image_cover: product.image_cover.clone(),
                images: vec![product.image_cover.clone()],
                ratings_average: product.ratings_average,
                ratings_quantity: 3,
                category,
                brand,
                subcategories: Vec::new(),
            })
        })
    }
}

#[async_trait]
impl AccountApi for FakeStorefront {
    async fn sign_in(&self, form: &LoginForm) -> ClientResult<AuthGrant> {
        let email = form.email.trim();
        let account = self.with_inner(|inner| inner.accounts.get(email).cloned());
        match account {
            Some(account) if account.password == form.password => {
                Ok(self.grant(email, &account))
            }
            _ => Err(ClientError::Unauthorized(
                "Incorrect email or password".to_string(),
            )),
        }
    }

    async fn sign_up(&self, form: &RegistrationForm) -> ClientResult<AuthGrant> {
        let email = form.email.trim().to_string();
        let account = Account {
            name: form.name.trim().to_string(),
            password: form.password.clone(),
        };
        let created = self.with_inner(|inner| {
            if inner.accounts.contains_key(&email) {
                false
            } else {
                inner.accounts.insert(email.clone(), account.clone());
                true
            }
        });
        if !created {
            return Err(ClientError::Api {
                status: 409,
                message: "Account Already Exists".to_string(),
            });
        }
        Ok(self.grant(&email, &account))
    }

    async fn forgot_password(&self, email: &str) -> ClientResult<Option<String>> {
        self.with_inner(|inner| {
            if !inner.accounts.contains_key(email) {
                return Err(ClientError::Api {
                    status: 404,
                    message: format!("There is no user registered with this email address {}", email),
                });
            }
            inner.reset_requested = Some(email.to_string());
            Ok(Some("Reset code sent to your email".to_string()))
        })
    }

    async fn verify_reset_code(&self, code: &str) -> ClientResult<()> {
        let requested = self.with_inner(|inner| inner.reset_requested.is_some());
        if requested && code == FAKE_RESET_CODE {
            Ok(())
        } else {
            Err(ClientError::Api {
                status: 400,
                message: "Reset code is invalid or has expired".to_string(),
            })
        }
    }

    async fn reset_password(&self, email: &str, new_password: &str) -> ClientResult<AuthGrant> {
        let account = self.with_inner(|inner| {
            inner.accounts.get_mut(email).map(|account| {
                account.password = new_password.to_string();
                account.clone()
            })
        });
        match account {
            Some(account) => Ok(self.grant(email, &account)),
            None => Err(ClientError::Api {
                status: 404,
                message: format!("There is no user with email {}", email),
            }),
        }
    }
}

#[async_trait]
impl CheckoutApi for FakeStorefront {
    async fn create_checkout_session(
        &self,
        token: &AuthToken,
        cart_id: &str,
        address: &ShippingAddress,
        method: PaymentMethod,
    ) -> ClientResult<CheckoutReceipt> {
        self.take_failure()?;
        self.with_inner(|inner| {
            let known = inner
                .carts
                .get(token.as_str())
                .map_or(false, |cart| cart.id == cart_id);
            if !known {
                return Err(ClientError::Api {
                    status: 404,
                    message: format!("There is no cart for this id {}", cart_id),
                });
            }
            inner.last_checkout = Some((cart_id.to_string(), address.clone(), method));
            Ok(())
        })?;

        let redirect_url = match method {
            PaymentMethod::Online if !self.omit_redirect.load(Ordering::SeqCst) => {
                Some(format!("https://checkout.example.com/pay/{}", cart_id))
            }
            _ => None,
        };
        Ok(CheckoutReceipt {
            redirect_url,
            message: Some("success".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> AuthToken {
        AuthToken::new("t-1").unwrap()
    }

    #[tokio::test]
    async fn test_add_and_remove() {
        let fake = FakeStorefront::with_catalog();
        let snapshot = fake.add_item("p-shirt", &token()).await.unwrap();
        assert_eq!(snapshot.item_count, 1);

        let snapshot = fake.add_item("p-shirt", &token()).await.unwrap();
        assert_eq!(snapshot.items[0].quantity, 2);
        assert_eq!(snapshot.total_price.to_decimal_string(), "20.00");

        let snapshot = fake.remove_item(&token(), "p-shirt").await.unwrap();
        assert!(snapshot.items.is_empty());
        assert_eq!(fake.cart_calls(), 3);
    }

    #[tokio::test]
    async fn test_scripted_failure_is_used_once() {
        let fake = FakeStorefront::with_catalog();
        fake.fail_next(500, None);

        let err = fake.fetch_cart_snapshot(&token()).await.unwrap_err();
        assert!(matches!(err, ClientError::Status(500)));
        assert!(fake.fetch_cart_snapshot(&token()).await.is_ok());
    }

    #[tokio::test]
    async fn test_sign_in_checks_password() {
        let fake = FakeStorefront::new();
        fake.add_account("Mona", "mona@example.com", "secret1");

        let bad = LoginForm {
            email: "mona@example.com".into(),
            password: "nope".into(),
        };
        assert!(fake.sign_in(&bad).await.unwrap_err().is_auth_error());

        let good = LoginForm {
            email: "mona@example.com".into(),
            password: "secret1".into(),
        };
        let grant = fake.sign_in(&good).await.unwrap();
        assert!(grant.token.is_some());
        assert_eq!(grant.user.unwrap().name, "Mona");
    }
}
