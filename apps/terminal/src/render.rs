//! # Rendering
//!
//! Views are what a command produced; rendering turns them into text (or
//! JSON with `--json`) under a header naming the current screen.
//!
//! ```text
//! ── Cart ─────────────────────────────────────────── 🛒 3
//!   Cotton Shirt                x2        $10.00     $20.00
//!   Wool Socks                  x1         $5.50      $5.50
//!                                            Total    $25.50
//! ```

use std::fmt::Write;

use serde::Serialize;

use freshcart_core::navigation::{containers_of, Container};
use freshcart_core::{
    Brand, CartItem, CartState, Category, CheckoutOutcome, Product, ProductDetail, Screen,
};

use crate::error::{AppError, Surface};

const WIDTH: usize = 60;

/// One line of the cart screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    pub product_id: Option<String>,
    pub title: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
    /// An update or remove is in flight for this line.
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub cart_id: Option<String>,
    pub item_count: u32,
    pub total: String,
    pub items: Vec<CartLineView>,
}

impl CartView {
    pub fn from_state(state: &CartState) -> Self {
        let items = state
            .items
            .iter()
            .map(|item| line_view(state, item))
            .collect();
        CartView {
            cart_id: state.cart_id.clone(),
            item_count: state.item_count,
            total: state.total_price.to_decimal_string(),
            items,
        }
    }
}

fn line_view(state: &CartState, item: &CartItem) -> CartLineView {
    CartLineView {
        product_id: item.product_id.clone(),
        title: item
            .title
            .clone()
            .or_else(|| item.product_id.clone())
            .unwrap_or_else(|| item.cart_item_id.clone()),
        quantity: item.quantity,
        unit_price: item
            .unit_price
            .map(|p| p.to_decimal_string())
            .unwrap_or_else(|| "-".to_string()),
        line_total: item.line_total().to_decimal_string(),
        busy: item
            .product_id
            .as_deref()
            .is_some_and(|id| state.is_busy(id)),
    }
}

/// One row of the screen graph listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenRow {
    pub screen: String,
    pub containers: Vec<Container>,
    pub requires_auth: bool,
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Message {
        text: String,
    },
    Session {
        signed_in: bool,
        email: Option<String>,
        badge: Option<u32>,
    },
    Products {
        query: Option<String>,
        products: Vec<Product>,
    },
    ProductDetail {
        product: Box<ProductDetail>,
        related: Vec<Product>,
    },
    Brands {
        brands: Vec<Brand>,
    },
    Categories {
        categories: Vec<Category>,
    },
    Cart {
        cart: CartView,
    },
    Checkout {
        outcome: CheckoutOutcome,
    },
    Screens {
        rows: Vec<ScreenRow>,
    },
}

impl View {
    pub fn message(text: impl Into<String>) -> Self {
        View::Message { text: text.into() }
    }
}

/// Header line: screen title and the cart badge.
pub fn header(screen: &Screen, badge: Option<u32>) -> String {
    let title = format!("── {} ", screen.title());
    let badge = badge.map(|n| format!(" 🛒 {}", n)).unwrap_or_default();
    let fill = WIDTH.saturating_sub(title.chars().count() + badge.chars().count());
    format!("{}{}{}", title, "─".repeat(fill), badge)
}

/// Renders `view` as text.
pub fn text(screen: &Screen, badge: Option<u32>, view: &View) -> String {
    let mut out = header(screen, badge);
    out.push('\n');

    match view {
        View::Message { text } => {
            let _ = writeln!(out, "  {}", text);
        }
        View::Session {
            signed_in,
            email,
            badge,
        } => {
            let who = match (signed_in, email) {
                (true, Some(email)) => format!("Signed in as {}", email),
                (true, None) => "Signed in".to_string(),
                (false, _) => "Not signed in".to_string(),
            };
            let _ = writeln!(out, "  {}", who);
            let _ = writeln!(out, "  Cart items: {}", badge.unwrap_or(0));
        }
        View::Products { query, products } => {
            if let Some(query) = query {
                let _ = writeln!(out, "  Search: \"{}\"", query);
            }
            if products.is_empty() {
                let _ = writeln!(out, "  No products found");
            }
            for p in products {
                product_row(&mut out, p);
            }
        }
        View::ProductDetail { product, related } => {
            let _ = writeln!(out, "  {}", product.title);
            let _ = writeln!(out, "  Price:    {}", product.price);
            let _ = writeln!(
                out,
                "  Rating:   ★ {:.1} ({} reviews)",
                product.ratings_average, product.ratings_quantity
            );
            let stock = if product.in_stock() {
                format!("{} in stock", product.quantity)
            } else {
                "Out of stock".to_string()
            };
            let _ = writeln!(out, "  Stock:    {}", stock);
            let _ = writeln!(out, "  Category: {}", product.category.name);
            let _ = writeln!(out, "  Brand:    {}", product.brand.name);
            if let Some(description) = &product.description {
                let _ = writeln!(out, "\n  {}", description);
            }
            if !related.is_empty() {
                let _ = writeln!(out, "\n  Related products");
                for p in related {
                    product_row(&mut out, p);
                }
            }
        }
        View::Brands { brands } => {
            for b in brands {
                let _ = writeln!(out, "  {:<28} [{}]", b.name, b.id);
            }
        }
        View::Categories { categories } => {
            for c in categories {
                let _ = writeln!(out, "  {:<28} [{}]", c.name, c.id);
            }
        }
        View::Cart { cart } => {
            if cart.items.is_empty() {
                let _ = writeln!(out, "  Your cart is empty");
            }
            for line in &cart.items {
                let marker = if line.busy { "…" } else { " " };
                let _ = writeln!(
                    out,
                    " {}{:<28} x{:<4} {:>10} {:>10}",
                    marker,
                    truncate(&line.title, 28),
                    line.quantity,
                    format!("${}", line.unit_price),
                    format!("${}", line.line_total)
                );
            }
            let _ = writeln!(out, "  {:>45} {:>10}", "Total", format!("${}", cart.total));
        }
        View::Checkout { outcome } => match outcome {
            CheckoutOutcome::Redirect { url } => {
                let _ = writeln!(out, "  Continue to payment:");
                let _ = writeln!(out, "  {}", url);
            }
            CheckoutOutcome::Placed { message } => {
                let _ = writeln!(out, "  {}", message);
            }
        },
        View::Screens { rows } => {
            for row in rows {
                let containers: Vec<String> =
                    row.containers.iter().map(|c| format!("{:?}", c)).collect();
                let lock = if row.requires_auth { "" } else { "  (public)" };
                let _ = writeln!(
                    out,
                    "  {:<18} {}{}",
                    row.screen,
                    containers.join(", "),
                    lock
                );
            }
        }
    }

    out
}

/// Renders an error as text.
pub fn error(screen: &Screen, err: &AppError) -> String {
    let mut out = header(screen, None);
    out.push('\n');
    match &err.surface {
        Surface::Toast => {
            let _ = writeln!(out, "  ! {}", err.message);
        }
        Surface::Inline { fields } => {
            for (field, message) in fields {
                let _ = writeln!(out, "  {:<16} {}", field, message);
            }
        }
        Surface::FullScreen { retry } => {
            let _ = writeln!(out, "\n  Something went wrong\n  {}", err.message);
            if *retry {
                let _ = writeln!(out, "\n  [ Retry ]  run the command again");
            }
        }
    }
    if err.is_auth_required() {
        let _ = writeln!(out, "  Sign in with `freshcart login`");
    }
    out
}

/// Renders any serializable value as pretty JSON.
pub fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
}

/// The screen graph, one row per screen.
pub fn screen_rows() -> Vec<ScreenRow> {
    let screens = [
        Screen::Splash,
        Screen::Register,
        Screen::Login,
        Screen::ForgetPassword,
        Screen::Home,
        Screen::Products {
            initial_search: None,
        },
        Screen::ProductDetails {
            product_id: String::new(),
        },
        Screen::Cart,
        Screen::Checkout,
        Screen::OnlinePay { url: String::new() },
        Screen::CashPay {
            message: String::new(),
        },
        Screen::Brands,
        Screen::Wishlist,
        Screen::Addresses,
        Screen::Orders,
    ];
    screens
        .iter()
        .map(|s| ScreenRow {
            screen: s.title().to_string(),
            containers: containers_of(s).to_vec(),
            requires_auth: s.requires_auth(),
        })
        .collect()
}

fn product_row(out: &mut String, p: &Product) {
    let _ = writeln!(
        out,
        "  {:<28} {:>10}  ★ {:.1}  [{}]",
        truncate(&p.title, 28),
        p.price.to_string(),
        p.ratings_average,
        p.id
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
