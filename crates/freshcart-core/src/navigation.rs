//! # Navigation
//!
//! The static screen graph and a small stack navigator over it.
//!
//! ## Screen Graph
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Root stack                                                             │
//! │  ├── Splash ──► Home (token held) | Register (no token)                 │
//! │  ├── Register, Login, ForgetPassword                                    │
//! │  ├── Tabs ────────────────────────────────────────────┐                 │
//! │  │     ├── Drawer                                     │                 │
//! │  │     │     ├── Home, Products, Brands               │                 │
//! │  │     │     └── Wishlist, Addresses, Orders          │                 │
//! │  │     └── Cart  (badge = item count when > 0)        │                 │
//! │  │  ◄──────────────────────────────────────────────────┘                 │
//! │  ├── ProductDetails { product_id }                                      │
//! │  ├── Checkout ──► OnlinePay { url } | CashPay { message }               │
//! │  └── Products { initial_search }  (search box on Home)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no state machine beyond "which screen is active". Moving
//! between two screens hosted by the tabs swaps the top of the stack;
//! everything else pushes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Screens
// =============================================================================

/// Every screen of the storefront, with its route parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Splash,
    Register,
    Login,
    ForgetPassword,
    Home,
    Products { initial_search: Option<String> },
    ProductDetails { product_id: String },
    Cart,
    Checkout,
    OnlinePay { url: String },
    CashPay { message: String },
    Brands,
    Wishlist,
    Addresses,
    Orders,
}

/// The navigators that host screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Container {
    RootStack,
    Tabs,
    Drawer,
}

impl Screen {
    /// Title shown in the screen header.
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Splash => "FreshCart",
            Screen::Register => "Register",
            Screen::Login => "Login",
            Screen::ForgetPassword => "Forgot Password",
            Screen::Home => "SHOP.CO",
            Screen::Products { .. } => "Products",
            Screen::ProductDetails { .. } => "Product Details",
            Screen::Cart => "Cart",
            Screen::Checkout => "Checkout",
            Screen::OnlinePay { .. } => "Online Payment",
            Screen::CashPay { .. } => "Cash on Delivery",
            Screen::Brands => "Brands",
            Screen::Wishlist => "Wishlist",
            Screen::Addresses => "Addresses",
            Screen::Orders => "Orders",
        }
    }

    /// Whether the screen lives inside the tab navigator (directly or via
    /// the drawer).
    pub fn is_tab_hosted(&self) -> bool {
        containers_of(self)
            .iter()
            .any(|c| matches!(c, Container::Tabs | Container::Drawer))
    }

    /// Whether reaching this screen requires a signed-in user.
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Screen::Splash | Screen::Register | Screen::Login | Screen::ForgetPassword
        )
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// The containers that host `screen`. `Products` is reachable both from
/// the drawer and as a root stack screen carrying a search.
pub fn containers_of(screen: &Screen) -> &'static [Container] {
    match screen {
        Screen::Home
        | Screen::Brands
        | Screen::Wishlist
        | Screen::Addresses
        | Screen::Orders => &[Container::Drawer],
        Screen::Products { .. } => &[Container::Drawer, Container::RootStack],
        Screen::Cart => &[Container::Tabs],
        _ => &[Container::RootStack],
    }
}

/// Where the splash screen goes once it finishes.
pub fn splash_target(has_token: bool) -> Screen {
    if has_token {
        Screen::Home
    } else {
        Screen::Register
    }
}

// =============================================================================
// Navigator
// =============================================================================

/// Stack of active screens; the last entry is on top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigator {
    stack: Vec<Screen>,
}

impl Navigator {
    /// A navigator showing the splash screen.
    pub fn new() -> Self {
        Navigator {
            stack: vec![Screen::Splash],
        }
    }

    /// A navigator whose only screen is `screen`.
    pub fn starting_at(screen: Screen) -> Self {
        Navigator {
            stack: vec![screen],
        }
    }

    pub fn current(&self) -> &Screen {
        // The stack is never empty: every mutation keeps the root.
        &self.stack[self.stack.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn history(&self) -> &[Screen] {
        &self.stack
    }

    /// Shows `screen`. Switching between tab-hosted screens swaps the top
    /// instead of pushing.
    pub fn navigate(&mut self, screen: Screen) {
        if self.current() == &screen {
            return;
        }
        if self.current().is_tab_hosted() && screen.is_tab_hosted() {
            self.replace(screen);
        } else {
            self.stack.push(screen);
        }
    }

    /// Replaces the top screen.
    pub fn replace(&mut self, screen: Screen) {
        if let Some(top) = self.stack.last_mut() {
            *top = screen;
        }
    }

    /// Pops the top screen and returns the one now shown.
    pub fn back(&mut self) -> CoreResult<&Screen> {
        if self.stack.len() <= 1 {
            return Err(CoreError::AtRootScreen(self.current().title().to_string()));
        }
        self.stack.pop();
        Ok(self.current())
    }

    /// Leaves the splash screen for its target.
    pub fn finish_splash(&mut self, has_token: bool) -> &Screen {
        self.replace(splash_target(has_token));
        self.current()
    }

    /// Drops all history and shows `screen`.
    pub fn reset(&mut self, screen: Screen) {
        self.stack.clear();
        self.stack.push(screen);
    }

    /// Sign-out: history is discarded and Login replaces everything.
    pub fn sign_out(&mut self) {
        self.reset(Screen::Login);
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splash_target() {
        assert_eq!(splash_target(true), Screen::Home);
        assert_eq!(splash_target(false), Screen::Register);

        let mut nav = Navigator::new();
        assert_eq!(nav.finish_splash(false), &Screen::Register);
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn test_containers() {
        assert_eq!(containers_of(&Screen::Cart), &[Container::Tabs]);
        assert_eq!(containers_of(&Screen::Orders), &[Container::Drawer]);
        assert_eq!(containers_of(&Screen::Checkout), &[Container::RootStack]);
        assert_eq!(
            containers_of(&Screen::Products {
                initial_search: None
            })
            .len(),
            2
        );
        assert!(Screen::Wishlist.is_tab_hosted());
        assert!(!Screen::Login.is_tab_hosted());
    }

    #[test]
    fn test_tab_switch_replaces_top() {
        let mut nav = Navigator::starting_at(Screen::Home);
        nav.navigate(Screen::Cart);
        nav.navigate(Screen::Brands);
        assert_eq!(nav.depth(), 1);
        assert_eq!(nav.current(), &Screen::Brands);
    }

    #[test]
    fn test_stack_push_and_back() {
        let mut nav = Navigator::starting_at(Screen::Home);
        nav.navigate(Screen::ProductDetails {
            product_id: "p1".to_string(),
        });
        nav.navigate(Screen::Checkout);
        assert_eq!(nav.depth(), 3);

        assert_eq!(
            nav.back().unwrap(),
            &Screen::ProductDetails {
                product_id: "p1".to_string()
            }
        );
        assert_eq!(nav.back().unwrap(), &Screen::Home);
        assert!(matches!(nav.back(), Err(CoreError::AtRootScreen(_))));
    }

    #[test]
    fn test_navigate_to_current_is_noop() {
        let mut nav = Navigator::starting_at(Screen::Checkout);
        nav.navigate(Screen::Checkout);
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn test_sign_out_replaces_with_login() {
        let mut nav = Navigator::starting_at(Screen::Home);
        nav.navigate(Screen::Checkout);
        nav.sign_out();
        assert_eq!(nav.history(), &[Screen::Login]);
    }

    #[test]
    fn test_requires_auth() {
        assert!(!Screen::Login.requires_auth());
        assert!(Screen::Cart.requires_auth());
    }
}
