//! Command line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use freshcart_core::PaymentMethod;

/// FreshCart storefront in the terminal.
#[derive(Debug, Parser)]
#[command(name = "freshcart", version, about)]
pub struct Cli {
    /// Config file (defaults to the platform config directory).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Session file, overriding config and FRESHCART_STATE_PATH.
    #[arg(long, global = true, value_name = "PATH")]
    pub state: Option<PathBuf>,

    /// Print views and errors as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Who is signed in and what is in the cart badge.
    Status,

    /// Sign in.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account.
    Register(RegisterArgs),

    /// Reset a forgotten password.
    #[command(subcommand)]
    Password(PasswordCommand),

    /// Sign out and forget the cart.
    Logout,

    /// List products.
    Products {
        #[arg(long, short)]
        search: Option<String>,
    },

    /// Show one product.
    Product { id: String },

    /// List brands.
    Brands {
        #[arg(long, short)]
        search: Option<String>,
    },

    /// List categories.
    Categories {
        #[arg(long, short)]
        search: Option<String>,
    },

    /// Show or change the cart.
    Cart {
        #[command(subcommand)]
        action: Option<CartCommand>,
    },

    /// Create a checkout session for the cart.
    Checkout(CheckoutArgs),

    /// Print the screen graph.
    Screens,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub re_password: String,
    #[arg(long)]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum PasswordCommand {
    /// Mail a reset code.
    Request {
        #[arg(long)]
        email: String,
    },
    /// Check the mailed code.
    Verify {
        #[arg(long)]
        code: String,
    },
    /// Set the new password.
    Reset {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CartCommand {
    /// Fetch and show the cart (default).
    Show,
    /// Add one unit of a product.
    Add { product_id: String },
    /// Set the quantity of a line; 0 removes it.
    Set { product_id: String, count: u32 },
    /// Remove a line.
    Remove { product_id: String },
    /// One less; removes the line at quantity 1.
    Minus { product_id: String },
    /// One more.
    Plus { product_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct CheckoutArgs {
    /// Street and building.
    #[arg(long, default_value = "")]
    pub details: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub city: String,
    #[arg(long, value_enum, default_value_t = PaymentArg::Online)]
    pub payment: PaymentArg,
    /// Cart to check out; defaults to the current cart.
    #[arg(long)]
    pub cart_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PaymentArg {
    Online,
    Cash,
}

impl From<PaymentArg> for PaymentMethod {
    fn from(arg: PaymentArg) -> Self {
        match arg {
            PaymentArg::Online => PaymentMethod::Online,
            PaymentArg::Cash => PaymentMethod::Cash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_defaults_to_show() {
        let cli = Cli::try_parse_from(["freshcart", "cart"]).unwrap();
        assert_eq!(cli.command, Command::Cart { action: None });

        let cli = Cli::try_parse_from(["freshcart", "--json", "cart", "set", "p1", "0"]).unwrap();
        assert!(cli.json);
        assert_eq!(
            cli.command,
            Command::Cart {
                action: Some(CartCommand::Set {
                    product_id: "p1".into(),
                    count: 0
                })
            }
        );
    }

    #[test]
    fn test_checkout_args() {
        let cli = Cli::try_parse_from([
            "freshcart", "checkout", "--details", "12 Nile St", "--phone", "0101", "--city",
            "Cairo", "--payment", "cash",
        ])
        .unwrap();
        match cli.command {
            Command::Checkout(args) => {
                assert_eq!(PaymentMethod::from(args.payment), PaymentMethod::Cash);
                assert_eq!(args.cart_id, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_register_flag_names() {
        let cli = Cli::try_parse_from([
            "freshcart", "register", "--name", "Mona", "--email", "m@x.io", "--password", "secret1",
            "--re-password", "secret1", "--phone", "01012345678",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Register(_)));
    }
}
