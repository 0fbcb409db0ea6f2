//! # FreshCart Terminal
//!
//! ```text
//! freshcart login --email mona@example.com --password secret1
//! freshcart products --search shirt
//! freshcart cart add 6428ebc6dc1175abc65ca0b9
//! freshcart checkout --details "12 Nile St" --phone 01012345678 --city Cairo
//! ```
//!
//! Everything lives in the library half; see `freshcart_terminal::run`.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    freshcart_terminal::run().await
}
