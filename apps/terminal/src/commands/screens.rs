//! Screen graph listing.

use crate::render::{screen_rows, View};

pub fn list() -> View {
    View::Screens {
        rows: screen_rows(),
    }
}
