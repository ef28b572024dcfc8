//! Rendered bulletin sections.
//!
//! A block is a list of display lines plus the structured values behind
//! them. The summary block is built from the values of the other two, never
//! by re-reading their text.

use serde::Serialize;

pub mod current;
pub mod overview;
pub mod summary;

pub use current::{CurrentValues, build_current_block};
pub use overview::{OverviewInput, OverviewValues, build_overview_block};
pub use summary::build_summary;

/// Display name of the upstream provider, printed in every block header.
pub const SOURCE_NAME: &str = "Open_MeteoAPI";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block<V> {
    pub lines: Vec<String>,
    pub values: V,
}

impl<V> Block<V> {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}
