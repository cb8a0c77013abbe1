//! Reading the HTML fragments the dashboard backend renders.
//!
//! The backend owns the markup; the console only extracts what it needs:
//! named-field rows from the experiment table and readable text from the
//! detail and comparison fragments.

mod table;
mod text;

pub use self::table::{TableParseError, parse_experiment_table};
pub use self::text::fragment_lines;

fn selector(css: &'static str) -> Result<scraper::Selector, TableParseError> {
    scraper::Selector::parse(css).map_err(|err| TableParseError::Selector {
        css,
        message: err.to_string(),
    })
}
