mod error;
mod parser;
mod record;
mod text;
mod types;

pub use error::ElementError;
pub use parser::{parse_element_set, parse_records};
pub use text::parse_tle_text;
pub use types::OrbitalElementSet;
