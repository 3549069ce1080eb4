//! Sum-of-products expressions and the bit patterns behind each term

pub mod codec;
pub mod pattern;

pub use codec::{covered_minterms, parse, parse_patterns, render, render_expression, render_term};
pub use pattern::{BitPattern, Literal, MAX_VARIABLES, MIN_VARIABLES};
