//! Declaration value tokenization for `light-dark()`.

mod scanner;
mod token;

pub use scanner::{LIGHT_DARK, ValueScan, scan_value, scan_value_detailed};
pub use token::{ThemeBranch, TokenStream, ValueToken};
