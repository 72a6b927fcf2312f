#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod text;
mod types;

pub use text::*;
pub use types::*;
