pub mod catalog;
pub mod conventions;

pub use conventions::{classify, normalize_symbol, pip_size};
