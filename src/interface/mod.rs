mod analyzer;
mod fetcher;

pub use analyzer::*;
pub use fetcher::*;
