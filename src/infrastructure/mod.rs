mod analyzer_sequential;
mod fetcher_rest;

pub use analyzer_sequential::*;
pub use fetcher_rest::*;
