//! Retrieves the repositories of a GitHub account and the weekly commit
//! participation of one of them, and aggregates both into a result a
//! presentation layer can render.

mod infrastructure;
mod interface;
mod model;

pub use infrastructure::*;
pub use interface::*;
pub use model::*;
