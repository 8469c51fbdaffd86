//! Admin console domain: API trait and the data it returns.

pub mod api;
pub mod model;

pub use api::AdminApi;
pub use model::*;
