//! Domain types and storage for index selections.

pub mod errors;
pub mod model;
pub mod runs;
