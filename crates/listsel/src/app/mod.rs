//! Application layer orchestrating the selection model and its tooling.

pub mod replay;
pub mod script;
pub mod selection;
pub mod shared;
