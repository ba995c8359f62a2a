//! Wire types shared between the production console crates.

pub mod domain;
pub mod error;
pub mod protocol;
