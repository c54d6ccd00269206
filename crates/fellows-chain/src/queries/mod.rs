//! Chain query implementations.

pub mod account;
pub mod identity;
pub mod members;
