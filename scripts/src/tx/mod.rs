//! Chain client construction and transaction helpers

pub mod abi;
pub mod client;
pub mod sender;
