//! Route handlers

pub mod ping;
