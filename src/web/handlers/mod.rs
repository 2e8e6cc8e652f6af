//! # Gateway Handlers

pub mod executor;
