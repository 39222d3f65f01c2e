//! Domain layer for the quiz harvester
//!
//! This module contains the harvest models, the error taxonomy, and the port
//! traits that adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{ChatError, DispatchError, InputError, ParseError, StoreError};
