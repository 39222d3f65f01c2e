//! Adapter implementations of the domain ports.

pub mod chat;
pub mod storage;
