//! Core types for turnero.
//!
//! This crate holds everything below the terminal front-end:
//! - `record` for appointment (turno) and consultation (consulta) payloads
//! - `store` for the swappable persistence backends
//! - `filter` for the appointment list view
//! - `form` for field validation before anything reaches a store
//! - `list` for the in-memory application state and the two-step delete

pub mod config;
pub mod date;
pub mod error;
pub mod filter;
pub mod form;
pub mod list;
pub mod record;
pub mod store;
