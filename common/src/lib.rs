//! Shared domain model for the relief-logistics backend.
//!
//! Everything in here is plain data: serde-serializable structs and enums that
//! travel between the engine, its stores and the JSON API. Behaviour that needs
//! storage or a clock lives in the `backend` crate.

pub mod model;
pub mod requests;
