//! services/api/src/lib.rs
//!
//! The Smart City Assistant HTTP service: adapters for the generation endpoint,
//! PDF parsing and the feedback store, plus the axum web layer on top of the core.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
