//! Core types shared across the vizir facilities
//!
//! This crate provides the foundational identifier types used by the
//! reconciliation pipeline and its error/logging facilities:
//!
//! - **Identity types**: SuiteId, StateName, BrowserId, SessionId
//! - **Schema constants**: Canonical field keys and event names

pub mod ids;
pub mod schema;

pub use ids::{BrowserId, SessionId, StateName, SuiteId};
