//! Database access layer.
//!
//! This module provides access to the ClickHouse analytics store:
//! - HTTP gateway with value-typed outcomes
//! - Fixed schema/stats introspection queries
//! - Read-only statement validation

pub mod gateway;
pub mod sql_guard;

pub use gateway::Gateway;
