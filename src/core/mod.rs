//! Core modules for Gatehouse's alteration pass.
//!
//! The interceptor, the route-table data model, and shared primitives
//! live here.

pub mod context;
pub mod error;
pub mod interceptor;
pub mod recorder;
pub mod report;
pub mod route;
pub mod time;
