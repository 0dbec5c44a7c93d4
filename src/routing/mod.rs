//! Routing module
//!
//! Explicit route registration: a table mapping (method, path) pairs to
//! handler targets, constructed once at startup.

mod table;

pub use table::{RouteTable, RouteTarget};
