//! HTTP protocol layer module
//!
//! Form body decoding and response building, decoupled from the greeting
//! business logic.

pub mod form;
pub mod response;
