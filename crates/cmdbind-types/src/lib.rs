//! Foundation types for cmdbind.
//!
//! This crate holds the pieces shared by the resolution engine and its
//! front-ends: the error taxonomy, the closed set of value kinds, handler
//! outcomes, the sender (invoking identity) trait, and engine configuration.

pub mod config;
pub mod error;
pub mod kind;
pub mod outcome;
pub mod sender;
