#![forbid(unsafe_code)]

//! Wire: everything that crosses the network boundary.
//!
//! Form-encoded request payloads for the filtering endpoint, the query
//! string codec that mirrors filter state into browser URLs, the JSON
//! response envelope, and the REST search types. All encoding is pure;
//! nothing in this crate performs I/O.

pub mod envelope;
pub mod payload;
pub mod query;
pub mod search;
