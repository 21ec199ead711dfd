#![forbid(unsafe_code)]

//! Core: filter state, category taxonomy, price slider math, and the
//! staged/applied store that the shop engine mutates.

pub mod category;
pub mod slider;
pub mod state;
pub mod store;
