//! Tabular data for plotting and aggregation.
//!
//! A [`DataFrame`] is an ordered set of equally long columns. Numeric columns
//! feed continuous scales; categorical columns ([`Factor`]) carry an explicit
//! level order that grouping, legends and facets all respect.

mod frame;
mod ingest;

pub use frame::{Column, DataFrame, Factor};
