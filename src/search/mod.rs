//! In-memory search over a fetched contact set.

pub mod filter;

pub use filter::filter;
