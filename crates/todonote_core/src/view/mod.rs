//! Read-only projections used by renderers.

pub mod board;
