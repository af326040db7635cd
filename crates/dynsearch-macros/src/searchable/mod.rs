//! Implementation of the `#[derive(Searchable)]` macro.
//!
//! Turns `#[search(...)]` field annotations into a static field schema,
//! key constants, and by-name field access.

mod attrs;
mod derive;

pub use derive::searchable_derive_impl;
