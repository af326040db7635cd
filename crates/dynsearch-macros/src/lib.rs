//! Proc macros for dynsearch.
//!
//! # Derive Macros
//!
//! - [`Searchable`] - Generate a field schema, key constants and by-name
//!   field access from struct field annotations
//!
//! The generated code refers to the `dynsearch` crate by absolute path, so
//! use the derive through its re-export `dynsearch::Searchable`.

mod searchable;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `Searchable` and `Record` for a struct with named fields.
///
/// Every named field becomes a searchable key unless marked `skip`. Field
/// types must implement `dynsearch::AsFieldValue` (strings, numbers,
/// booleans and `Option`s of those do).
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `skip` | Exclude this field from searching |
/// | `rename = "..."` | Use a custom search key |
/// | `not_null` | Value must not be null |
/// | `not_blank` | Value must be a non-blank string |
/// | `pattern = "..."` | Value must fully match the regex (checked at compile time) |
/// | `min = N` / `max = N` | Numeric bounds, inclusive |
/// | `min_len = N` / `max_len = N` | String length bounds, inclusive |
/// | `one_of = ["a", "b"]` | Value must be one of the listed strings |
///
/// # Generated Code
///
/// 1. Key constants (e.g., `User::NAME`, `User::CREATED_AT`)
/// 2. `Searchable::search_schema()` returning a lazily built static schema
/// 3. `Record::field_value()` for in-memory evaluation
///
/// # Example
///
/// ```ignore
/// use dynsearch::{FieldSchema, Searchable};
///
/// #[derive(Searchable)]
/// struct User {
///     #[search(not_blank, max_len = 64)]
///     name: String,
///
///     #[search(min = 0, max = 150)]
///     age: u32,
///
///     #[search(rename = "mail", pattern = "[^@]+@[^@]+")]
///     email: String,
///
///     #[search(skip)]
///     password_hash: String,
/// }
///
/// assert_eq!(User::MAIL, "mail");
/// assert!(User::search_schema().has_field("age"));
/// assert!(!User::search_schema().has_field("password_hash"));
/// ```
#[proc_macro_derive(Searchable, attributes(search))]
pub fn searchable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    searchable::searchable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
