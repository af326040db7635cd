//! Implementation of the `#[derive(Searchable)]` macro.
//!
//! Generates field name constants, a `Searchable` impl returning a lazily
//! built static `Schema`, and a `Record` impl reading fields by key.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Ident, Result};

use super::attrs::{parse_search_attrs, Bound, SearchAttr};

/// Main implementation of the Searchable derive macro.
pub fn searchable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Searchable cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Searchable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Searchable can only be derived for structs",
            ))
        }
    };

    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut schema_fields: Vec<TokenStream> = Vec::new();
    let mut field_matches: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_search_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let key = attrs
            .rename
            .clone()
            .unwrap_or_else(|| field_name.to_string());
        let const_name: Ident = syn::parse_str(&to_screaming_snake_case(&key)).map_err(|_| {
            Error::new(
                attrs.rename.as_ref().map_or(field_name.span(), |_| attrs.span),
                format!("search key \"{key}\" does not form a valid constant name"),
            )
        })?;

        field_constants.push(quote! {
            /// Search key of this field.
            pub const #const_name: &'static str = #key;
        });

        let constraints = constraint_tokens(&attrs);
        schema_fields.push(quote! {
            .field(#key, {
                let constraints: ::std::vec::Vec<::dynsearch::Constraint> = ::std::vec![#(#constraints),*];
                constraints
            })
        });

        field_matches.push(quote! {
            #key => ::dynsearch::AsFieldValue::as_field_value(&self.#field_name),
        });
    }

    let expanded = quote! {
        impl #struct_name {
            #(#field_constants)*
        }

        impl ::dynsearch::Searchable for #struct_name {
            fn search_schema() -> &'static ::dynsearch::Schema {
                static SCHEMA: ::dynsearch::__private::Lazy<::dynsearch::Schema> =
                    ::dynsearch::__private::Lazy::new(|| {
                        ::dynsearch::Schema::builder()
                            #(#schema_fields)*
                            .build()
                    });
                &SCHEMA
            }
        }

        impl ::dynsearch::Record for #struct_name {
            fn field_value(&self, field: &str) -> ::dynsearch::Value<'_> {
                match field {
                    #(#field_matches)*
                    _ => ::dynsearch::Value::None,
                }
            }
        }
    };

    Ok(expanded)
}

fn constraint_tokens(attrs: &SearchAttr) -> Vec<TokenStream> {
    let mut constraints = Vec::new();
    if !attrs.has_constraints() {
        return constraints;
    }
    if attrs.not_null {
        constraints.push(quote! { ::dynsearch::Constraint::NotNull });
    }
    if attrs.not_blank {
        constraints.push(quote! { ::dynsearch::Constraint::NotBlank });
    }
    if let Some(pattern) = &attrs.pattern {
        // Validated when the attribute was parsed.
        constraints.push(quote! {
            ::dynsearch::Constraint::pattern(#pattern).expect("pattern validated at compile time")
        });
    }
    if let Some(min) = attrs.min {
        let min = bound_tokens(min);
        constraints.push(quote! { ::dynsearch::Constraint::min(#min) });
    }
    if let Some(max) = attrs.max {
        let max = bound_tokens(max);
        constraints.push(quote! { ::dynsearch::Constraint::max(#max) });
    }
    if attrs.min_len.is_some() || attrs.max_len.is_some() {
        let min = attrs.min_len.unwrap_or(0);
        let max = match attrs.max_len {
            Some(max) => quote! { #max },
            None => quote! { ::std::primitive::usize::MAX },
        };
        constraints.push(quote! { ::dynsearch::Constraint::size(#min, #max) });
    }
    if !attrs.one_of.is_empty() {
        let values = &attrs.one_of;
        constraints.push(quote! { ::dynsearch::Constraint::one_of([#(#values),*]) });
    }
    constraints
}

fn bound_tokens(bound: Bound) -> TokenStream {
    match bound {
        Bound::Int(i) => quote! { #i },
        Bound::Float(f) => quote! { #f },
    }
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' || c == '.' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(tokens: &str) -> Result<String> {
        let input: DeriveInput = syn::parse_str(tokens)?;
        searchable_derive_impl(input).map(|ts| ts.to_string())
    }

    #[test]
    fn test_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("name"), "NAME");
        assert_eq!(to_screaming_snake_case("created_at"), "CREATED_AT");
        assert_eq!(to_screaming_snake_case("createdAt"), "CREATED_AT");
        assert_eq!(to_screaming_snake_case("address.city"), "ADDRESS_CITY");
    }

    #[test]
    fn test_skipped_fields_are_left_out() {
        let out = expand(
            r#"struct User { name: String, #[search(skip)] password: String }"#,
        )
        .unwrap();
        assert!(out.contains("NAME"));
        assert!(!out.contains("PASSWORD"));
        assert!(!out.contains("self . password"));
    }

    #[test]
    fn test_rename_sets_key_and_constant() {
        let out = expand(r#"struct User { #[search(rename = "userName")] name: String }"#).unwrap();
        assert!(out.contains("USER_NAME"));
        assert!(out.contains("\"userName\""));
    }

    #[test]
    fn test_constraints_are_emitted() {
        let out = expand(
            r#"struct User { #[search(not_blank, min_len = 2, pattern = "[a-z]+")] name: String }"#,
        )
        .unwrap();
        assert!(out.contains("NotBlank"));
        assert!(out.contains("size"));
        assert!(out.contains("pattern"));
    }

    #[test]
    fn test_unconstrained_field_has_empty_constraints() {
        let out = expand("struct User { name: String }").unwrap();
        assert!(out.contains("\"name\""));
        assert!(!out.contains("NotNull"));
        assert!(!out.contains("size"));
    }

    #[test]
    fn test_rejects_keys_that_are_not_identifiers() {
        for rename in ["first name", "1st", "a+b", ""] {
            let source = format!(r#"struct User {{ #[search(rename = "{rename}")] name: String }}"#);
            let err = expand(&source).unwrap_err();
            assert!(
                err.to_string().contains("valid constant name"),
                "rename {rename:?} gave {err}"
            );
        }
    }

    #[test]
    fn test_rejects_tuple_structs() {
        let err = expand("struct Pair(u32, u32);").unwrap_err();
        assert!(err.to_string().contains("named fields"));
    }

    #[test]
    fn test_rejects_enums() {
        assert!(expand("enum Kind { A, B }").is_err());
    }

    #[test]
    fn test_rejects_generics() {
        assert!(expand("struct Wrapper<T> { inner: T }").is_err());
    }
}
