//! Attribute parsing for the Searchable derive macro.
//!
//! Parses the `#[search(...)]` field attributes: naming, skipping, and the
//! value constraints that end up in the generated schema.

use proc_macro2::Span;
use regex::Regex;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprArray, ExprLit, ExprUnary, Lit, LitStr, Meta, Result, Token, UnOp,
};

/// A numeric bound from `min = ...` or `max = ...`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Int(i64),
    Float(f64),
}

/// Field-level attributes from `#[search(...)]`.
#[derive(Debug, Clone)]
pub struct SearchAttr {
    /// Leave this field out of the schema.
    pub skip: bool,
    /// Key used in criteria (default: field name).
    pub rename: Option<String>,
    pub not_null: bool,
    pub not_blank: bool,
    /// Regular expression the whole value must match.
    pub pattern: Option<String>,
    pub min: Option<Bound>,
    pub max: Option<Bound>,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub one_of: Vec<String>,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for SearchAttr {
    fn default() -> Self {
        SearchAttr {
            skip: false,
            rename: None,
            not_null: false,
            not_blank: false,
            pattern: None,
            min: None,
            max: None,
            min_len: None,
            max_len: None,
            one_of: Vec::new(),
            span: Span::call_site(),
        }
    }
}

impl SearchAttr {
    /// Returns `true` if any value constraint is declared.
    pub fn has_constraints(&self) -> bool {
        self.not_null
            || self.not_blank
            || self.pattern.is_some()
            || self.min.is_some()
            || self.max.is_some()
            || self.min_len.is_some()
            || self.max_len.is_some()
            || !self.one_of.is_empty()
    }
}

impl Parse for SearchAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = SearchAttr {
            span: input.span(),
            ..SearchAttr::default()
        };

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if p.is_ident("not_null") {
                        attr.not_null = true;
                    } else if p.is_ident("not_blank") {
                        attr.not_blank = true;
                    } else {
                        return Err(Error::new(
                            p.span(),
                            "unknown search flag. Expected: skip, not_null, or not_blank",
                        ));
                    }
                }

                Meta::NameValue(nv) => {
                    let name = nv
                        .path
                        .get_ident()
                        .map(|ident| ident.to_string())
                        .unwrap_or_default();
                    match name.as_str() {
                        "rename" => attr.rename = Some(lit_str(&nv.value, "rename")?.value()),
                        "pattern" => {
                            let lit = lit_str(&nv.value, "pattern")?;
                            check_pattern(&lit)?;
                            attr.pattern = Some(lit.value());
                        }
                        "min" => attr.min = Some(bound(&nv.value)?),
                        "max" => attr.max = Some(bound(&nv.value)?),
                        "min_len" => attr.min_len = Some(length(&nv.value)?),
                        "max_len" => attr.max_len = Some(length(&nv.value)?),
                        "one_of" => attr.one_of = string_list(&nv.value)?,
                        _ => {
                            return Err(Error::new(
                                nv.path.span(),
                                "unknown attribute. Expected: rename, pattern, min, max, min_len, max_len, or one_of",
                            ));
                        }
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown search attribute. Expected: skip, not_null, not_blank, or key = value",
                    ));
                }
            }
        }

        if let (Some(min), Some(max)) = (attr.min_len, attr.max_len) {
            if min > max {
                return Err(Error::new(attr.span, "min_len must not exceed max_len"));
            }
        }

        Ok(attr)
    }
}

fn lit_str(expr: &Expr, key: &str) -> Result<LitStr> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.clone()),
        other => Err(Error::new(
            other.span(),
            format!("{key} must be a string literal"),
        )),
    }
}

// Compiled the same way the runtime anchors pattern constraints.
fn check_pattern(lit: &LitStr) -> Result<()> {
    Regex::new(&format!("^(?:{})$", lit.value()))
        .map(|_| ())
        .map_err(|e| Error::new(lit.span(), format!("invalid pattern: {e}")))
}

fn bound(expr: &Expr) -> Result<Bound> {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => match lit {
            Lit::Int(i) => Ok(Bound::Int(i.base10_parse()?)),
            Lit::Float(f) => Ok(Bound::Float(f.base10_parse()?)),
            other => Err(Error::new(other.span(), "bound must be a number")),
        },
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => match bound(expr)? {
            Bound::Int(i) => Ok(Bound::Int(-i)),
            Bound::Float(f) => Ok(Bound::Float(-f)),
        },
        other => Err(Error::new(other.span(), "bound must be a number")),
    }
}

fn length(expr: &Expr) -> Result<usize> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(i), ..
        }) => i.base10_parse(),
        other => Err(Error::new(
            other.span(),
            "length must be a non-negative integer",
        )),
    }
}

fn string_list(expr: &Expr) -> Result<Vec<String>> {
    match expr {
        Expr::Array(ExprArray { elems, .. }) => elems
            .iter()
            .map(|elem| lit_str(elem, "one_of entry").map(|s| s.value()))
            .collect(),
        other => Err(Error::new(
            other.span(),
            "one_of must be an array of string literals",
        )),
    }
}

/// Extract `#[search(...)]` attributes from a field's attributes.
pub fn parse_search_attrs(attrs: &[Attribute]) -> Result<SearchAttr> {
    for attr in attrs {
        if attr.path().is_ident("search") {
            return attr.parse_args::<SearchAttr>();
        }
    }
    Ok(SearchAttr::default())
}
