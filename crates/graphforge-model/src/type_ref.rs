//! Type reference expressions.
//!
//! A [`TypeReference`] is the parsed form of a type expression string such as
//! `Product`, `String!`, `[Tag!]` or `[Product!]!`. It captures the base type
//! name together with the list and required modifiers. References are
//! immutable value types; the graph stores them on fields and arguments and
//! resolves the base name during validation.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::types::is_valid_name;

/// Parsed representation of a type expression.
///
/// `required` applies to the outermost wrapper: for `[Foo]!` the list itself
/// is required while the elements stay optional. `element_required` is only
/// meaningful when `is_list` is set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeReference {
    base: String,
    is_list: bool,
    required: bool,
    element_required: bool,
}

impl TypeReference {
    /// A plain optional reference: `Name`.
    pub fn named(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            is_list: false,
            required: false,
            element_required: false,
        }
    }

    /// A required reference: `Name!`.
    pub fn required(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            is_list: false,
            required: true,
            element_required: false,
        }
    }

    /// An optional list of optional elements: `[Name]`.
    pub fn list(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            is_list: true,
            required: false,
            element_required: false,
        }
    }

    /// An optional list of required elements: `[Name!]`.
    pub fn list_of_required(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            is_list: true,
            required: false,
            element_required: true,
        }
    }

    /// Marks the outer wrapper as required, turning `Name` into `Name!`
    /// or `[Name]` into `[Name]!`.
    #[must_use]
    pub fn into_required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Parses a type expression string.
    ///
    /// Accepted forms: `Name`, `Name!`, `[Name]`, `[Name!]`, `[Name]!`,
    /// `[Name!]!`. Nested lists are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidTypeExpression`] for malformed input.
    pub fn parse(expression: &str) -> Result<Self, ModelError> {
        let src = expression.trim();
        if src.is_empty() {
            return Err(ModelError::invalid_expression(expression, "empty expression"));
        }

        let (inner, required) = match src.strip_suffix('!') {
            Some(rest) => (rest, true),
            None => (src, false),
        };

        if let Some(list_body) = inner.strip_prefix('[') {
            let Some(list_body) = list_body.strip_suffix(']') else {
                return Err(ModelError::invalid_expression(expression, "unbalanced brackets"));
            };
            let (element, element_required) = match list_body.strip_suffix('!') {
                Some(rest) => (rest, true),
                None => (list_body, false),
            };
            if element.starts_with('[') {
                return Err(ModelError::invalid_expression(
                    expression,
                    "nested lists are not supported",
                ));
            }
            if !is_valid_name(element) {
                return Err(ModelError::invalid_expression(expression, "invalid type name"));
            }
            Ok(Self {
                base: element.to_string(),
                is_list: true,
                required,
                element_required,
            })
        } else {
            if inner.contains(']') {
                return Err(ModelError::invalid_expression(expression, "unbalanced brackets"));
            }
            if !is_valid_name(inner) {
                return Err(ModelError::invalid_expression(expression, "invalid type name"));
            }
            Ok(Self {
                base: inner.to_string(),
                is_list: false,
                required,
                element_required: false,
            })
        }
    }

    /// The base type name the reference points at.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Whether this reference wraps the base type in a list.
    pub fn is_list(&self) -> bool {
        self.is_list
    }

    /// Whether the outer wrapper is required.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether list elements are required. Always false for non-lists.
    pub fn is_element_required(&self) -> bool {
        self.element_required
    }

    /// Renders the canonical expression string back.
    pub fn to_expression(&self) -> String {
        let mut out = String::new();
        if self.is_list {
            out.push('[');
            out.push_str(&self.base);
            if self.element_required {
                out.push('!');
            }
            out.push(']');
        } else {
            out.push_str(&self.base);
        }
        if self.required {
            out.push('!');
        }
        out
    }

    /// Returns a copy of this reference retargeted at another base type,
    /// keeping the list/required modifiers.
    #[must_use]
    pub fn retargeted(&self, base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ..self.clone()
        }
    }
}

impl std::fmt::Display for TypeReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_expression())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let r = TypeReference::parse("Product").unwrap();
        assert_eq!(r.base(), "Product");
        assert!(!r.is_list());
        assert!(!r.is_required());
    }

    #[test]
    fn test_parse_required() {
        let r = TypeReference::parse("String!").unwrap();
        assert_eq!(r.base(), "String");
        assert!(r.is_required());
        assert!(!r.is_list());
    }

    #[test]
    fn test_parse_list_variants() {
        let r = TypeReference::parse("[Tag]").unwrap();
        assert!(r.is_list() && !r.is_required() && !r.is_element_required());

        let r = TypeReference::parse("[Tag!]").unwrap();
        assert!(r.is_list() && !r.is_required() && r.is_element_required());

        let r = TypeReference::parse("[Tag]!").unwrap();
        assert!(r.is_list() && r.is_required() && !r.is_element_required());

        let r = TypeReference::parse("[Tag!]!").unwrap();
        assert!(r.is_list() && r.is_required() && r.is_element_required());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "  ", "[Foo", "Foo]", "[[Foo]]", "[Foo]]", "Foo!!", "1Foo", "Fo-o", "[Foo!!]"] {
            assert!(
                TypeReference::parse(bad).is_err(),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_expression_round_trip() {
        for expr in ["Product", "String!", "[Tag]", "[Tag!]", "[Tag]!", "[Tag!]!"] {
            let r = TypeReference::parse(expr).unwrap();
            assert_eq!(r.to_expression(), expr);
            assert_eq!(TypeReference::parse(&r.to_expression()).unwrap(), r);
        }
    }

    #[test]
    fn test_constructors_match_parse() {
        assert_eq!(
            TypeReference::list_of_required("Tag"),
            TypeReference::parse("[Tag!]").unwrap()
        );
        assert_eq!(
            TypeReference::required("ID"),
            TypeReference::parse("ID!").unwrap()
        );
        assert_eq!(
            TypeReference::list("Tag").into_required(),
            TypeReference::parse("[Tag]!").unwrap()
        );
    }

    #[test]
    fn test_retargeted_keeps_modifiers() {
        let r = TypeReference::parse("[Product!]!").unwrap();
        let t = r.retargeted("ProductFilterInput");
        assert_eq!(t.to_expression(), "[ProductFilterInput!]!");
    }
}
