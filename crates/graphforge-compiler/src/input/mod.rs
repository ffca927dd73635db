//! Nested input types and the filter-path protocol.
//!
//! [`NestedInputBuilder`] derives a parallel graph of Input types from an
//! output type graph so structured filter arguments can mirror arbitrarily
//! deep (and cyclic) object relations. [`flatten_filter`] is its inverse:
//! it turns a nested filter argument value into the flat
//! `(dotted path, operator, value)` triples the runtime filter-application
//! logic consumes.

mod builder;
mod flatten;

pub use builder::{InputBuild, NestedInputBuilder};
pub use flatten::{FilterCondition, flatten_filter, resolve_paths};

/// Separator between a field name and its comparison operator in leaf
/// input fields (`price__gte`) and in flattened filter keys. Field names
/// must not contain this sequence.
pub const FILTER_SEPARATOR: &str = "__";

/// Comparison operators supported by leaf filter fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    Contains,
}

impl FilterOperator {
    /// The identifier used in field suffixes and flattened triples.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::In => "in",
            Self::Contains => "contains",
        }
    }

    /// Parses an operator identifier.
    pub fn parse(identifier: &str) -> Option<Self> {
        Some(match identifier {
            "eq" => Self::Eq,
            "ne" => Self::Ne,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "gt" => Self::Gt,
            "gte" => Self::Gte,
            "in" => Self::In,
            "contains" => Self::Contains,
            _ => return None,
        })
    }

    /// Operators applicable to a scalar type. Custom scalars and enums get
    /// the equality set.
    pub fn for_scalar(base: &str) -> &'static [Self] {
        match base {
            "Int" | "Float" => &[
                Self::Eq,
                Self::Ne,
                Self::In,
                Self::Lt,
                Self::Lte,
                Self::Gt,
                Self::Gte,
            ],
            "String" => &[Self::Eq, Self::Ne, Self::In, Self::Contains],
            "Boolean" => &[Self::Eq, Self::Ne],
            _ => &[Self::Eq, Self::Ne, Self::In],
        }
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_round_trip() {
        for op in [
            FilterOperator::Eq,
            FilterOperator::Ne,
            FilterOperator::Lt,
            FilterOperator::Lte,
            FilterOperator::Gt,
            FilterOperator::Gte,
            FilterOperator::In,
            FilterOperator::Contains,
        ] {
            assert_eq!(FilterOperator::parse(op.as_str()), Some(op));
        }
        assert_eq!(FilterOperator::parse("like"), None);
    }

    #[test]
    fn test_scalar_operator_sets() {
        assert!(FilterOperator::for_scalar("Int").contains(&FilterOperator::Gte));
        assert!(FilterOperator::for_scalar("String").contains(&FilterOperator::Contains));
        assert!(!FilterOperator::for_scalar("Boolean").contains(&FilterOperator::In));
        assert_eq!(FilterOperator::for_scalar("ID").len(), 3);
    }
}
