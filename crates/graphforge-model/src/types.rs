//! Type, field and argument definitions.
//!
//! [`TypeDef`] is the variant type for every named entity in the graph.
//! Object, Input and Interface types hold an ordered map of [`FieldDef`];
//! Enum types hold named values; Union types hold member names. Field order
//! is insertion order and is preserved through encoding.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::resolver_ref::ResolverReference;
use crate::type_ref::TypeReference;

/// Discriminant for [`TypeDef`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Object,
    Input,
    Enum,
    Union,
    Interface,
    Scalar,
}

impl TypeKind {
    /// Lowercase label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Input => "input",
            Self::Enum => "enum",
            Self::Union => "union",
            Self::Interface => "interface",
            Self::Scalar => "scalar",
        }
    }
}

/// A named enum value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValueDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EnumValueDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// An argument on a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDef {
    pub name: String,
    pub type_ref: TypeReference,
    /// Default value applied when the argument is omitted. Required
    /// arguments without a default are enforced downstream at query time,
    /// not by the compiler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl ArgumentDef {
    pub fn new(name: impl Into<String>, type_ref: TypeReference) -> Self {
        Self {
            name: name.into(),
            type_ref,
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// A field on an Object, Input or Interface type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub type_ref: TypeReference,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver: Option<ResolverReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, type_ref: TypeReference) -> Self {
        Self {
            name: name.into(),
            type_ref,
            arguments: Vec::new(),
            resolver: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_argument(mut self, argument: ArgumentDef) -> Self {
        self.arguments.push(argument);
        self
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: ResolverReference) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Returns the argument with the given name, if present.
    pub fn argument(&self, name: &str) -> Option<&ArgumentDef> {
        self.arguments.iter().find(|a| a.name == name)
    }

    /// Adds an argument, replacing any existing argument of the same name.
    /// Replacement keeps plugin application idempotent.
    pub fn set_argument(&mut self, argument: ArgumentDef) {
        if let Some(existing) = self.arguments.iter_mut().find(|a| a.name == argument.name) {
            *existing = argument;
        } else {
            self.arguments.push(argument);
        }
    }
}

/// A named graph entity.
///
/// The variant decides which attributes apply: Object/Input/Interface carry
/// fields, Enum carries values, Union carries member names, Object
/// additionally carries the interfaces it implements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeDef {
    Object {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        fields: IndexMap<String, FieldDef>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        interfaces: Vec<String>,
    },
    Input {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        fields: IndexMap<String, FieldDef>,
    },
    Enum {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        values: Vec<EnumValueDef>,
    },
    Union {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        members: Vec<String>,
    },
    Interface {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        fields: IndexMap<String, FieldDef>,
    },
    Scalar {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl TypeDef {
    /// Creates an empty Object type.
    pub fn object(name: impl Into<String>) -> Self {
        Self::Object {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
            interfaces: Vec::new(),
        }
    }

    /// Creates an empty Input type.
    pub fn input(name: impl Into<String>) -> Self {
        Self::Input {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
        }
    }

    /// Creates an Enum type with the given value names.
    pub fn enumeration(
        name: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::Enum {
            name: name.into(),
            description: None,
            values: values.into_iter().map(|v| EnumValueDef::new(v)).collect(),
        }
    }

    /// Creates a Union type over the given member type names.
    pub fn union(
        name: impl Into<String>,
        members: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::Union {
            name: name.into(),
            description: None,
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an empty Interface type.
    pub fn interface(name: impl Into<String>) -> Self {
        Self::Interface {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
        }
    }

    /// Creates a Scalar type.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::Scalar {
            name: name.into(),
            description: None,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Object { .. } => TypeKind::Object,
            Self::Input { .. } => TypeKind::Input,
            Self::Enum { .. } => TypeKind::Enum,
            Self::Union { .. } => TypeKind::Union,
            Self::Interface { .. } => TypeKind::Interface,
            Self::Scalar { .. } => TypeKind::Scalar,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Object { name, .. }
            | Self::Input { name, .. }
            | Self::Enum { name, .. }
            | Self::Union { name, .. }
            | Self::Interface { name, .. }
            | Self::Scalar { name, .. } => name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Object { description, .. }
            | Self::Input { description, .. }
            | Self::Enum { description, .. }
            | Self::Union { description, .. }
            | Self::Interface { description, .. }
            | Self::Scalar { description, .. } => description.as_deref(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            Self::Object { description, .. }
            | Self::Input { description, .. }
            | Self::Enum { description, .. }
            | Self::Union { description, .. }
            | Self::Interface { description, .. }
            | Self::Scalar { description, .. } => *description = Some(text.into()),
        }
        self
    }

    /// Fields of a field-bearing type, `None` for Enum/Union/Scalar.
    pub fn fields(&self) -> Option<&IndexMap<String, FieldDef>> {
        match self {
            Self::Object { fields, .. }
            | Self::Input { fields, .. }
            | Self::Interface { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Mutable fields of a field-bearing type.
    pub fn fields_mut(&mut self) -> Option<&mut IndexMap<String, FieldDef>> {
        match self {
            Self::Object { fields, .. }
            | Self::Input { fields, .. }
            | Self::Interface { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Returns a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields().and_then(|f| f.get(name))
    }

    /// Returns a mutable field by name.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldDef> {
        self.fields_mut().and_then(|f| f.get_mut(name))
    }

    /// Values of an Enum type, `None` for other kinds.
    pub fn enum_values(&self) -> Option<&[EnumValueDef]> {
        match self {
            Self::Enum { values, .. } => Some(values),
            _ => None,
        }
    }

    /// Members of a Union type, `None` for other kinds.
    pub fn union_members(&self) -> Option<&[String]> {
        match self {
            Self::Union { members, .. } => Some(members),
            _ => None,
        }
    }

    /// Interfaces implemented by an Object type, empty otherwise.
    pub fn interfaces(&self) -> &[String] {
        match self {
            Self::Object { interfaces, .. } => interfaces,
            _ => &[],
        }
    }

    /// Declares an interface on an Object type. No-op for other kinds.
    pub fn add_interface(&mut self, interface: impl Into<String>) {
        if let Self::Object { interfaces, .. } = self {
            let interface = interface.into();
            if !interfaces.contains(&interface) {
                interfaces.push(interface);
            }
        }
    }

    /// Appends a field.
    ///
    /// # Errors
    ///
    /// [`ModelError::DuplicateField`] if a field of the same name exists,
    /// [`ModelError::FieldsNotSupported`] for Enum/Union/Scalar types.
    pub fn push_field(&mut self, field: FieldDef) -> Result<(), ModelError> {
        let type_name = self.name().to_string();
        let kind = self.kind();
        let Some(fields) = self.fields_mut() else {
            return Err(ModelError::FieldsNotSupported {
                type_name,
                kind: kind.label(),
            });
        };
        if fields.contains_key(&field.name) {
            return Err(ModelError::duplicate_field(type_name, &field.name));
        }
        fields.insert(field.name.clone(), field);
        Ok(())
    }

    /// Inserts or replaces a field. Replacement keeps plugin application
    /// idempotent.
    pub fn set_field(&mut self, field: FieldDef) -> Result<(), ModelError> {
        let type_name = self.name().to_string();
        let kind = self.kind();
        let Some(fields) = self.fields_mut() else {
            return Err(ModelError::FieldsNotSupported {
                type_name,
                kind: kind.label(),
            });
        };
        fields.insert(field.name.clone(), field);
        Ok(())
    }
}

/// Checks that a name matches `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
