//! The persistable artifact format.
//!
//! A [`SchemaArtifact`] is the frozen, serializable form of one compiled
//! schema: every type with its fields and arguments, the root query and
//! mutation fields, and the symbol table used to obfuscate type names.
//! Resolver closures are never baked into the artifact; a resolver appears
//! either as a direct export or as a factory invocation carrying the
//! serializable context needed to reconstruct it at load time.

use graphforge_model::{EnumValueDef, ResolverReference, TypeKind};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::symbols::SymbolTable;

/// Current artifact format version.
pub const FORMAT_VERSION: u32 = 1;

/// An encoded resolver reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EncodedResolver {
    /// A directly exported callable.
    Export { owner: String, method: String },
    /// A factory invocation; `context` is the recipe for reconstruction.
    Factory {
        owner: String,
        method: String,
        context: serde_json::Value,
    },
}

impl From<&ResolverReference> for EncodedResolver {
    fn from(reference: &ResolverReference) -> Self {
        match reference.context() {
            Some(context) => Self::Factory {
                owner: reference.owner().to_string(),
                method: reference.method().to_string(),
                context: context.clone(),
            },
            None => Self::Export {
                owner: reference.owner().to_string(),
                method: reference.method().to_string(),
            },
        }
    }
}

impl From<&EncodedResolver> for ResolverReference {
    fn from(encoded: &EncodedResolver) -> Self {
        match encoded {
            EncodedResolver::Export { owner, method } => ResolverReference::new(owner, method),
            EncodedResolver::Factory {
                owner,
                method,
                context,
            } => ResolverReference::factory(owner, method, context.clone()),
        }
    }
}

/// An encoded argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedArgument {
    pub name: String,
    /// Type expression with the base name already symbol-substituted.
    pub type_expr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

/// An encoded field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedField {
    pub name: String,
    /// Type expression with the base name already symbol-substituted.
    pub type_expr: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<EncodedArgument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver: Option<EncodedResolver>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An encoded type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedType {
    /// Generated symbol (or the logical name when obfuscation is off).
    pub symbol: String,
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EncodedField>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<EnumValueDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
}

/// The persisted form of one compiled schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaArtifact {
    pub format_version: u32,
    pub schema_key: String,
    pub symbols: SymbolTable,
    /// Types sorted by logical name, so encoding is reproducible.
    pub types: Vec<EncodedType>,
    pub queries: Vec<EncodedField>,
    pub mutations: Vec<EncodedField>,
}

impl SchemaArtifact {
    /// Serializes to canonical JSON. Serialization order is fixed by the
    /// struct layout and the sorted type sequence, so the same artifact
    /// always produces byte-identical output.
    pub fn to_canonical_json(&self) -> Result<Vec<u8>, StorageError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Deserializes from JSON, checking the format version before decoding
    /// the full payload.
    pub fn from_json(bytes: &[u8]) -> Result<Self, StorageError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| StorageError::corrupt(format!("not valid JSON: {e}")))?;
        let found = value
            .get("format_version")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| StorageError::corrupt("missing format_version"))?;
        if found != u64::from(FORMAT_VERSION) {
            return Err(StorageError::UnsupportedVersion {
                found: found as u32,
                supported: FORMAT_VERSION,
            });
        }
        serde_json::from_value(value)
            .map_err(|e| StorageError::corrupt(format!("malformed artifact: {e}")))
    }
}
