//! Graph to artifact encoding.
//!
//! [`SchemaEncoder`] turns a validated [`TypeGraph`] plus its root fields
//! into a [`SchemaArtifact`], substituting obfuscated symbols for type names
//! when enabled, and decodes an artifact back into an identical graph.
//! Encoding is all-or-nothing: the first type that fails aborts the whole
//! encode and nothing is emitted.

use graphforge_model::{
    ArgumentDef, FieldDef, TypeDef, TypeGraph, TypeReference, is_built_in_scalar,
};
use tracing::debug;

use crate::artifact::{
    EncodedArgument, EncodedField, EncodedResolver, EncodedType, FORMAT_VERSION, SchemaArtifact,
};
use crate::error::StorageError;
use crate::symbols::SymbolTable;

/// Encodes compiled graphs into persistable artifacts and back.
#[derive(Debug, Clone)]
pub struct SchemaEncoder {
    schema_key: String,
    obfuscate: bool,
}

impl SchemaEncoder {
    pub fn new(schema_key: impl Into<String>, obfuscate: bool) -> Self {
        Self {
            schema_key: schema_key.into(),
            obfuscate,
        }
    }

    /// Encodes a graph and its root query/mutation fields.
    ///
    /// # Errors
    ///
    /// [`StorageError::Encoding`] naming the first offending type or field;
    /// in that case no artifact is produced.
    pub fn encode(
        &self,
        graph: &TypeGraph,
        queries: &[FieldDef],
        mutations: &[FieldDef],
    ) -> Result<SchemaArtifact, StorageError> {
        let symbols = if self.obfuscate {
            SymbolTable::obfuscated(graph.type_names())
        } else {
            SymbolTable::identity()
        };

        let mut types = Vec::with_capacity(graph.len());
        for type_def in graph.types() {
            types.push(encode_type(graph, &symbols, type_def)?);
        }

        let queries = encode_root_fields(graph, &symbols, "Query", queries)?;
        let mutations = encode_root_fields(graph, &symbols, "Mutation", mutations)?;

        debug!(
            schema_key = %self.schema_key,
            type_count = types.len(),
            obfuscated = self.obfuscate,
            "Encoded schema artifact"
        );

        Ok(SchemaArtifact {
            format_version: FORMAT_VERSION,
            schema_key: self.schema_key.clone(),
            symbols,
            types,
            queries,
            mutations,
        })
    }

    /// Decodes an artifact back into a graph and root fields, resolving
    /// obfuscated symbols through the embedded table.
    ///
    /// # Errors
    ///
    /// [`StorageError::CorruptArtifact`] if the artifact does not decode to
    /// a well-formed graph.
    pub fn decode(
        artifact: &SchemaArtifact,
    ) -> Result<(TypeGraph, Vec<FieldDef>, Vec<FieldDef>), StorageError> {
        let symbols = &artifact.symbols;
        let mut graph = TypeGraph::new();
        for encoded in &artifact.types {
            let type_def = decode_type(symbols, encoded)?;
            graph
                .add_type(type_def)
                .map_err(|e| StorageError::corrupt(e.to_string()))?;
        }

        let queries = decode_fields(symbols, &artifact.queries)?;
        let mutations = decode_fields(symbols, &artifact.mutations)?;

        debug!(
            schema_key = %artifact.schema_key,
            type_count = graph.len(),
            "Decoded schema artifact"
        );
        Ok((graph, queries, mutations))
    }
}

fn encode_reference(
    graph: &TypeGraph,
    symbols: &SymbolTable,
    owner: &str,
    field: &str,
    reference: &TypeReference,
) -> Result<String, StorageError> {
    if !graph.resolves(reference) {
        return Err(StorageError::encoding(format!(
            "{owner}.{field} references unknown type {}",
            reference.base()
        )));
    }
    let base = reference.base();
    let substituted = if is_built_in_scalar(base) {
        reference.clone()
    } else {
        reference.retargeted(symbols.symbol_for(base))
    };
    Ok(substituted.to_expression())
}

fn encode_field(
    graph: &TypeGraph,
    symbols: &SymbolTable,
    owner: &str,
    field: &FieldDef,
) -> Result<EncodedField, StorageError> {
    let mut arguments = Vec::with_capacity(field.arguments.len());
    for argument in &field.arguments {
        arguments.push(EncodedArgument {
            name: argument.name.clone(),
            type_expr: encode_reference(graph, symbols, owner, &field.name, &argument.type_ref)?,
            default: argument.default.clone(),
        });
    }
    Ok(EncodedField {
        name: field.name.clone(),
        type_expr: encode_reference(graph, symbols, owner, &field.name, &field.type_ref)?,
        arguments,
        resolver: field.resolver.as_ref().map(EncodedResolver::from),
        description: field.description.clone(),
    })
}

fn encode_root_fields(
    graph: &TypeGraph,
    symbols: &SymbolTable,
    owner: &str,
    fields: &[FieldDef],
) -> Result<Vec<EncodedField>, StorageError> {
    fields
        .iter()
        .map(|f| encode_field(graph, symbols, owner, f))
        .collect()
}

fn encode_type(
    graph: &TypeGraph,
    symbols: &SymbolTable,
    type_def: &TypeDef,
) -> Result<EncodedType, StorageError> {
    let name = type_def.name();
    let fields = match type_def.fields() {
        Some(map) => map
            .values()
            .map(|f| encode_field(graph, symbols, name, f))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    let values = match type_def {
        TypeDef::Enum { values, .. } => values.clone(),
        _ => Vec::new(),
    };
    let members = match type_def {
        TypeDef::Union { members, .. } => members
            .iter()
            .map(|m| symbols.symbol_for(m).to_string())
            .collect(),
        _ => Vec::new(),
    };
    let interfaces = type_def
        .interfaces()
        .iter()
        .map(|i| symbols.symbol_for(i).to_string())
        .collect();

    Ok(EncodedType {
        symbol: symbols.symbol_for(name).to_string(),
        kind: type_def.kind(),
        description: type_def.description().map(str::to_string),
        fields,
        values,
        members,
        interfaces,
    })
}

fn decode_reference(symbols: &SymbolTable, type_expr: &str) -> Result<TypeReference, StorageError> {
    let parsed = TypeReference::parse(type_expr)
        .map_err(|e| StorageError::corrupt(format!("bad type expression: {e}")))?;
    let base = parsed.base();
    if is_built_in_scalar(base) {
        Ok(parsed)
    } else {
        Ok(parsed.retargeted(symbols.logical_for(base)))
    }
}

fn decode_field(symbols: &SymbolTable, encoded: &EncodedField) -> Result<FieldDef, StorageError> {
    let mut field = FieldDef::new(&encoded.name, decode_reference(symbols, &encoded.type_expr)?);
    for argument in &encoded.arguments {
        let mut decoded = ArgumentDef::new(
            &argument.name,
            decode_reference(symbols, &argument.type_expr)?,
        );
        decoded.default = argument.default.clone();
        field.arguments.push(decoded);
    }
    field.resolver = encoded.resolver.as_ref().map(Into::into);
    field.description = encoded.description.clone();
    Ok(field)
}

fn decode_fields(
    symbols: &SymbolTable,
    encoded: &[EncodedField],
) -> Result<Vec<FieldDef>, StorageError> {
    encoded.iter().map(|f| decode_field(symbols, f)).collect()
}

fn decode_type(symbols: &SymbolTable, encoded: &EncodedType) -> Result<TypeDef, StorageError> {
    use graphforge_model::TypeKind;

    let name = symbols.logical_for(&encoded.symbol).to_string();
    let mut type_def = match encoded.kind {
        TypeKind::Object => {
            let mut obj = TypeDef::object(&name);
            for interface in &encoded.interfaces {
                obj.add_interface(symbols.logical_for(interface));
            }
            obj
        }
        TypeKind::Input => TypeDef::input(&name),
        TypeKind::Interface => TypeDef::interface(&name),
        TypeKind::Scalar => TypeDef::scalar(&name),
        TypeKind::Enum => TypeDef::Enum {
            name: name.clone(),
            description: None,
            values: encoded.values.clone(),
        },
        TypeKind::Union => TypeDef::Union {
            name: name.clone(),
            description: None,
            members: encoded
                .members
                .iter()
                .map(|m| symbols.logical_for(m).to_string())
                .collect(),
        },
    };

    if let Some(description) = &encoded.description {
        type_def = type_def.with_description(description);
    }

    for field in &encoded.fields {
        type_def
            .push_field(decode_field(symbols, field)?)
            .map_err(|e| StorageError::corrupt(e.to_string()))?;
    }
    Ok(type_def)
}
