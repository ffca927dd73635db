//! The `interface_fields` plugin.
//!
//! Copies fields declared on a type's interfaces onto the type itself, so
//! implementors stay structurally complete without restating shared fields.

use graphforge_model::{TypeGraph, TypeKind};
use tracing::debug;

use super::SchemaPlugin;
use crate::context::BuildContext;
use crate::error::CompileError;

/// Plugin identifier: `interface_fields`.
pub struct InterfaceFieldsPlugin;

const IDENTIFIER: &str = "interface_fields";

impl SchemaPlugin for InterfaceFieldsPlugin {
    fn identifier(&self) -> &str {
        IDENTIFIER
    }

    fn apply(
        &self,
        type_name: &str,
        graph: &mut TypeGraph,
        _ctx: &BuildContext<'_>,
        _config: &serde_json::Value,
    ) -> Result<(), CompileError> {
        let Some(target) = graph.get(type_name) else {
            return Err(CompileError::invariant(
                IDENTIFIER,
                type_name,
                "type is not present in the graph",
            ));
        };
        if target.kind() != TypeKind::Object {
            return Err(CompileError::invariant(
                IDENTIFIER,
                type_name,
                format!("expected an Object type, found {}", target.kind().label()),
            ));
        }
        let interfaces = target.interfaces().to_vec();
        if interfaces.is_empty() {
            return Ok(());
        }

        // Collect inherited fields before taking a mutable borrow on the target.
        let mut inherited = Vec::new();
        for interface_name in &interfaces {
            let Some(interface) = graph.get(interface_name) else {
                return Err(CompileError::invariant(
                    IDENTIFIER,
                    type_name,
                    format!("declared interface {interface_name} does not exist"),
                ));
            };
            if interface.kind() != TypeKind::Interface {
                return Err(CompileError::invariant(
                    IDENTIFIER,
                    type_name,
                    format!(
                        "declared interface {interface_name} is {}, not an Interface",
                        interface.kind().label()
                    ),
                ));
            }
            if let Some(fields) = interface.fields() {
                inherited.extend(fields.values().cloned());
            }
        }

        let target = graph
            .get_mut(type_name)
            .ok_or_else(|| CompileError::invariant(IDENTIFIER, type_name, "type vanished"))?;
        let mut copied = 0usize;
        for field in inherited {
            if target.field(&field.name).is_some() {
                continue;
            }
            target.push_field(field)?;
            copied += 1;
        }

        debug!(type_name, copied, "Propagated interface fields");
        Ok(())
    }
}
