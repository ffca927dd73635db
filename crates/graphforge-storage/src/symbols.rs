//! Symbol obfuscation.
//!
//! Generated artifacts may replace logical type names with opaque symbols so
//! that the artifact does not leak domain vocabulary. The mapping is
//! deterministic (derived from the sorted name sequence) and collision-free
//! by construction; the table itself travels inside the artifact, so logical
//! names stay recoverable on load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Deterministic logical-name to generated-symbol mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolTable {
    forward: BTreeMap<String, String>,
    reverse: BTreeMap<String, String>,
    obfuscated: bool,
}

impl SymbolTable {
    /// Identity table: symbols are the logical names themselves.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Builds an obfuscating table over a name sequence.
    ///
    /// Names are sorted before numbering, so the same set of names always
    /// yields the same table regardless of input order.
    pub fn obfuscated<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sorted: Vec<String> = names.into_iter().map(Into::into).collect();
        sorted.sort();
        sorted.dedup();

        let mut forward = BTreeMap::new();
        let mut reverse = BTreeMap::new();
        for (index, name) in sorted.into_iter().enumerate() {
            let symbol = format!("GT{index:04x}");
            reverse.insert(symbol.clone(), name.clone());
            forward.insert(name, symbol);
        }
        Self {
            forward,
            reverse,
            obfuscated: true,
        }
    }

    /// Whether this table actually rewrites names.
    pub fn is_obfuscated(&self) -> bool {
        self.obfuscated
    }

    /// Maps a logical name to its symbol. Names outside the table (built-in
    /// scalars, external types) pass through unchanged.
    pub fn symbol_for<'a>(&'a self, logical: &'a str) -> &'a str {
        self.forward.get(logical).map_or(logical, String::as_str)
    }

    /// Maps a symbol back to its logical name. Unknown symbols pass through.
    pub fn logical_for<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.reverse.get(symbol).map_or(symbol, String::as_str)
    }

    /// Number of mapped names.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}
