use serde::{Deserialize, Serialize};

/// Stable symbol identifier, as written in the catalog data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u16);

/// A single reel symbol loaded from RON data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDef {
    /// Stable ID referenced by reel sequences and round results.
    pub id: SymbolId,
    /// Human-readable name for logs and the results panel.
    pub name: String,
    /// Glyph drawn on the reel face.
    pub glyph: String,
    /// Relative selection frequency when populating a reel. Must be > 0.
    pub weight: u32,
    /// Points contributed to the round score when this symbol settles.
    #[serde(default)]
    pub points: u32,
    /// RGB tint (0.0–1.0 per channel) used by the matrix theme.
    #[serde(default = "default_color")]
    pub color: (f32, f32, f32),
}

fn default_color() -> (f32, f32, f32) {
    (0.0, 1.0, 0.0)
}

/// Immutable table of symbol definitions, built once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolCatalog {
    pub symbols: Vec<SymbolDef>,
}

impl SymbolCatalog {
    /// Look up a symbol by ID. Returns None if not found.
    pub fn get(&self, id: SymbolId) -> Option<&SymbolDef> {
        self.symbols.iter().find(|s| s.id == id)
    }

    /// Look up a symbol by name (case-sensitive).
    pub fn by_name(&self, name: &str) -> Option<&SymbolDef> {
        self.symbols.iter().find(|s| s.name == name)
    }

    /// Point value of a symbol; unknown IDs score nothing.
    pub fn points(&self, id: SymbolId) -> u32 {
        self.get(id).map(|s| s.points).unwrap_or(0)
    }

    /// Glyph for display, "?" for unknown IDs.
    pub fn glyph(&self, id: SymbolId) -> &str {
        self.get(id).map(|s| s.glyph.as_str()).unwrap_or("?")
    }

    /// Sum of catalog point values for a set of settled symbols.
    pub fn score(&self, symbols: &[SymbolId]) -> u32 {
        symbols.iter().map(|&id| self.points(id)).sum()
    }

    /// `(id, weight)` pairs in catalog order, the input to weighted sampling.
    pub fn weighted_pool(&self) -> Vec<(SymbolId, u32)> {
        self.symbols.iter().map(|s| (s.id, s.weight)).collect()
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u64 {
        self.symbols.iter().map(|s| s.weight as u64).sum()
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
