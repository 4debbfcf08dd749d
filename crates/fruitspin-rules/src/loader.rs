use fruitspin_core::config::MachineConfig;
use fruitspin_core::symbol::{SymbolCatalog, SymbolDef};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse symbol catalog RON: {0}")]
    CatalogParseError(String),
    #[error("Failed to parse machine config RON: {0}")]
    ConfigParseError(String),
}

/// Parse a symbol catalog RON string (a list of symbol definitions).
pub fn load_catalog_from_str(ron_str: &str) -> Result<SymbolCatalog, LoadError> {
    let options = ron::Options::default();
    let symbols: Vec<SymbolDef> = options
        .from_str(ron_str)
        .map_err(|e| LoadError::CatalogParseError(e.to_string()))?;
    log::debug!("Parsed {} symbols", symbols.len());
    Ok(SymbolCatalog { symbols })
}

/// Parse a machine configuration RON string.
pub fn load_config_from_str(ron_str: &str) -> Result<MachineConfig, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::ConfigParseError(e.to_string()))
}
