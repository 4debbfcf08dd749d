//! Game data shipped with the binary.

use fruitspin_core::config::MachineConfig;
use fruitspin_core::symbol::SymbolCatalog;

use crate::loader::{load_catalog_from_str, load_config_from_str, LoadError};

pub const SYMBOLS_RON: &str = include_str!("../../../data/symbols.ron");
pub const MACHINE_RON: &str = include_str!("../../../data/machine.ron");

/// The eight-fruit catalog.
pub fn default_catalog() -> Result<SymbolCatalog, LoadError> {
    load_catalog_from_str(SYMBOLS_RON)
}

/// The shipped machine tuning.
pub fn default_config() -> Result<MachineConfig, LoadError> {
    load_config_from_str(MACHINE_RON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::validate_all;

    #[test]
    fn test_shipped_config_matches_constants() {
        let config = default_config().expect("machine.ron should parse");
        assert_eq!(config, MachineConfig::default());
    }

    #[test]
    fn test_shipped_data_is_valid() {
        let catalog = default_catalog().expect("symbols.ron should parse");
        let config = default_config().expect("machine.ron should parse");
        assert!(validate_all(&catalog, &config).is_ok());
    }

    #[test]
    fn test_cherries_most_frequent() {
        let catalog = default_catalog().expect("symbols.ron should parse");
        let heaviest = catalog
            .symbols
            .iter()
            .max_by_key(|s| s.weight)
            .map(|s| s.name.as_str());
        assert_eq!(heaviest, Some("cherries"));
        assert_eq!(catalog.total_weight(), 23);
    }
}
