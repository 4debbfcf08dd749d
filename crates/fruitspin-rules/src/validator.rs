use fruitspin_core::config::MachineConfig;
use fruitspin_core::symbol::{SymbolCatalog, SymbolId};
use std::collections::HashSet;
use thiserror::Error;

/// Precondition violations. Any of these is fatal at initialization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Symbol catalog is empty")]
    EmptyCatalog,
    #[error("Duplicate symbol ID {0}")]
    DuplicateSymbolId(u16),
    #[error("Symbol '{name}' has weight 0; weights must be positive")]
    NonPositiveWeight { name: String },
    #[error("Machine must have at least one reel")]
    NoReels,
    #[error("Reels must have at least one segment")]
    NoSegments,
    #[error("Base speed {0} must be positive and finite")]
    InvalidBaseSpeed(f32),
    #[error("Speed spread {0} must lie in [0, 1)")]
    InvalidSpeedSpread(f32),
    #[error("Bell curve needs at least one sample")]
    NoBellCurveSamples,
    #[error("Deceleration {0} must lie strictly between 0 and 1")]
    InvalidDeceleration(f32),
    #[error("Minimum speed {0} must be positive")]
    InvalidMinSpeed(f32),
    #[error("Snap duration {0}s must be positive")]
    InvalidSnapDuration(f32),
    #[error("Timing value '{field}' = {value} must be non-negative")]
    NegativeTiming { field: &'static str, value: f32 },
    #[error("Jackpot threshold must be positive")]
    ZeroJackpotThreshold,
}

/// Validate a symbol catalog: non-empty, unique IDs, positive weights.
pub fn validate_catalog(catalog: &SymbolCatalog) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if catalog.is_empty() {
        errors.push(ValidationError::EmptyCatalog);
    }

    let mut seen_ids: HashSet<SymbolId> = HashSet::new();
    for symbol in &catalog.symbols {
        if !seen_ids.insert(symbol.id) {
            errors.push(ValidationError::DuplicateSymbolId(symbol.id.0));
        }
        if symbol.weight == 0 {
            errors.push(ValidationError::NonPositiveWeight {
                name: symbol.name.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate machine tuning values.
pub fn validate_config(config: &MachineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.reel_count == 0 {
        errors.push(ValidationError::NoReels);
    }
    if config.segment_count == 0 {
        errors.push(ValidationError::NoSegments);
    }
    if !(config.base_speed.is_finite() && config.base_speed > 0.0) {
        errors.push(ValidationError::InvalidBaseSpeed(config.base_speed));
    }
    if !(0.0..1.0).contains(&config.speed_spread) {
        errors.push(ValidationError::InvalidSpeedSpread(config.speed_spread));
    }
    if config.bell_curve_samples == 0 {
        errors.push(ValidationError::NoBellCurveSamples);
    }
    if !(config.deceleration > 0.0 && config.deceleration < 1.0) {
        errors.push(ValidationError::InvalidDeceleration(config.deceleration));
    }
    if !(config.min_speed > 0.0) {
        errors.push(ValidationError::InvalidMinSpeed(config.min_speed));
    }
    if !(config.snap_duration > 0.0) {
        errors.push(ValidationError::InvalidSnapDuration(config.snap_duration));
    }
    for (field, value) in [
        ("stop_stagger", config.stop_stagger),
        ("spin_cooldown", config.spin_cooldown),
    ] {
        if !(value >= 0.0) {
            errors.push(ValidationError::NegativeTiming { field, value });
        }
    }
    if config.jackpot_threshold == 0 {
        errors.push(ValidationError::ZeroJackpotThreshold);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate catalog and config together, collecting every violation.
pub fn validate_all(
    catalog: &SymbolCatalog,
    config: &MachineConfig,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    if let Err(e) = validate_catalog(catalog) {
        errors.extend(e);
    }
    if let Err(e) = validate_config(config) {
        errors.extend(e);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fruitspin_core::symbol::SymbolDef;

    fn symbol(id: u16, weight: u32) -> SymbolDef {
        SymbolDef {
            id: SymbolId(id),
            name: format!("s{id}"),
            glyph: "*".into(),
            weight,
            points: 1,
            color: (1.0, 1.0, 1.0),
        }
    }

    #[test]
    fn test_valid_catalog_passes() {
        let catalog = SymbolCatalog {
            symbols: vec![symbol(0, 2), symbol(1, 5)],
        };
        assert!(validate_catalog(&catalog).is_ok());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let errors = validate_catalog(&SymbolCatalog::default()).expect_err("empty");
        assert_eq!(errors, vec![ValidationError::EmptyCatalog]);
    }

    #[test]
    fn test_duplicate_id_and_zero_weight_reported() {
        let catalog = SymbolCatalog {
            symbols: vec![symbol(3, 1), symbol(3, 0)],
        };
        let errors = validate_catalog(&catalog).expect_err("invalid");
        assert!(errors.contains(&ValidationError::DuplicateSymbolId(3)));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::NonPositiveWeight { .. })));
    }

    #[test]
    fn test_default_config_passes() {
        assert!(validate_config(&MachineConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_reels_and_segments_rejected() {
        let config = MachineConfig {
            reel_count: 0,
            segment_count: 0,
            ..MachineConfig::default()
        };
        let errors = validate_config(&config).expect_err("invalid");
        assert!(errors.contains(&ValidationError::NoReels));
        assert!(errors.contains(&ValidationError::NoSegments));
    }

    #[test]
    fn test_deceleration_bounds() {
        for bad in [0.0, 1.0, 1.5, -0.2, f32::NAN] {
            let config = MachineConfig {
                deceleration: bad,
                ..MachineConfig::default()
            };
            assert!(validate_config(&config).is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn test_negative_timing_rejected() {
        let config = MachineConfig {
            stop_stagger: -0.1,
            ..MachineConfig::default()
        };
        let errors = validate_config(&config).expect_err("invalid");
        assert!(matches!(
            errors[0],
            ValidationError::NegativeTiming {
                field: "stop_stagger",
                ..
            }
        ));
    }

    #[test]
    fn test_validate_all_collects_both() {
        let config = MachineConfig {
            jackpot_threshold: 0,
            ..MachineConfig::default()
        };
        let errors = validate_all(&SymbolCatalog::default(), &config).expect_err("invalid");
        assert_eq!(errors.len(), 2);
    }
}
