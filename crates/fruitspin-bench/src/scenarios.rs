use fruitspin_core::config::{DecayMode, MachineConfig};

/// A named machine tuning to simulate.
pub struct Scenario {
    pub name: &'static str,
    pub config: MachineConfig,
}

/// The standard suite: shipped tuning plus the variants worth watching.
pub fn standard_scenarios(base: &MachineConfig) -> Vec<Scenario> {
    vec![
        Scenario {
            name: "shipped",
            config: base.clone(),
        },
        Scenario {
            name: "per-second-decay",
            config: MachineConfig {
                decay_mode: DecayMode::PerSecond,
                deceleration: 0.3,
                ..base.clone()
            },
        },
        Scenario {
            name: "no-stagger",
            config: MachineConfig {
                stop_stagger: 0.0,
                ..base.clone()
            },
        },
        Scenario {
            name: "wide-spread",
            config: MachineConfig {
                speed_spread: 0.5,
                bell_curve_samples: 1,
                ..base.clone()
            },
        },
    ]
}

/// Look a scenario up by name.
pub fn find_scenario(base: &MachineConfig, name: &str) -> Option<Scenario> {
    standard_scenarios(base).into_iter().find(|s| s.name == name)
}
