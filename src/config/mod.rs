use serde::Deserialize;

/// Complete Tripline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TriplineConfig {
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub board: BoardConfig,
}

/// Mock persistence backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
    /// Simulated round-trip latency per backend call (milliseconds)
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
    /// Probability in [0, 1] that any backend call fails
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,
}

fn default_latency_ms() -> u64 {
    300
}

fn default_failure_rate() -> f64 {
    0.0
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
            failure_rate: default_failure_rate(),
        }
    }
}

/// Board configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    /// How many sample waypoints to seed the demo backend with
    #[serde(default = "default_waypoint_count")]
    pub waypoint_count: usize,
}

fn default_waypoint_count() -> usize {
    4
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            waypoint_count: default_waypoint_count(),
        }
    }
}

impl Default for TriplineConfig {
    fn default() -> Self {
        Self {
            persistence: PersistenceConfig::default(),
            board: BoardConfig::default(),
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<TriplineConfig, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let config: TriplineConfig = toml::from_str(&contents)?;
    Ok(config)
}
