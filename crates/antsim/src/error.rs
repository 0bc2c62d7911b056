use thiserror::Error;

/// Invalid simulation configuration. The only failure the core reports;
/// everything at run time is absorbed into agent/colony state.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("world size must be positive, got {width}x{height}")]
    WorldSize { width: f32, height: f32 },

    #[error("cell size must be positive, got {0}")]
    CellSize(f32),

    #[error("decay rate for {channel} must be non-negative, got {rate}")]
    DecayRate { channel: &'static str, rate: f32 },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("grid needs {cells} cells across all colonies, at most {max} are supported")]
    GridTooLarge { cells: u64, max: u64 },

    #[error("colony capacity must be at least 1")]
    ZeroCapacity,

    #[error("at most {max} colonies are supported, got {count}")]
    TooManyColonies { count: usize, max: usize },

    #[error("at least one colony is required")]
    NoColonies,

    #[error("colony {index} home ({x}, {y}) lies outside the world")]
    HomeOutsideWorld { index: usize, x: f32, y: f32 },
}
