use thiserror::Error;

/// Errors that can occur while bringing up the game in the browser.
#[derive(Debug, Error)]
pub enum FruitspinError {
    #[error("WebGPU adapter not found: {0}")]
    AdapterNotFound(String),

    #[error("Failed to request GPU device: {0}")]
    DeviceRequestFailed(String),

    #[error("Surface configuration failed: {0}")]
    SurfaceConfigFailed(String),

    #[error("Canvas element '{0}' not found")]
    CanvasNotFound(String),

    #[error("Game data could not be loaded: {0}")]
    DataLoadFailed(String),

    #[error("Machine configuration rejected: {0}")]
    ConfigRejected(String),
}
