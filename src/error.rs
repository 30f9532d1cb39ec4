//! Error types for the vector engine.

use thiserror::Error;

/// Unified error type for the vector engine.
///
/// Conversion failures are normally absorbed into the engine's unusable
/// state rather than returned to the caller; the variants still carry
/// enough context (exit code, full command line) for the log emission.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The external converter exited non-zero, produced no output, or
    /// produced output that does not sniff as SVG.
    #[error("converter returned exit code {exit_code} for command `{command}`")]
    Conversion { exit_code: i32, command: String },

    /// A raster-only operation was invoked on the vector engine.
    ///
    /// This engine is read/measure-only; pixel manipulation belongs to
    /// the host raster engine once vector content has been converted.
    #[error("operation not supported by the vector engine: {operation}")]
    Unsupported { operation: &'static str },

    /// Temp-file allocation or process spawning failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
