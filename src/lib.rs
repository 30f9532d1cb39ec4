//! Vector Image Engine
//!
//! This library lets a raster-oriented image pipeline accept vector input
//! (SVG, PDF, EPS, AI, ...) by normalizing it to canonical plain SVG and
//! reporting intrinsic dimensions. The actual conversion is delegated to an
//! external command-line converter (Inkscape-compatible CLI), treated as an
//! untrusted oracle behind an injectable process runner.
//!
//! ## Module Overview
//!
//! - `config`: injected engine configuration (converter binary path)
//! - `engine`: the `RasterEngine` contract and the `VectorEngine` itself
//! - `error`: typed engine errors
//! - `mime`: content sniffing and the MIME ↔ extension table
//! - `process`: external process invocation behind `CommandRunner`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use vector_engine::{EngineConfig, RasterEngine, VectorEngine};
//!
//! let mut engine = VectorEngine::new(EngineConfig::from_env());
//!
//! let bytes = std::fs::read("drawing.eps").unwrap();
//! engine.load(bytes, Some(".eps"));
//!
//! if engine.is_usable() {
//!     let (width, height) = engine.size();
//!     let svg = engine.read(None, None);
//!     println!("{}x{}: {} bytes of plain SVG", width, height, svg.len());
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod mime;
pub mod process;

pub use config::EngineConfig;
pub use engine::{RasterEngine, VectorEngine, SENTINEL_SIZE};
pub use error::EngineError;
pub use process::{CommandRunner, Invocation, ProcessOutput, SystemRunner};
