//! The vector engine: load, normalize to plain SVG, measure.
//!
//! The engine never rasterizes anything itself. It hands the loaded buffer
//! to an external converter to obtain canonical plain SVG, then asks the
//! same tool for intrinsic dimensions. Raster-only operations are answered
//! with an explicit unsupported error so the full contract is enumerable
//! from one place.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::mime::{self, SVG_MIME};
use crate::process::{CommandRunner, Invocation, SystemRunner};
use regex::Regex;
use std::fs;
use std::sync::OnceLock;
use tracing::{debug, error, warn};

/// Size reported until a dimension query succeeds.
///
/// Non-zero so host pipelines that divide by width or height stay safe
/// even when the query was skipped or failed.
pub const SENTINEL_SIZE: (f64, f64) = (100.0, 100.0);

const EXPORT_PLAIN_SVG_ARG: &str = "--export-plain-svg=-";

/// Engine contract required by the host image pipeline.
///
/// `load` is blocking and self-contained: it runs the full normalize and
/// measure pipeline before returning, and absorbs failures into internal
/// unusable state instead of returning an error.
pub trait RasterEngine {
    /// Loads a new buffer, replacing all state from the previous load.
    ///
    /// `extension` is a hint only (e.g. `".eps"`); content type is always
    /// decided by sniffing the bytes.
    fn load(&mut self, buffer: Vec<u8>, extension: Option<&str>);

    /// Cached `(width, height)` of the loaded image.
    fn size(&self) -> (f64, f64);

    /// The current (possibly normalized) buffer, as-is.
    fn read(&self, extension: Option<&str>, quality: Option<u8>) -> &[u8];

    /// Whether the source holds more than one image.
    fn is_multiple(&self) -> bool;

    /// Re-runs the normalize and measure pipeline for the current buffer.
    fn extract_cover(&mut self);

    fn draw_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64)
        -> Result<(), EngineError>;
    fn resize(&mut self, width: f64, height: f64) -> Result<(), EngineError>;
    fn crop(&mut self, left: f64, top: f64, right: f64, bottom: f64)
        -> Result<(), EngineError>;
    fn rotate(&mut self, degrees: f64) -> Result<(), EngineError>;
    fn flip_vertically(&mut self) -> Result<(), EngineError>;
    fn flip_horizontally(&mut self) -> Result<(), EngineError>;
    fn convert_to_grayscale(&mut self) -> Result<(), EngineError>;
    fn reorientate(&mut self) -> Result<(), EngineError>;
}

/// Vector-image engine backed by an external converter process.
///
/// Each instance exclusively owns its buffer and size state; reuse across
/// loads is supported, sharing one instance across concurrent requests is
/// not part of the contract.
pub struct VectorEngine<R: CommandRunner = SystemRunner> {
    config: EngineConfig,
    runner: R,
    buffer: Vec<u8>,
    extension: Option<String>,
    dirty: bool,
    usable: bool,
    size: (f64, f64),
}

impl VectorEngine<SystemRunner> {
    /// Creates an engine that shells out to the configured converter.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_runner(config, SystemRunner)
    }
}

impl<R: CommandRunner> VectorEngine<R> {
    /// Creates an engine with an injected process runner.
    pub fn with_runner(config: EngineConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            buffer: Vec::new(),
            extension: None,
            dirty: false,
            usable: true,
            size: SENTINEL_SIZE,
        }
    }

    /// Whether the last load produced a usable image.
    ///
    /// Cleared when conversion fails; there is no recovery path until the
    /// next `load`. Callers must check this instead of assuming success.
    pub fn is_usable(&self) -> bool {
        self.usable
    }

    fn convert_path(&self) -> String {
        self.config.convert_path.to_string_lossy().into_owned()
    }

    /// Converts the stored buffer into canonical plain SVG, or marks the
    /// engine unusable.
    ///
    /// Idempotent per load cycle: the dirty flag guarantees the converter
    /// is invoked at most once per loaded buffer, success or failure.
    fn normalize_to_svg(&mut self) {
        if !self.dirty || self.buffer.is_empty() {
            return;
        }
        self.dirty = false;

        let resolved_ext = mime::sniff(&self.buffer)
            .and_then(mime::extension_for_mime)
            .map(str::to_owned)
            .or_else(|| self.extension.clone())
            .unwrap_or_default();

        if resolved_ext == ".svg" {
            // Already canonical; nothing to convert.
            return;
        }

        match self.run_conversion(&resolved_ext) {
            Ok(svg) => {
                debug!(bytes = svg.len(), "normalized buffer to plain SVG");
                self.buffer = svg;
            }
            Err(err) => {
                error!("issue executing converter: {err}");
                self.usable = false;
            }
        }
    }

    /// Writes the buffer to a suffixed temp file and runs the converter
    /// over it, returning the captured plain-SVG output.
    fn run_conversion(&self, suffix: &str) -> Result<Vec<u8>, EngineError> {
        // The suffix is load-bearing: the converter selects its input
        // parser by file extension, and with no extension it assumes SVG
        // input and silently misparses. Stdin piping is not an option for
        // the same reason.
        let builder_result = match &self.config.temp_dir {
            Some(dir) => tempfile::Builder::new().suffix(suffix).tempfile_in(dir),
            None => tempfile::Builder::new().suffix(suffix).tempfile(),
        };
        let tmp = builder_result?;
        fs::write(tmp.path(), &self.buffer)?;

        let invocation = Invocation::new([
            self.convert_path(),
            tmp.path().to_string_lossy().into_owned(),
            EXPORT_PLAIN_SVG_ARG.to_owned(),
        ]);
        let output = self.runner.run(&invocation)?;

        if !output.success()
            || output.stdout.is_empty()
            || mime::sniff(&output.stdout) != Some(SVG_MIME)
        {
            return Err(EngineError::Conversion {
                exit_code: output.exit_code,
                command: invocation.command_line(),
            });
        }

        Ok(output.stdout)
        // `tmp` drops here; the file is removed on every exit path,
        // including the early returns above.
    }

    /// Resolves the image size from the (now-normalized) buffer.
    ///
    /// The size is reset to the sentinel first so a failed or skipped
    /// query still leaves a well-defined value.
    fn refresh_info(&mut self) {
        self.size = SENTINEL_SIZE;

        self.normalize_to_svg();
        if mime::sniff(&self.buffer) != Some(SVG_MIME) {
            // Covers both non-vector input and a failed normalization.
            return;
        }

        let invocation = Invocation::new([
            self.convert_path(),
            "--pipe".to_owned(),
            "--query-width".to_owned(),
            "--query-height".to_owned(),
        ])
        .with_stdin(self.buffer.clone());

        let output = match self.runner.run(&invocation) {
            Ok(output) => output,
            Err(err) => {
                warn!(
                    "dimension query `{}` failed to run: {err}",
                    invocation.command_line()
                );
                return;
            }
        };

        match parse_dimensions(&output.stdout) {
            Some(size) => self.size = size,
            None => warn!(
                "dimension query `{}` produced unparsable output, keeping sentinel size",
                invocation.command_line()
            ),
        }
    }
}

/// Extracts the first two signed-decimal tokens from query output as
/// `(width, height)`.
///
/// The converter is expected to emit two numeric tokens possibly
/// interleaved with other characters; no fixed delimiter is assumed.
/// Fewer than two tokens, or a token that is not a number, yields `None`.
fn parse_dimensions(stdout: &[u8]) -> Option<(f64, f64)> {
    static SIZE_RE: OnceLock<Regex> = OnceLock::new();
    let re = SIZE_RE.get_or_init(|| Regex::new(r"-?[\d.]+").expect("valid size pattern"));

    let text = String::from_utf8_lossy(stdout);
    let mut tokens = re.find_iter(&text);
    let width = tokens.next()?.as_str().parse().ok()?;
    let height = tokens.next()?.as_str().parse().ok()?;
    Some((width, height))
}

impl<R: CommandRunner> RasterEngine for VectorEngine<R> {
    fn load(&mut self, buffer: Vec<u8>, extension: Option<&str>) {
        debug!(bytes = buffer.len(), extension, "loading vector buffer");

        self.extension = extension.map(str::to_owned);
        self.buffer = buffer;
        self.usable = true;
        self.dirty = true;

        self.refresh_info();
    }

    fn size(&self) -> (f64, f64) {
        self.size
    }

    fn read(&self, _extension: Option<&str>, _quality: Option<u8>) -> &[u8] {
        &self.buffer
    }

    fn is_multiple(&self) -> bool {
        // Vector sources here are always single-image.
        false
    }

    fn extract_cover(&mut self) {
        self.refresh_info();
    }

    fn draw_rectangle(
        &mut self,
        _x: f64,
        _y: f64,
        _width: f64,
        _height: f64,
    ) -> Result<(), EngineError> {
        Err(EngineError::Unsupported {
            operation: "draw_rectangle",
        })
    }

    fn resize(&mut self, _width: f64, _height: f64) -> Result<(), EngineError> {
        Err(EngineError::Unsupported { operation: "resize" })
    }

    fn crop(
        &mut self,
        _left: f64,
        _top: f64,
        _right: f64,
        _bottom: f64,
    ) -> Result<(), EngineError> {
        Err(EngineError::Unsupported { operation: "crop" })
    }

    fn rotate(&mut self, _degrees: f64) -> Result<(), EngineError> {
        Err(EngineError::Unsupported { operation: "rotate" })
    }

    fn flip_vertically(&mut self) -> Result<(), EngineError> {
        Err(EngineError::Unsupported {
            operation: "flip_vertically",
        })
    }

    fn flip_horizontally(&mut self) -> Result<(), EngineError> {
        Err(EngineError::Unsupported {
            operation: "flip_horizontally",
        })
    }

    fn convert_to_grayscale(&mut self) -> Result<(), EngineError> {
        Err(EngineError::Unsupported {
            operation: "convert_to_grayscale",
        })
    }

    fn reorientate(&mut self) -> Result<(), EngineError> {
        // Vector content carries no EXIF orientation.
        Ok(())
    }
}
