//! Configuration for the `palm_read` batch tool.
//!
//! ```json
//! {
//!   "inputs": ["photos/left.jpg", "photos/right.png"],
//!   "rules": "rules/default.json",
//!   "params": { "detection": { "edge_percentile": 0.9 } },
//!   "output": { "dir": "out", "save_intensity": true }
//! }
//! ```
use crate::error::Result;
use crate::image::io::read_json_file;
use crate::params::{load_params, PalmParams};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct ReaderToolConfig {
    pub inputs: Vec<PathBuf>,
    /// Rules document; runs are reported as degraded without one.
    #[serde(default)]
    pub rules: Option<PathBuf>,
    /// Inline parameters. Takes precedence over `params_file`.
    #[serde(default)]
    pub params: Option<PalmParams>,
    /// Parameter preset stored on disk.
    #[serde(default)]
    pub params_file: Option<PathBuf>,
    pub output: ReaderOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct ReaderOutputConfig {
    pub dir: PathBuf,
    /// Also write the preprocessed intensity field as a PNG per input.
    #[serde(default)]
    pub save_intensity: bool,
}

impl ReaderToolConfig {
    /// Inline params, else the preset file, else defaults; always clamped.
    pub fn resolve_params(&self) -> Result<PalmParams> {
        let params = match (&self.params, &self.params_file) {
            (Some(p), _) => *p,
            (None, Some(path)) => load_params(path)?,
            (None, None) => PalmParams::default(),
        };
        Ok(params.clamped())
    }

    /// Output paths for `input`: `<dir>/<stem>.json` and `<dir>/<stem>_intensity.png`.
    pub fn output_paths(&self, input: &Path) -> (PathBuf, PathBuf) {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "palm".to_string());
        (
            self.output.dir.join(format!("{stem}.json")),
            self.output.dir.join(format!("{stem}_intensity.png")),
        )
    }
}

pub fn load_config(path: &Path) -> Result<ReaderToolConfig> {
    read_json_file(path)
}
