use crate::{keys::KeyPair, tools::ToolPaths};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_OUTPUT: &str = "final_output.mp4";
pub const DEFAULT_JOB_FILE: &str = "mpd-dl.json";
pub const TEMP_PREFIX: &str = "mpd_dl_";

/// Optional job description read from a json file.
///
/// ```json
/// { "input": "https://example.com/manifest.mpd",
///   "keys": ["eb676abbcb345e96bbcf616630f1a3da:100b6c20940f779a4589152b57d2dacb"],
///   "output": "final_output.mp4" }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    pub input: Option<String>,
    #[serde(default)]
    pub keys: Vec<String>,
    pub output: Option<PathBuf>,
}

impl Job {
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("could not read {}.", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("could not deserialize job from {}.", path.display()))
    }

    /// Reads `path` when given, otherwise the default job file if one exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None if Path::new(DEFAULT_JOB_FILE).is_file() => Self::read(Path::new(DEFAULT_JOB_FILE)),
            None => Ok(Self::default()),
        }
    }
}

/// Everything a pipeline run needs.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: String,
    pub keys: Vec<KeyPair>,
    pub output: PathBuf,
    pub directory: Option<PathBuf>,
    pub tools: ToolPaths,
    pub list_formats: bool,
}

/// Values given on the command line, each one overriding the job file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<String>,
    pub keys: Vec<String>,
    pub output: Option<PathBuf>,
    pub directory: Option<PathBuf>,
    pub tools: ToolPaths,
    pub skip_formats: bool,
}

impl Config {
    pub fn resolve(job: Job, overrides: Overrides) -> Result<Self> {
        let Some(input) = overrides.input.or(job.input) else {
            bail!(
                "no manifest given, use --input or set \"input\" in {}.",
                DEFAULT_JOB_FILE
            );
        };

        let raw_keys = if overrides.keys.is_empty() {
            job.keys
        } else {
            overrides.keys
        };

        let mut keys = Vec::new();

        for raw in &raw_keys {
            keys.extend(KeyPair::parse_list(raw).map_err(anyhow::Error::msg)?);
        }

        if keys.is_empty() {
            bail!(
                "no decryption keys given, use --key or set \"keys\" in {}.",
                DEFAULT_JOB_FILE
            );
        }

        Ok(Self {
            input,
            keys,
            output: overrides
                .output
                .or(job.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            directory: overrides.directory,
            tools: overrides.tools,
            list_formats: !overrides.skip_formats,
        })
    }
}
