use crate::{
    config::{Config, Job, Overrides},
    tools::ToolPaths,
};
use anyhow::Result;
use clap::{ArgAction, ColorChoice, Parser};
use log::LevelFilter;
use std::path::PathBuf;

/// Download a DRM protected DASH playlist with yt-dlp, decrypt it with mp4decrypt
/// and mux the decrypted tracks into a single file with ffmpeg.
///
/// Without any flags the manifest and keys are read from mpd-dl.json
/// in the current directory.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    /// http(s):// | .mpd
    #[arg(short, long, env = "MPD_DL_INPUT")]
    pub input: Option<String>,

    /// Keys for decrypting encrypted streams.
    /// KID is a 128-bit KID in hex or a track ID in decimal, KEY is a 128-bit key in hex.
    /// This option can be used multiple times.
    #[arg(short, long, env = "MPD_DL_KEYS", value_name = "KID:KEY;KID:KEY...")]
    pub key: Vec<String>,

    /// Path for the final muxed file.
    /// Existing files will be overwritten.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Parent directory for the temporary working directory.
    /// By default the system temp directory is used.
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Read input, keys and output from this json file.
    /// By default mpd-dl.json is read when it exists.
    #[arg(long, value_name = "PATH")]
    pub job: Option<PathBuf>,

    /// Skip listing available formats before downloading.
    #[arg(long)]
    pub skip_formats: bool,

    /// Custom path to yt-dlp executable.
    #[arg(long, env = "MPD_DL_YT_DLP", help_heading = "Tool Options", value_name = "PATH")]
    pub yt_dlp: Option<PathBuf>,

    /// Custom path to mp4decrypt executable.
    #[arg(long, env = "MPD_DL_MP4DECRYPT", help_heading = "Tool Options", value_name = "PATH")]
    pub mp4decrypt: Option<PathBuf>,

    /// Custom path to ffmpeg executable.
    #[arg(long, env = "MPD_DL_FFMPEG", help_heading = "Tool Options", value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// When to output colored text.
    #[arg(long, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Print debug messages, use twice for trace messages.
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only print warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Warn,
            (false, 0) => LevelFilter::Info,
            (false, 1) => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn config(self) -> Result<Config> {
        let job = Job::load(self.job.as_deref())?;

        Config::resolve(
            job,
            Overrides {
                input: self.input,
                keys: self.key,
                output: self.output,
                directory: self.directory,
                tools: ToolPaths {
                    yt_dlp: self.yt_dlp,
                    mp4decrypt: self.mp4decrypt,
                    ffmpeg: self.ffmpeg,
                },
                skip_formats: self.skip_formats,
            },
        )
    }
}
