//! Download, decrypt and merge.
//!
//! Every step blocks on one external program and the next step only starts
//! after it returns. The working directory is never removed so that
//! intermediate tracks can be inspected after a failed run.

use crate::{
    config::{Config, TEMP_PREFIX},
    error::{Error, Result},
    keys::{KeyPair, key_args},
    process,
    tools::Toolchain,
};
use colored::Colorize;
use log::{info, warn};
use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

const VIDEO_ENCRYPTED: &str = "video.encrypted.mp4";
const AUDIO_ENCRYPTED: &str = "audio.encrypted.m4a";
const VIDEO_DECRYPTED: &str = "video.decrypted.mp4";
const AUDIO_DECRYPTED: &str = "audio.decrypted.m4a";

/// Fixed track locations inside the working directory.
#[derive(Debug, Clone)]
pub struct TrackPaths {
    pub video_encrypted: PathBuf,
    pub audio_encrypted: PathBuf,
    pub video_decrypted: PathBuf,
    pub audio_decrypted: PathBuf,
}

impl TrackPaths {
    pub fn new(dir: &Path) -> Self {
        Self {
            video_encrypted: dir.join(VIDEO_ENCRYPTED),
            audio_encrypted: dir.join(AUDIO_ENCRYPTED),
            video_decrypted: dir.join(VIDEO_DECRYPTED),
            audio_decrypted: dir.join(AUDIO_DECRYPTED),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Decrypted video and audio were muxed together with ffmpeg.
    Merged,
    /// No decrypted audio, decrypted video was copied as is.
    VideoOnly,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub output: PathBuf,
    pub workdir: PathBuf,
    pub outcome: Outcome,
}

pub struct Pipeline {
    tools: Toolchain,
    input: String,
    keys: Vec<KeyPair>,
    output: PathBuf,
    list_formats: bool,
    workdir: PathBuf,
    paths: TrackPaths,
}

/// Checks that every tool is present, then runs the whole pipeline.
/// Nothing touches the filesystem when a tool is missing.
pub fn execute(config: Config) -> Result<Report> {
    let tools = Toolchain::locate(&config.tools)?;
    Pipeline::new(tools, config)?.run()
}

impl Pipeline {
    /// Creates a fresh working directory, which is kept after the run.
    pub fn new(tools: Toolchain, config: Config) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX);

        let workdir = match &config.directory {
            Some(directory) => {
                fs::create_dir_all(directory)?;
                builder.tempdir_in(directory)?
            }
            None => builder.tempdir()?,
        }
        .keep();

        info!("{} Using temp dir: {}", "[INFO]".bold().green(), workdir.display());

        Ok(Self {
            tools,
            input: config.input,
            keys: config.keys,
            output: config.output,
            list_formats: config.list_formats,
            paths: TrackPaths::new(&workdir),
            workdir,
        })
    }

    pub fn run(&self) -> Result<Report> {
        if self.list_formats {
            step("Listing available formats (yt-dlp -F) ...");
            self.print_formats()?;
        }

        step("Downloading best video (encrypted) ...");
        self.download("bestvideo", &self.paths.video_encrypted)?;

        if !self.paths.video_encrypted.exists() {
            return Err(Error::MissingVideo(self.paths.video_encrypted.clone()));
        }

        step("Downloading best audio (encrypted) ...");
        self.download("bestaudio", &self.paths.audio_encrypted)?;

        if !self.paths.audio_encrypted.exists() {
            warn!(
                "Encrypted audio not found at {}, trying to continue (maybe audio is muxed).",
                self.paths.audio_encrypted.display()
            );
        }

        step("Decrypting tracks with mp4decrypt ...");
        self.decrypt()?;

        step(&format!("Merging decrypted tracks into {}", self.output.display()));
        let outcome = self.merge()?;

        info!(
            "\n{} Final file created: {}",
            "[SUCCESS]".bold().green(),
            self.output.display()
        );
        info!(
            "{} Temporary dir (kept): {}",
            "[CLEANUP]".bold().cyan(),
            self.workdir.display()
        );
        info!("If you want to remove temp files, delete the folder above.");

        Ok(Report {
            output: self.output.clone(),
            workdir: self.workdir.clone(),
            outcome,
        })
    }

    fn print_formats(&self) -> Result<()> {
        match process::run(&self.tools.yt_dlp, ["-F", self.input.as_str()]) {
            // The listing can exit non-zero and still print what we need.
            Err(Error::CommandFailed { code, .. }) => {
                warn!("yt-dlp -F exited with code {}, continuing.", code);
                Ok(())
            }
            result => result,
        }
    }

    fn download(&self, format: &str, path: &Path) -> Result<()> {
        process::run(
            &self.tools.yt_dlp,
            [
                OsString::from("-f"),
                format.into(),
                "-o".into(),
                path.into(),
                self.input.as_str().into(),
            ],
        )
    }

    fn decrypt_file(&self, input: &Path, output: &Path) -> Result<()> {
        let mut args = key_args(&self.keys)
            .into_iter()
            .map(OsString::from)
            .collect::<Vec<_>>();
        args.push(input.into());
        args.push(output.into());

        process::run(&self.tools.mp4decrypt, args)
    }

    fn decrypt(&self) -> Result<()> {
        let paths = &self.paths;

        if paths.video_encrypted.exists() {
            self.decrypt_file(&paths.video_encrypted, &paths.video_decrypted)?;
        }

        if paths.audio_encrypted.exists() {
            return self.decrypt_file(&paths.audio_encrypted, &paths.audio_decrypted);
        }

        // yt-dlp may have written a single merged file under another name.
        let candidates = self.merged_candidates()?;

        let Some(candidate) = candidates.first() else {
            return Err(Error::NoCandidate(self.workdir.clone()));
        };

        info!(
            "{} Found candidate merged encrypted file(s): {}",
            "[INFO]".bold().green(),
            candidates
                .iter()
                .map(|x| x.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        if candidates.len() > 1 {
            warn!("Multiple candidates found, decrypting {}.", candidate.display());
        }

        self.decrypt_file(candidate, &paths.video_decrypted)
    }

    /// Other `.mp4` files in the working directory in name order, excluding
    /// the encrypted and decrypted video tracks.
    pub fn merged_candidates(&self) -> Result<Vec<PathBuf>> {
        let pattern = Path::new(&glob::Pattern::escape(&self.workdir.to_string_lossy()))
            .join("*.mp4")
            .to_string_lossy()
            .into_owned();
        let mut candidates = Vec::new();

        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(glob::GlobError::into_error)?;

            if path.is_file()
                && path != self.paths.video_encrypted
                && path != self.paths.video_decrypted
            {
                candidates.push(path);
            }
        }

        Ok(candidates)
    }

    fn merge(&self) -> Result<Outcome> {
        let paths = &self.paths;

        match (paths.video_decrypted.exists(), paths.audio_decrypted.exists()) {
            (true, true) => {
                process::run(
                    &self.tools.ffmpeg,
                    [
                        OsString::from("-y"),
                        "-i".into(),
                        paths.video_decrypted.as_os_str().into(),
                        "-i".into(),
                        paths.audio_decrypted.as_os_str().into(),
                        "-c".into(),
                        "copy".into(),
                        self.output.as_os_str().into(),
                    ],
                )?;
                Ok(Outcome::Merged)
            }
            (true, false) => {
                info!(
                    "{} Decrypted audio absent, copying decrypted video to final output.",
                    "[INFO]".bold().green()
                );
                fs::copy(&paths.video_decrypted, &self.output)?;
                Ok(Outcome::VideoOnly)
            }
            _ => Err(Error::NoDecryptedVideo(paths.video_decrypted.clone())),
        }
    }
}

fn step(message: &str) {
    info!("\n{} {}", "[STEP]".bold().magenta(), message);
}
