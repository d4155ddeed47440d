use crate::error::{Error, Result};
use log::debug;
use std::{
    env,
    ffi::OsStr,
    fmt,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    YtDlp,
    Mp4Decrypt,
    Ffmpeg,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::YtDlp, Tool::Mp4Decrypt, Tool::Ffmpeg];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::YtDlp => "yt-dlp",
            Tool::Mp4Decrypt => "mp4decrypt",
            Tool::Ffmpeg => "ffmpeg",
        }
    }

    fn bin(&self) -> String {
        if cfg!(target_os = "windows") {
            format!("{}.exe", self.name())
        } else {
            self.name().to_owned()
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Explicit executable paths which take priority over the search path.
#[derive(Debug, Clone, Default)]
pub struct ToolPaths {
    pub yt_dlp: Option<PathBuf>,
    pub mp4decrypt: Option<PathBuf>,
    pub ffmpeg: Option<PathBuf>,
}

impl ToolPaths {
    fn get(&self, tool: Tool) -> Option<&PathBuf> {
        match tool {
            Tool::YtDlp => self.yt_dlp.as_ref(),
            Tool::Mp4Decrypt => self.mp4decrypt.as_ref(),
            Tool::Ffmpeg => self.ffmpeg.as_ref(),
        }
    }
}

/// Resolved locations of every external program the pipeline runs.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub yt_dlp: PathBuf,
    pub mp4decrypt: PathBuf,
    pub ffmpeg: PathBuf,
}

impl Toolchain {
    /// Resolves all tools against `PATH`.
    pub fn locate(overrides: &ToolPaths) -> Result<Self> {
        Self::locate_in(overrides, env::var_os("PATH").as_deref())
    }

    /// Resolves all tools against a custom search path.
    /// Fails on the first tool that cannot be found.
    pub fn locate_in(overrides: &ToolPaths, search_path: Option<&OsStr>) -> Result<Self> {
        let locate = |tool: Tool| -> Result<PathBuf> {
            let path = match overrides.get(tool) {
                Some(path) if is_executable(path) => Some(path.to_owned()),
                Some(_) => None,
                None => find_program(tool, search_path),
            }
            .ok_or_else(|| Error::MissingTool {
                name: tool.name().to_owned(),
            })?;

            debug!("found {} at {}", tool, path.display());
            Ok(path)
        };

        Ok(Self {
            yt_dlp: locate(Tool::YtDlp)?,
            mp4decrypt: locate(Tool::Mp4Decrypt)?,
            ffmpeg: locate(Tool::Ffmpeg)?,
        })
    }
}

fn find_program(tool: Tool, search_path: Option<&OsStr>) -> Option<PathBuf> {
    let bin = tool.bin();
    let local = Path::new(".").join(&bin);

    if is_executable(&local) {
        return Some(local);
    }

    env::split_paths(search_path?)
        .map(|dir| dir.join(&bin))
        .find(|x| is_executable(x))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|x| x.is_file() && x.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
