#![allow(dead_code)]

use mpd_dl::{
    config::{Config, Job, Overrides},
    tools::ToolPaths,
};
use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

pub const KID: &str = "eb676abbcb345e96bbcf616630f1a3da";
pub const KEY: &str = "100b6c20940f779a4589152b57d2dacb";
pub const MANIFEST: &str = "https://example.com/drm/manifest.mpd";

/// What the fake yt-dlp does for one requested format.
#[derive(Clone, Copy)]
pub enum Download {
    /// Write the track to the requested path.
    Write,
    /// Exit successfully without writing anything.
    Nothing,
    /// Write a differently named merged file next to the requested path.
    Merged,
    /// Exit with code 1.
    Fail,
}

impl Download {
    fn script(&self, content: &str) -> String {
        match self {
            Download::Write => format!("printf '{content}' > \"$out\""),
            Download::Nothing => ":".to_owned(),
            Download::Merged => "printf 'MERGED' > \"${out%/*}/merged.mp4\"".to_owned(),
            Download::Fail => "exit 1".to_owned(),
        }
    }
}

pub struct Behaviour {
    pub list_code: i32,
    pub video: Download,
    pub audio: Download,
    /// Whether the fake mp4decrypt writes an output for `.m4a` inputs.
    pub decrypt_audio: bool,
    /// Whether the fake mp4decrypt writes an output for `.mp4` inputs.
    pub decrypt_video: bool,
    pub decrypt_code: i32,
    pub ffmpeg_code: i32,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            list_code: 0,
            video: Download::Write,
            audio: Download::Write,
            decrypt_audio: true,
            decrypt_video: true,
            decrypt_code: 0,
            ffmpeg_code: 0,
        }
    }
}

/// A scratch directory holding fake tools, a call log and the run outputs.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new(behaviour: Behaviour) -> Self {
        let fixture = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        fs::create_dir(fixture.bin()).unwrap();
        let log = fixture.log().display().to_string();

        fixture.script(
            "yt-dlp",
            &format!(
                r#"echo "yt-dlp $*" >> '{log}'
if [ "$1" = "-F" ]; then
  echo "ID     EXT RESOLUTION"
  exit {list_code}
fi
format="$2"
out="$4"
case "$format" in
  bestvideo) {video} ;;
  bestaudio) {audio} ;;
esac
"#,
                list_code = behaviour.list_code,
                video = behaviour.video.script("VIDEO"),
                audio = behaviour.audio.script("AUDIO"),
            ),
        );

        fixture.script(
            "mp4decrypt",
            &format!(
                r#"echo "mp4decrypt $*" >> '{log}'
if [ {decrypt_code} -ne 0 ]; then exit {decrypt_code}; fi
prev=""
last=""
for arg in "$@"; do prev="$last"; last="$arg"; done
case "$prev" in
  *.m4a) if [ {decrypt_audio} -eq 0 ]; then exit 0; fi ;;
  *.mp4) if [ {decrypt_video} -eq 0 ]; then exit 0; fi ;;
esac
content=""
IFS= read -r content < "$prev" || true
printf 'DEC:%s' "$content" > "$last"
"#,
                decrypt_code = behaviour.decrypt_code,
                decrypt_audio = behaviour.decrypt_audio as u8,
                decrypt_video = behaviour.decrypt_video as u8,
            ),
        );

        fixture.script(
            "ffmpeg",
            &format!(
                r#"echo "ffmpeg $*" >> '{log}'
if [ {ffmpeg_code} -ne 0 ]; then exit {ffmpeg_code}; fi
printf 'MUXED' > "$8"
"#,
                ffmpeg_code = behaviour.ffmpeg_code,
            ),
        );

        fixture
    }

    fn script(&self, name: &str, body: &str) {
        let path = self.bin().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    pub fn bin(&self) -> PathBuf {
        self.dir.path().join("bin")
    }

    pub fn log(&self) -> PathBuf {
        self.dir.path().join("calls.log")
    }

    pub fn work(&self) -> PathBuf {
        self.dir.path().join("work")
    }

    pub fn output(&self) -> PathBuf {
        self.dir.path().join("final_output.mp4")
    }

    pub fn tools(&self) -> ToolPaths {
        ToolPaths {
            yt_dlp: Some(self.bin().join("yt-dlp")),
            mp4decrypt: Some(self.bin().join("mp4decrypt")),
            ffmpeg: Some(self.bin().join("ffmpeg")),
        }
    }

    pub fn config(&self) -> Config {
        Config::resolve(
            Job::default(),
            Overrides {
                input: Some(MANIFEST.to_owned()),
                keys: vec![format!("{KID}:{KEY};1:{KEY}")],
                output: Some(self.output()),
                directory: Some(self.work()),
                tools: self.tools(),
                skip_formats: false,
            },
        )
        .unwrap()
    }

    /// Lines of the call log, one per tool invocation.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.log())
            .map(|x| x.lines().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    pub fn calls_to(&self, tool: &str) -> usize {
        self.calls()
            .iter()
            .filter(|x| x.starts_with(&format!("{tool} ")))
            .count()
    }
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}
