//! Download DRM protected DASH streams, decrypt them and mux the result.
//!
//! `mpd-dl` does not implement any protocol, cipher or container itself.
//! It drives three external programs in a fixed order:
//!
//! 1. [yt-dlp](https://github.com/yt-dlp/yt-dlp) downloads the best video and audio tracks.
//! 2. mp4decrypt from [Bento4](https://github.com/axiomatic-systems/Bento4) decrypts them
//!    with the given KID:KEY pairs.
//! 3. [ffmpeg](https://ffmpeg.org) muxes the decrypted tracks without re-encoding.
//!
//! ```no_run
//! use mpd_dl::{config::{Config, Job, Overrides}, pipeline};
//!
//! let config = Config::resolve(
//!     Job::default(),
//!     Overrides {
//!         input: Some("https://example.com/manifest.mpd".to_owned()),
//!         keys: vec!["eb676abbcb345e96bbcf616630f1a3da:100b6c20940f779a4589152b57d2dacb".to_owned()],
//!         ..Default::default()
//!     },
//! )
//! .unwrap();
//!
//! let report = pipeline::execute(config).unwrap();
//! println!("{}", report.output.display());
//! ```

mod args;
pub mod config;
mod error;
pub mod keys;
pub mod logger;
pub mod pipeline;
pub mod process;
pub mod tools;

pub use args::Args;
pub use error::{Error, Result};
