use crate::error::{Error, Result};
use colored::Colorize;
use log::info;
use std::{ffi::OsString, path::Path, process::Command};

/// Runs `program` with `args` to completion, echoing the command line first.
/// Stdio is inherited so the tool prints straight to the terminal.
pub fn run<I, S>(program: &Path, args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let args = args.into_iter().map(Into::into).collect::<Vec<OsString>>();
    let name = program_name(program);

    info!(
        "{} {} {}",
        ">>>".bold().cyan(),
        program.display(),
        args.iter()
            .map(|x| {
                let x = x.to_string_lossy();
                if x.contains(' ') {
                    format!("\"{x}\"")
                } else {
                    x.into_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    );

    let status = Command::new(program)
        .args(&args)
        .status()
        .map_err(|source| Error::Spawn {
            program: name.clone(),
            source,
        })?;

    if !status.success() {
        return Err(Error::CommandFailed {
            program: name,
            code: status.code().unwrap_or(-1),
        });
    }

    Ok(())
}

fn program_name(program: &Path) -> String {
    program
        .file_stem()
        .unwrap_or(program.as_os_str())
        .to_string_lossy()
        .into_owned()
}
