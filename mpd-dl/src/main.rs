use clap::{ColorChoice, Parser};
use colored::Colorize;
use mpd_dl::{Args, logger, pipeline};
use std::{
    io::{IsTerminal, stdout},
    process,
};

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    colored::control::set_override(match args.color {
        ColorChoice::Always => true,
        ColorChoice::Auto => stdout().is_terminal(),
        ColorChoice::Never => false,
    });
    logger::init(args.log_level())?;

    pipeline::execute(args.config()?)?;
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".bold().red(), e);
        process::exit(1);
    }
}
