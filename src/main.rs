//! Folio - RSS feed and sitemap generator for a static portfolio site.

#![allow(dead_code)]

mod cli;
mod config;
mod generator;
mod logger;
mod project;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::SiteConfig;
use std::process::ExitCode;
use utils::{date::SystemClock, plural::plural_count};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log!("error"; "{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = SiteConfig::load(cli)?;
    let report = generator::generate(&config, &SystemClock, cli.dry_run)?;

    log!("done"; "processed {}", plural_count(report.projects, "project"));
    Ok(())
}
