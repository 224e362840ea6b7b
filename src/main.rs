#![deny(warnings)]

mod cli;

use anyhow::anyhow;
use clap::{crate_authors, crate_description, crate_version, Arg, ArgAction, ArgMatches, Command};
use jobwire::{
    config::{Config, RawConfig},
    wire::Diagnostic,
};
use std::{env, path::Path, process::ExitCode};
use tracing::info;

/// Exit code reported when the remote job drifted from the desired one.
const DRIFT_EXIT_CODE: u8 = 2;

fn main() -> Result<ExitCode, anyhow::Error> {
    dotenvy::dotenv().ok();

    // Logs go to stderr, stdout is reserved for the converted documents.
    if env::var("RUST_LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::fmt()
            .json()
            .flatten_event(true)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let matches = Command::new("Jobwire job converter.")
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .arg(
            Arg::new("CONFIG")
                .env("JOBWIRE_CONFIG")
                .short('c')
                .long("config")
                .global(true)
                .default_value("jobwire.toml")
                .help("Path to the Jobwire configuration file."),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("to-wire")
                .about("Converts the job config (TOML or JSON) to the wire document.")
                .arg(
                    Arg::new("JOB_FILE")
                        .required(true)
                        .help("Path to the job config file."),
                )
                .arg(
                    Arg::new("PRETTY")
                        .long("pretty")
                        .action(ArgAction::SetTrue)
                        .help("Pretty-prints the wire document."),
                ),
        )
        .subcommand(
            Command::new("from-wire")
                .about("Converts the wire document to the job config (TOML).")
                .arg(
                    Arg::new("WIRE_FILE")
                        .required(true)
                        .help("Path to the wire document file."),
                ),
        )
        .subcommand(
            Command::new("diff")
                .about("Checks whether the remote job drifted from the desired job config.")
                .arg(
                    Arg::new("JOB_FILE")
                        .required(true)
                        .help("Path to the desired job config file."),
                )
                .arg(
                    Arg::new("WIRE_FILE")
                        .required(true)
                        .help("Path to the wire document of the remote job."),
                ),
        )
        .get_matches();

    let raw_config = RawConfig::read_from_file(
        matches
            .get_one::<String>("CONFIG")
            .ok_or_else(|| anyhow!("<CONFIG> argument is not provided."))?,
    )?;

    info!(config = ?raw_config, "Jobwire raw configuration.");

    let mut config = Config::from(raw_config);
    match matches.subcommand() {
        Some(("to-wire", matches)) => {
            // CLI argument takes precedence.
            if matches.get_flag("PRETTY") {
                config.pretty = true;
            }

            let job = cli::read_job(path_arg(matches, "JOB_FILE")?)?;
            let wire = cli::to_wire(&job, &config)?;
            report_diagnostics(&wire.diagnostics);
            println!("{}", wire.value);
        }
        Some(("from-wire", matches)) => {
            let document = cli::read_wire_document(path_arg(matches, "WIRE_FILE")?)?;
            let job = cli::from_wire(&document, &config)?;
            report_diagnostics(&job.diagnostics);
            print!("{}", job.value);
        }
        Some(("diff", matches)) => {
            let job = cli::read_job(path_arg(matches, "JOB_FILE")?)?;
            let document = cli::read_wire_document(path_arg(matches, "WIRE_FILE")?)?;
            let diff = cli::diff(&job, &document, &config)?;
            report_diagnostics(&diff.diagnostics);
            match diff.value {
                Some(diff) => {
                    print!("{diff}");
                    return Ok(ExitCode::from(DRIFT_EXIT_CODE));
                }
                None => println!("No drift."),
            }
        }
        _ => return Err(anyhow!("Unknown subcommand.")),
    }

    Ok(ExitCode::SUCCESS)
}

fn path_arg<'m>(matches: &'m ArgMatches, name: &str) -> anyhow::Result<&'m Path> {
    matches
        .get_one::<String>(name)
        .map(Path::new)
        .ok_or_else(|| anyhow!("<{name}> argument is not provided."))
}

fn report_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("warning: {diagnostic}");
    }
}
