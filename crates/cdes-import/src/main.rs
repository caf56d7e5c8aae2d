//! Imports breeder notation into CDES strain records.
//!
//! Reads "Name<TAB>Genetics" lines from a file (or stdin when no file is
//! given) and prints a JSON array of strain maps.
//!
//! ```text
//! cdes-import [--breeder NAME] [--type TYPE] [FILE]
//! ```
//!
//! Diagnostics go to stderr; set `RUST_LOG=debug` for parser details.

use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};

use cdes::codec::encode_strains;
use cdes::{
    create_strain_with_genetics, normalize_strain_type, parse_genetics_text, validate_genetics_profile,
    StrainType, Telemetry,
};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: cdes-import [--breeder NAME] [--type TYPE] [FILE]";

#[derive(Debug, Default)]
struct Args {
    path: Option<String>,
    breeder: Option<String>,
    strain_type: StrainType,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--breeder" => {
                parsed.breeder = Some(args.next().ok_or("--breeder requires a value")?);
            }
            "--type" => {
                let raw = args.next().ok_or("--type requires a value")?;
                parsed.strain_type = normalize_strain_type(&raw);
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}\n{USAGE}")),
            _ if parsed.path.is_some() => return Err(format!("unexpected argument {arg}\n{USAGE}")),
            _ => parsed.path = Some(arg),
        }
    }
    Ok(parsed)
}

fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut telemetry = Telemetry::from_env();
    let text = read_input(args.path.as_deref())?;
    let lines = parse_genetics_text(&text);
    tracing::info!(records = lines.len(), "parsed genetics lines");

    let mut strains = Vec::with_capacity(lines.len());
    for line in &lines {
        let genetics = line.genetics.as_deref().unwrap_or_default();
        let strain = create_strain_with_genetics(
            &line.strain_name,
            genetics,
            args.strain_type,
            args.breeder.as_deref(),
        );
        telemetry.track_model_usage("Strain", Some("create_strain_with_genetics"));

        if let Some(profile) = &strain.genetics_profile {
            let result = validate_genetics_profile(profile);
            telemetry.track_validation("genetics-profile", result.valid);
            for err in &result.errors {
                tracing::warn!(strain = %line.strain_name, %err, "genetics profile finding");
            }
        }
        strains.push(strain);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &encode_strains(&strains))?;
    writeln!(out)?;

    tracing::debug!(events = telemetry.events().len(), "telemetry events recorded");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("cdes-import: {err}");
        std::process::exit(1);
    }
}
