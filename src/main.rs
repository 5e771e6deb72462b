#![forbid(unsafe_code)]
#![deny(clippy::all)]

use std::fs::File;
use std::io::prelude::*;
use std::path::PathBuf;

use structopt::StructOpt;
use tracing::{info, warn};

use netdata::error::{Error, Result};
use netdata::sector::write;
use netdata::{archive, FileKind, ParseOutcome, ParsedFile, SectorOptionsBuilder};

#[derive(StructOpt)]
#[structopt(name = "netdata", about = "Checks and normalizes ATC network data files")]
struct Args {
    /// Data file, or a zip package containing one
    #[structopt(name = "input", parse(from_os_str))]
    input: PathBuf,
    /// Archive member to read
    #[structopt(short = "m", long = "member")]
    member: Option<String>,
    /// sector, position, euroscope or traffic; guessed from the file name when left out
    #[structopt(short = "k", long = "kind")]
    kind: Option<FileKind>,
    /// Write the normalized sector file here
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output: Option<PathBuf>,
    /// Distance in nautical miles within which runways join the nearest airport
    #[structopt(long = "runway-radius", default_value = "5")]
    runway_radius: f64,
    /// Only print errors
    #[structopt(short = "q", long = "quiet")]
    quiet: bool,
    /// Increase log output, repeat for more
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: u8,
}

impl Args {
    fn log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

fn setup_logging(args: &Args) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("netdata={}", args.log_level())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn run(args: &Args) -> Result<bool> {
    let source = archive::load(&args.input, args.member.as_deref())?;
    let kind = match args.kind {
        Some(kind) => kind,
        None => FileKind::from_path(&source.name).ok_or_else(|| Error::UnknownFileKind {
            name: source.name.clone(),
        })?,
    };
    info!(input = %source.name, %kind, "parsing");

    let options = SectorOptionsBuilder::default()
        .runway_association_radius_nm(args.runway_radius)
        .build()
        .unwrap_or_default();
    let parsed = kind.parse_with(&source.text, &options);

    for error in parsed.errors() {
        warn!(line = error.line_number(), content = error.line_content(), "{}", error.message());
    }
    if !args.quiet {
        println!(
            "{}: {} records, {} errors",
            source.name,
            parsed.record_count(),
            parsed.errors().len()
        );
    }

    if let Some(output) = &args.output {
        match &parsed {
            ParsedFile::Sector(file) => {
                File::create(output)?.write_all(write::to_sct(file).as_bytes())?;
                info!(output = %output.display(), "wrote sector file");
            }
            other => warn!(kind = %other.kind(), "only sector files can be written, ignoring --output"),
        }
    }

    Ok(parsed.is_clean())
}

fn main() {
    let args = Args::from_args();
    setup_logging(&args);

    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    }
}
