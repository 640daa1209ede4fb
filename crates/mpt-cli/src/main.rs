//! `mpt` CLI — convert files between MessagePack, JSON, and YAML.
//!
//! ## Usage
//!
//! ```sh
//! # Convert one file; formats come from the extensions
//! mpt input.msgpack output.json
//!
//! # Override either side when the extension says nothing useful
//! mpt --from msgpack --to json input.bin output.txt
//!
//! # Render a MessagePack file as JSON on stdout
//! mpt --view file.msgpack
//!
//! # Convert one file to stdout
//! mpt data.msgpack --json
//! mpt data.json --yaml
//!
//! # Batch: write a sibling file next to each input
//! mpt *.msgpack --to-json
//! mpt config/*.yaml --to-msgpack
//! ```
//!
//! Exit status is 0 on success, 2 for usage errors (bad flags, wrong number of
//! files, formats that cannot be determined), and 1 when reading, converting,
//! or writing fails. Set `RUST_LOG=debug` for per-file progress on stderr.

use anyhow::{Context, Result};
use clap::{ArgGroup, CommandFactory, Parser};
use mpt_core::Format;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "mpt",
    version,
    about = "Convert files between MessagePack, JSON, and YAML",
    arg_required_else_help = true
)]
#[command(group(ArgGroup::new("stdout").args(["json", "yaml"])))]
#[command(group(
    ArgGroup::new("batch")
        .args(["to_json", "to_yaml", "to_msgpack"])
        .conflicts_with("stdout")
))]
struct Cli {
    /// Input file and output file, or the input files of a --view/--json/--yaml/batch run
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Render a MessagePack file as JSON on stdout
    #[arg(short, long, conflicts_with_all = ["stdout", "batch"])]
    view: bool,

    /// Convert the input to JSON and write it to stdout
    #[arg(long)]
    json: bool,

    /// Convert the input to YAML and write it to stdout
    #[arg(long)]
    yaml: bool,

    /// Override the detected input format (json, yaml, msgpack)
    #[arg(long, value_name = "FORMAT")]
    from: Option<Format>,

    /// Override the detected output format of a single conversion
    #[arg(long, value_name = "FORMAT", conflicts_with = "batch")]
    to: Option<Format>,

    /// Batch convert the input files to .json files
    #[arg(long)]
    to_json: bool,

    /// Batch convert the input files to .yaml files
    #[arg(long)]
    to_yaml: bool,

    /// Batch convert the input files to .msgpack files
    #[arg(long)]
    to_msgpack: bool,
}

/// A malformed invocation. Reported with the usage line and exit status 2.
#[derive(Debug, Error)]
#[error("{0}")]
struct UsageError(String);

/// What a parsed command line asks for.
#[derive(Debug, PartialEq)]
enum Mode {
    View(PathBuf),
    Stdout { input: PathBuf, to: Format },
    Batch { inputs: Vec<PathBuf>, target: Format },
    Pair { input: PathBuf, output: PathBuf },
}

impl Cli {
    fn stdout_format(&self) -> Option<Format> {
        if self.json {
            Some(Format::Json)
        } else if self.yaml {
            Some(Format::Yaml)
        } else {
            None
        }
    }

    fn batch_target(&self) -> Option<Format> {
        if self.to_json {
            Some(Format::Json)
        } else if self.to_yaml {
            Some(Format::Yaml)
        } else if self.to_msgpack {
            Some(Format::Msgpack)
        } else {
            None
        }
    }

    /// Pick the mode and check the number of files it needs.
    /// Flag combinations are already validated by clap.
    fn mode(&self) -> std::result::Result<Mode, UsageError> {
        let files = &self.files;
        if self.view {
            return match files.as_slice() {
                [input] => Ok(Mode::View(input.clone())),
                _ => Err(UsageError("--view expects exactly one input file".into())),
            };
        }
        if let Some(target) = self.batch_target() {
            if files.is_empty() {
                return Err(UsageError(
                    "no input files provided for batch conversion".into(),
                ));
            }
            return Ok(Mode::Batch {
                inputs: files.clone(),
                target,
            });
        }
        if let Some(to) = self.stdout_format() {
            return match files.as_slice() {
                [input] => Ok(Mode::Stdout {
                    input: input.clone(),
                    to,
                }),
                _ => Err(UsageError(
                    "exactly one input file required when converting to stdout".into(),
                )),
            };
        }
        match files.as_slice() {
            [input, output] => Ok(Mode::Pair {
                input: input.clone(),
                output: output.clone(),
            }),
            _ => Err(UsageError("expected input and output files".into())),
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is::<UsageError>() => {
            eprintln!("error: {err}");
            eprintln!();
            eprintln!("{}", Cli::command().render_usage());
            eprintln!();
            eprintln!("For more information, try '--help'.");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.mode()? {
        Mode::View(input) => convert_to_stdout(&input, Format::Msgpack, Format::Json),
        Mode::Stdout { input, to } => {
            let from = resolve_format(cli.from, &input)?;
            convert_to_stdout(&input, from, to)
        }
        Mode::Batch { inputs, target } => batch_convert(&inputs, cli.from, target),
        Mode::Pair { input, output } => {
            let from = resolve_format(cli.from, &input)?;
            let to = resolve_format(cli.to, &output)?;
            convert_and_write(&input, &output, from, to)
        }
    }
}

/// Explicit flag first, then the file extension. Failure is a usage error.
fn resolve_format(explicit: Option<Format>, path: &Path) -> Result<Format> {
    Format::resolve(explicit, path).map_err(|err| UsageError(err.to_string()).into())
}

/// Convert each input to a sibling file in `target`, in order. Stops at the
/// first file that fails; earlier outputs are left in place.
fn batch_convert(inputs: &[PathBuf], from: Option<Format>, target: Format) -> Result<()> {
    for input in inputs {
        let source = resolve_format(from, input)?;
        let output = batch_destination(input, target);
        convert_and_write(input, &output, source, target)?;
    }
    info!(files = inputs.len(), %target, "batch conversion finished");
    Ok(())
}

/// `data/a.msgpack` + JSON → `data/a.json`.
fn batch_destination(input: &Path, target: Format) -> PathBuf {
    match target.extension() {
        Some(ext) => input.with_extension(ext),
        None => input.to_path_buf(),
    }
}

fn convert_and_write(input: &Path, output: &Path, from: Format, to: Format) -> Result<()> {
    let converted = convert_file(input, from, to)?;
    std::fs::write(output, &converted)
        .with_context(|| format!("write {}", output.display()))?;
    debug!(
        input = %input.display(),
        output = %output.display(),
        bytes = converted.len(),
        "wrote"
    );
    Ok(())
}

fn convert_to_stdout(input: &Path, from: Format, to: Format) -> Result<()> {
    let converted = convert_file(input, from, to)?;
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&converted)
        .and_then(|()| stdout.flush())
        .context("write stdout")?;
    Ok(())
}

fn convert_file(input: &Path, from: Format, to: Format) -> Result<Vec<u8>> {
    let data = std::fs::read(input).with_context(|| format!("read {}", input.display()))?;
    debug!(input = %input.display(), %from, %to, "converting");
    Ok(mpt_core::convert(&data, from, to)?)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}
