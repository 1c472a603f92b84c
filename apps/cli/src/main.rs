use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use ferrum_codec::{AnyResource, Codec, Error as CodecError};
use ferrum_models::OperationOutcome;

mod config;
mod logging;

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "ferrum",
    about = "Decode, check and normalize FHIR JSON resources",
    version,
    arg_required_else_help = true
)]
struct Cli {
    /// Configuration file (defaults to ./ferrum.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a resource and report what was found, or why it was rejected.
    Decode {
        /// Path to a resource JSON file (or "-" for stdin).
        input: PathBuf,
        /// Expected resourceType at the root.
        #[arg(short = 't', long = "type")]
        resource_type: Option<String>,
    },

    /// Decode a resource and write it back in canonical form.
    Normalize {
        /// Path to a resource JSON file (or "-" for stdin).
        input: PathBuf,
        /// Expected resourceType at the root.
        #[arg(short = 't', long = "type")]
        resource_type: Option<String>,
        /// Output file path (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print JSON output.
        #[arg(long, action = ArgAction::SetTrue)]
        pretty: bool,
    },

    /// List the resource types the catalog can decode.
    Types,

    /// Print CLI version.
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;
    logging::init_logging(&config.logging)?;

    match cli.command {
        Commands::Version => {}
        Commands::Types => {
            for resource_type in ferrum_models::registry().resource_types() {
                println!("{}", resource_type);
            }
        }
        Commands::Decode {
            input,
            resource_type,
        } => {
            let codec = build_codec(&config)?;
            let bytes = read_input(&input)?;
            let resource = decode_or_report(&codec, &bytes, resource_type.as_deref())?;
            println!("{}", summarize(&resource));
        }
        Commands::Normalize {
            input,
            resource_type,
            output,
            pretty,
        } => {
            let codec = build_codec(&config)?;
            let bytes = read_input(&input)?;
            let resource = decode_or_report(&codec, &bytes, resource_type.as_deref())?;
            let encoded = if pretty {
                codec.encode_pretty(&*resource)?
            } else {
                codec.encode(&*resource)?
            };
            write_output(&encoded, output.as_deref())?;
        }
    }

    Ok(())
}

fn build_codec(config: &Config) -> Result<Codec<'static>> {
    let validators = config
        .validator_table()
        .context("Invalid validator configuration")?;
    tracing::debug!(validators = validators.len(), "building codec");
    Ok(ferrum_models::codec()
        .with_options(config.codec.decode_options())
        .with_validators(validators))
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.to_string_lossy() == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read JSON resource from stdin")?;
        Ok(buf)
    } else {
        fs::read(path).with_context(|| format!("Failed to read resource file '{}'", path.display()))
    }
}

/// Decode, printing an OperationOutcome to stdout when the resource is
/// rejected.
fn decode_or_report(codec: &Codec<'_>, bytes: &[u8], expected: Option<&str>) -> Result<AnyResource> {
    match codec.decode(bytes, expected) {
        Ok(resource) => {
            tracing::info!(
                resource_type = resource.resource_type(),
                id = resource.id(),
                "decoded resource"
            );
            Ok(resource)
        }
        Err(CodecError::Decode(err)) => {
            let outcome = OperationOutcome::from_decode_error(&err);
            let report = codec.encode_pretty(&outcome)?;
            println!("{}", String::from_utf8_lossy(&report));
            anyhow::bail!("resource rejected at `{}`: {}", err.path(), err.kind())
        }
        Err(err) => Err(err).context("Input is not a decodable JSON document"),
    }
}

fn summarize(resource: &AnyResource) -> String {
    let mut line = resource.resource_type().to_string();
    if let Some(id) = resource.id() {
        line.push('/');
        line.push_str(id);
    }
    let contained = resource.contained();
    if !contained.is_empty() {
        let types: Vec<&str> = contained.iter().map(AnyResource::resource_type).collect();
        line.push_str(&format!(" (contained: {})", types.join(", ")));
    }
    line
}

fn write_output(content: &[u8], output: Option<&Path>) -> Result<()> {
    if let Some(output_path) = output {
        fs::write(output_path, content)
            .with_context(|| format!("Failed to write to {:?}", output_path))?;
        eprintln!("Wrote output to {:?}", output_path);
    } else {
        println!("{}", String::from_utf8_lossy(content));
    }
    Ok(())
}
