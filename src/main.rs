use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{debug, info};
use std::fs;
use std::io::{self, Read, Write};

use postman2openapi::{convert, OutputFormat};

/// Convert Postman collections into OpenAPI 3.0 documents
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a collection file
    Convert {
        /// Collection JSON file, or '-' for stdin
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,

        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let env = Env::default().filter_or("RUST_LOG", if cli.verbose { "debug" } else { "info" });
    env_logger::init_from_env(env);

    match &cli.command {
        Commands::Convert { input, output, format } => {
            debug!("Converting {} to {}", input, format);

            let text = read_input(input)?;
            let converted = convert(&text, *format).context("Conversion failed")?;
            write_output(output.as_deref(), &converted)?;

            if let Some(path) = output {
                info!("Wrote OpenAPI {} to {}", format, path);
            }
        }
    }

    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read collection from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(input).context(format!("Failed to read collection file: {}", input))
}

fn write_output(output: Option<&str>, text: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, text).context(format!("Failed to write output file: {}", path)),
        None => io::stdout()
            .write_all(text.as_bytes())
            .context("Failed to write to stdout"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("collection.json");
        let output = dir.path().join("openapi.json");
        fs::write(&input, r#"{"item": [{"name": "Ping", "request": "https://x.com/ping"}]}"#).unwrap();

        let text = read_input(input.to_str().unwrap()).unwrap();
        let converted = convert(&text, OutputFormat::Json).unwrap();
        write_output(Some(output.to_str().unwrap()), &converted).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("\"/ping\""));
        assert!(written.contains("\"operationId\": \"getping\""));
    }

    #[test]
    fn test_missing_input_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = read_input(missing.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read collection file"));
    }
}
