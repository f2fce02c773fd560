use clap::{Parser, Subcommand};
use clap_complete::Shell;
use sani_core::RedactionMethod;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sani")]
#[command(about = "Find and redact personal data in documents and images", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config directory)
    #[arg(long, global = true, env = "SANI_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Extract text from a document and report the PII in it
    Analyze {
        /// Document to analyze
        file: PathBuf,

        /// MIME type (default: guessed from the extension)
        #[arg(long)]
        content_type: Option<String>,

        /// PII service to use
        #[arg(long)]
        service: Option<String>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Detect and redact PII in an image
    Process {
        /// Image to redact
        image: PathBuf,

        /// blackbox or blur (default from config)
        #[arg(long)]
        method: Option<RedactionMethod>,

        /// Where to write the redacted image (default: redacted_<name> next to the input)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Write a default config file and a sample dummy profile
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}
