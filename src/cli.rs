//! Command-line interface

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CliOverrides;

/// PDF conversion web service
#[derive(Parser, Debug)]
#[command(name = "pdfconv")]
#[command(version, about = "HTTP service converting PDFs to DOCX documents and images")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Show version and external tool availability
    Info(InfoArgs),
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Config file (default: ./pdfconv.toml, then the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind to
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Maximum upload size in MB
    #[arg(long)]
    pub upload_limit: Option<usize>,

    /// Per-conversion timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl ServeArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            port: self.port,
            bind: self.bind.clone(),
            upload_limit_mb: self.upload_limit,
            timeout_secs: self.timeout,
            log_level: self.log_level.clone(),
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    /// Config file naming the tools to look for
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
