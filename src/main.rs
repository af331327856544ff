//! pdfconv - PDF conversion web service
//!
//! CLI entry point

use clap::Parser;
use pdfconv::cli::InfoArgs;
use pdfconv::{build_service, exit_codes, logging, AppState, Cli, Commands, Config, ServeArgs, WebServer};
use std::path::Path;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => run_serve(&args),
        Commands::Info(args) => run_info(&args),
    };

    std::process::exit(match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_codes::GENERAL_ERROR
        }
    });
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

// ============ Serve Command ============

fn run_serve(args: &ServeArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?.merge_with_cli(&args.overrides());
    logging::init(&config.logging)?;

    let server_config = config.server_config();
    let state = AppState::new(build_service(&config), config.tool_commands());

    tracing::info!(
        "pdfconv v{} (workers={}, upload limit={} MB, timeout={}s)",
        env!("CARGO_PKG_VERSION"),
        server_config.workers,
        config.server.upload_limit_mb,
        config.conversion.timeout_secs
    );

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(server_config.workers)
        .enable_all()
        .build()?;
    rt.block_on(async {
        let server = WebServer::with_config(server_config, state);
        server.run().await.map_err(|e| anyhow::anyhow!(e))
    })?;

    Ok(())
}

// ============ Info Command ============

fn run_info(args: &InfoArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;

    println!("pdfconv v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("System Information:");
    println!("  Platform: {}", std::env::consts::OS);
    println!("  Arch: {}", std::env::consts::ARCH);
    println!("  CPUs: {}", num_cpus::get());

    println!();
    println!("Conversion Tools:");
    check_tool(&config.conversion.pdf2docx_cmd, "pdf2docx (PDF → DOCX)");
    check_tool(&config.conversion.pdftoppm_cmd, "Poppler pdftoppm (PDF → image)");
    check_tool(&config.conversion.pdfinfo_cmd, "Poppler pdfinfo (page count)");

    println!();
    println!("Config File Locations:");
    for path in Config::search_paths() {
        let marker = if path.is_file() { " (found)" } else { "" };
        println!("  {}{}", path.display(), marker);
    }

    Ok(())
}

fn check_tool(cmd: &str, name: &str) {
    match which::which(cmd) {
        Ok(path) => println!("  {}: {} (found)", name, path.display()),
        Err(_) => println!("  {}: Not found ({})", name, cmd),
    }
}
