use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::{
    config::{Config, ConfigError},
    destination::{
        auth::{OAuthCredentials, TokenStore},
        session::{ConnectionStatus, Session},
        ytmusic::YtMusic,
    },
    progress::TerminalProgress,
    report::TransferReport,
    source::yandex::YandexMusic,
    transfer::transfer,
};

#[derive(Parser)]
#[command(name = "likeshift")]
#[command(version = "0.1")]
#[command(about = "Transfer liked tracks from Yandex Music to YouTube Music")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output JSON file for transfer results
    #[arg(short, long, default_value = "tracks.json")]
    pub output: PathBuf,

    /// Connect directly even if the proxy is enabled in the config
    #[arg(long)]
    pub no_proxy: bool,

    /// Hide progress bars and log progress lines instead
    #[arg(long)]
    pub log_only: bool,
}

/// Loads and validates the config, telling the user how to fix it if needed
fn load_config(path: &Path) -> anyhow::Result<Config> {
    let cfg = Config::load(path).and_then(|cfg| cfg.validate().map(|()| cfg));
    match cfg {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            match &e {
                ConfigError::Missing { .. } => {
                    println!("Config file {} not found!", path.display());
                    println!("A template config was created there.");
                    println!("Please fill in your credentials and run again.");
                }
                ConfigError::Placeholder { key } => {
                    println!("Please set `{key}` in {}", path.display());
                }
                ConfigError::Io(_) | ConfigError::Parse(_) => {
                    println!("Could not load {}: {e}", path.display());
                }
            }
            Err(e.into())
        }
    }
}

fn print_connection(status: &ConnectionStatus) {
    match status {
        ConnectionStatus::Direct => println!("✓ Connected directly (no proxy)"),
        ConnectionStatus::Proxied { ip } => println!(
            "✓ Connected via proxy. IP: {}",
            ip.as_deref().unwrap_or("unknown")
        ),
        ConnectionStatus::Unverified { status } => {
            println!("⚠ Could not verify proxy connection (HTTP {status})")
        }
        ConnectionStatus::Failed { reason } => {
            println!("⚠ Proxy connection test failed: {reason}");
            println!("   Make sure the proxy is running, or pass --no-proxy.");
        }
    }
}

fn print_summary(report: &TransferReport) {
    println!("\nSummary: {} total tracks", report.liked_tracks.len());
    println!("Successfully imported: {}", report.imported());
    println!("Not found: {} tracks", report.not_found.len());
    println!("Errors: {} tracks", report.errors.len());
    if report.skipped > 0 {
        println!("Skipped at source: {} tracks", report.skipped);
    }
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(&cli.config)?;

    let proxy = cfg.proxy.effective(cli.no_proxy);
    match &proxy {
        Some(proxy) => println!("Using proxy: {}:{}", proxy.host, proxy.port),
        None => println!("Proxy disabled"),
    }

    let source = YandexMusic::new(&cfg.source.token);

    let session = Session::new(proxy)?;
    print_connection(&session.probe_connection());

    let credentials = OAuthCredentials {
        client_id: cfg.destination.client_id.clone(),
        client_secret: cfg.destination.client_secret.clone(),
    };
    let tokens = TokenStore::load(&cfg.destination.token_file, credentials).inspect_err(|_| {
        println!(
            "OAuth token file {} is missing or invalid.",
            cfg.destination.token_file.display()
        );
        println!("Authorize the configured client and save its token there first.");
    })?;
    let destination = YtMusic::new(session, tokens);

    println!("Moving liked tracks from Yandex Music to YouTube Music...");
    let mut progress = TerminalProgress::new(cli.log_only);
    let report = transfer(&source, &destination, &mut progress)
        .context("Failed to list liked tracks in Yandex Music")?;

    print_summary(&report);

    report
        .write(&cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    println!("Report written to {}", cli.output.display());

    Ok(())
}
