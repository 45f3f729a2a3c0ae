use std::io::Write;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docstyler::{ConfigError, Plugin, SiteConfig, StyleLinkInjector};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "docstyler")]
#[command(about = "Injects stylesheet links into a static-site theme", long_about = None)]
struct Cli {
    /// Site configuration file.
    #[arg(short = 'f', long = "config-file", default_value = "mkdocs.yml")]
    config_file: PathBuf,

    /// Log debug output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the configuration and write the theme files.
    Inject,
    /// Validate the configuration only.
    Check,
    /// Validate the configuration and print the link fragment.
    Render,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        tracing::error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = SiteConfig::load(&cli.config_file)?;
    let mut injector = StyleLinkInjector::new();

    let config = match injector.on_config(config) {
        Ok(config) => config,
        Err(e) if e.is_fatal() => abort(&e),
        Err(e) => return Err(e).context("configuration check failed"),
    };

    match cli.command {
        Command::Check => {
            tracing::info!(config = %cli.config_file.display(), "configuration is valid");
        }
        Command::Render => {
            let files = injector.render()?;
            std::io::stdout()
                .write_all(files.styles.contents.as_bytes())
                .context("failed to write to stdout")?;
        }
        Command::Inject => {
            injector.on_pre_template((), "main.html", &config)?;
        }
    }
    Ok(())
}

/// Terminates the build without unwinding.
fn abort(err: &ConfigError) -> ! {
    eprintln!("Error: {}", err);
    process::exit(1);
}
