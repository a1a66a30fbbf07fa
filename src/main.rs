//! Ferry CLI - versioned static-site deploys to S3
//!
//! Usage: ferry <COMMAND>
//!
//! Commands:
//!   deploy   Upload built assets to the bucket
//!   version  Print the resolved deploy version

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use ferry::deploy::{DeployOptions, DeployReport, Deployer};
use ferry::store::{MemoryStore, ObjectStore, S3Store};
use ferry::ui::{self, DeployEvent};
use ferry::version::{GitLog, VersionSource};
use ferry::{Config, DEFAULT_ASSETS_DIR};

/// Ferry - versioned static-site deploys to S3
#[derive(Parser, Debug)]
#[command(name = "ferry")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// NDJSON event output for CI
    #[arg(long, default_value = "false")]
    json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload built assets to the bucket
    Deploy {
        /// Directory of built assets
        #[arg(short, long, default_value = DEFAULT_ASSETS_DIR)]
        source: PathBuf,

        /// Upload under bare-basename keys instead of <version>/<name>
        #[arg(long)]
        no_prefix: bool,

        /// Dry run - resolve, transform and plan, but upload nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the resolved deploy version
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Deploy {
            source,
            no_prefix,
            dry_run,
        } => cmd_deploy(&source, no_prefix, dry_run, cli.json, cli.verbose).await,
        Commands::Version => cmd_version(cli.json),
    }
}

async fn cmd_deploy(
    source: &PathBuf,
    no_prefix: bool,
    dry_run: bool,
    json: bool,
    verbose: u8,
) -> Result<()> {
    let config = Config::from_env().context("deployment environment is incomplete")?;

    if json {
        ui::emit(&DeployEvent::Start {
            command: "deploy",
            source: source.display().to_string(),
            bucket: &config.bucket,
            dry_run,
            version_prefix: !no_prefix,
        })?;
    } else if verbose > 0 || dry_run {
        eprintln!("Source: {}", source.display());
        eprintln!("Bucket: {}", config.bucket);
        if dry_run {
            eprintln!("Mode: Dry run");
        }
    }

    let versions = GitLog::new(".");
    let options = DeployOptions {
        version_prefix: !no_prefix,
        dry_run,
    };

    // A dry run never opens a connection; a throwaway store stands in for S3.
    let report = if dry_run {
        let store = MemoryStore::new();
        run_pipeline(&store, &versions, &config, source, &options, json, verbose).await?
    } else {
        let store = S3Store::connect(&config)
            .await
            .with_context(|| format!("connecting to bucket '{}'", config.bucket))?;
        run_pipeline(&store, &versions, &config, source, &options, json, verbose).await?
    };

    if json {
        ui::emit(&DeployEvent::Done {
            version: &report.version,
            uploaded: report.uploaded.len(),
            url: report.url.as_deref(),
        })?;
    } else {
        // The stdout contract: the version, then the URL when a host is
        // configured. Everything else goes to stderr.
        println!("{}", report.version);
        if let Some(url) = &report.url {
            println!("{}", url);
        }
    }

    Ok(())
}

async fn run_pipeline(
    store: &dyn ObjectStore,
    versions: &dyn VersionSource,
    config: &Config,
    source: &PathBuf,
    options: &DeployOptions,
    json: bool,
    verbose: u8,
) -> Result<DeployReport> {
    if !json && verbose > 0 && !options.dry_run {
        eprintln!("Target: {}", store.location());
    }

    let deployer = Deployer::new(
        store,
        versions,
        config.tracking_code.as_deref(),
        config.site_host.as_deref(),
    );

    // The callback is infallible, so the first emit failure is carried out
    // of the loop and reported once the deploy itself has finished.
    let mut emit_error: Option<std::io::Error> = None;
    let mut on_upload = |key: &str| {
        if json {
            let event = if options.dry_run {
                DeployEvent::Planned { key }
            } else {
                DeployEvent::Uploaded { key }
            };
            if let Err(e) = ui::emit(&event) {
                emit_error.get_or_insert(e);
            }
        } else if verbose > 0 || options.dry_run {
            eprintln!("  {}", key);
        }
    };

    let report = deployer
        .deploy_with_callback(source, options, &mut on_upload)
        .await
        .with_context(|| format!("deploying {}", source.display()))?;

    if let Some(e) = emit_error {
        return Err(e).context("writing the event stream");
    }

    Ok(report)
}

fn cmd_version(json: bool) -> Result<()> {
    let version = GitLog::new(".")
        .resolve_latest()
        .context("resolving the deploy version")?;

    if json {
        ui::emit(&DeployEvent::Version { version: &version })?;
    } else {
        println!("{}", version);
    }
    Ok(())
}
