use std::io::Write;
use std::sync::Arc;

use catnav_catalog::catalogservice::AddrConnector;
use catnav_catalog::Credential;
use catnav_drive::{Drive, PathResolver, ResolverConfig};
use clap::Parser;
use tracing::debug;

mod args;

use args::{Cli, Commands, Target, PASSWORD_ENV};

/// Name of the drive mounted for `--drive-uri`.
const DRIVE_NAME: &str = "catnav";

/// Builds the virtual path to resolve, and the drive it lives on, if any.
/// Paths below a drive get the credential as the drive's, others as the
/// call's.
fn target_path(
    target: &Target,
    config: &ResolverConfig,
    credential: Option<Credential>,
) -> Result<(String, Option<Drive>, Option<Credential>), catnav_drive::Error> {
    match &target.drive_uri {
        Some(uri) => {
            let drive = Drive::mount(DRIVE_NAME, uri, credential)?;
            let path = drive.join(config.separator, &target.path);
            debug!(drive.root = drive.root(), path = %path, "resolving below drive");

            Ok((path, Some(drive), None))
        }
        None => Ok((target.path.clone(), None, credential)),
    }
}

/// Runs a single command, writing its output to `out`.
async fn run(
    command: Commands,
    config: ResolverConfig,
    credential: Option<Credential>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Root { uri } => {
            let drive = Drive::mount(DRIVE_NAME, &uri, None)?;
            writeln!(out, "{}", drive.root())?;
        }
        Commands::Ls(target) => {
            let (path, drive, call_credential) = target_path(&target, &config, credential)?;
            let resolver = PathResolver::new(config, Arc::new(AddrConnector));

            let children = resolver
                .list(&path, call_credential.as_ref(), drive.as_ref())
                .await?;
            serde_json::to_writer_pretty(&mut *out, &children)?;
            writeln!(out)?;
        }
        Commands::Get(target) => {
            let (path, drive, call_credential) = target_path(&target, &config, credential)?;
            let resolver = PathResolver::new(config, Arc::new(AddrConnector));

            let info = resolver
                .get(&path, call_credential.as_ref(), drive.as_ref())
                .await?;
            serde_json::to_writer_pretty(&mut *out, &info)?;
            writeln!(out)?;
        }
    }

    Ok(())
}

/// Writes an error and its chain of sources, one per line.
fn report(err: &dyn std::error::Error, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "error: {}", err)?;

    let mut source = err.source();
    while let Some(cause) = source {
        writeln!(out, "  caused by: {}", cause)?;
        source = cause.source();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let tracing_handle = catnav_tracing::TracingBuilder::default()
        .level(cli.log_level)
        .enable_progressbar()
        .build()?;

    let credential = cli.credential(std::env::var(PASSWORD_ENV).ok());
    let config = ResolverConfig::from(cli.resolver);

    if let Err(e) = run(
        cli.command,
        config,
        credential,
        &mut tracing_handle.get_stdout_writer(),
    )
    .await
    {
        report(e.as_ref(), &mut tracing_handle.get_stderr_writer())?;
        std::process::exit(1);
    }

    Ok(())
}
