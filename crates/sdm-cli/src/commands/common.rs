//! Shared utilities for CLI commands

use anyhow::{bail, Context, Result};
use sdm_core::{init_tracking_table, DirResources, MigrationCatalog, TableName};
use sdm_db::DuckDbBackend;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::cli::{GlobalArgs, SourceArgs};

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) u8);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main.rs downcasts before anything is printed.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Migration source selected on the command line.
pub(crate) enum Source<'a> {
    Folder(&'a Path),
    Resources {
        loader: Arc<DirResources>,
        manifest: &'a str,
    },
}

impl<'a> Source<'a> {
    pub(crate) fn from_args(args: &'a SourceArgs) -> Result<Self> {
        match (&args.dir, &args.manifest) {
            (Some(dir), None) => Ok(Source::Folder(dir)),
            (None, Some(manifest)) => {
                let root = args
                    .resource_root
                    .clone()
                    .unwrap_or_else(|| ".".into());
                Ok(Source::Resources {
                    loader: Arc::new(DirResources::new(root)),
                    manifest,
                })
            }
            _ => bail!("Specify exactly one of --dir or --manifest"),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Source::Folder(dir) => dir.display().to_string(),
            Source::Resources { loader, manifest } => {
                format!("{} (under {})", manifest, loader.root().display())
            }
        }
    }

    pub(crate) fn catalog(&self) -> Result<MigrationCatalog> {
        match self {
            Source::Folder(dir) => MigrationCatalog::from_folder(dir)
                .with_context(|| format!("Failed to list migrations in {}", dir.display())),
            Source::Resources { loader, manifest } => {
                MigrationCatalog::from_resources(loader.clone(), manifest)
                    .with_context(|| format!("Failed to read manifest {manifest}"))
            }
        }
    }
}

/// Open the database named by `--database` / `SDM_DATABASE`.
pub(crate) fn open_database(global: &GlobalArgs) -> Result<DuckDbBackend> {
    let Some(path) = global.database.as_deref() else {
        bail!("No database given; pass --database or set SDM_DATABASE");
    };
    if global.verbose {
        eprintln!("[verbose] Opening database {path}");
    }
    DuckDbBackend::new(path).with_context(|| format!("Failed to open database {path}"))
}

/// Resolve the tracking table from `--table`, `SDM_OWN_TABLE`, or the default.
pub(crate) fn tracking_table(global: &GlobalArgs) -> Result<TableName> {
    let table = init_tracking_table(global.table.as_deref())
        .context("Invalid tracking table name")?
        .clone();
    if global.verbose {
        eprintln!("[verbose] Using tracking table {table}");
    }
    Ok(table)
}
