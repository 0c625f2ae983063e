//! Migration sources: named units that can produce a SQL stream.
//!
//! Two providers exist. The folder provider lists `*.sql` files of a
//! directory. The resource provider reads a manifest (one unit name per line)
//! through a [`ResourceLoader`] and resolves each name under the manifest's
//! path.

use crate::error::{CoreError, CoreResult};
use crate::migration_name::MigrationName;
use crate::statement::split_sql;
use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Cursor};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File suffix identifying migration files in a folder.
pub const SQL_FILE_SUFFIX: &str = ".sql";

/// Separator between a resource base path and a unit name.
pub const RESOURCE_SEPARATOR: char = '/';

/// Lookup of resources by slash-separated path.
///
/// A path naming a directory-like location yields a newline-separated list of
/// the `.sql` files directly inside it, so a folder of migrations doubles as
/// its own manifest.
pub trait ResourceLoader: Send + Sync {
    /// Return the resource at `path`, or `Ok(None)` when it does not exist.
    fn get(&self, path: &str) -> io::Result<Option<Cow<'static, [u8]>>>;
}

/// Resources compiled into the binary with `rust-embed`.
pub struct EmbeddedResources<E> {
    _assets: PhantomData<fn() -> E>,
}

impl<E: RustEmbed> EmbeddedResources<E> {
    pub fn new() -> Self {
        Self {
            _assets: PhantomData,
        }
    }
}

impl<E: RustEmbed> Default for EmbeddedResources<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RustEmbed> ResourceLoader for EmbeddedResources<E> {
    fn get(&self, path: &str) -> io::Result<Option<Cow<'static, [u8]>>> {
        if let Some(file) = E::get(path) {
            return Ok(Some(file.data));
        }

        let prefix = format!("{}{}", path.trim_end_matches(RESOURCE_SEPARATOR), RESOURCE_SEPARATOR);
        let mut is_dir = false;
        let entries: BTreeSet<String> = E::iter()
            .filter_map(|p| {
                let rest = p.strip_prefix(prefix.as_str())?;
                is_dir = true;
                (!rest.contains(RESOURCE_SEPARATOR) && is_sql_file_name(rest))
                    .then(|| rest.to_string())
            })
            .collect();
        Ok(is_dir.then(|| listing(entries)))
    }
}

/// Resources rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct DirResources {
    root: PathBuf,
}

impl DirResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceLoader for DirResources {
    fn get(&self, path: &str) -> io::Result<Option<Cow<'static, [u8]>>> {
        let full = self.root.join(path.trim_start_matches(RESOURCE_SEPARATOR));
        if full.is_file() {
            return fs::read(&full).map(|bytes| Some(Cow::Owned(bytes)));
        }
        if full.is_dir() {
            let mut entries = BTreeSet::new();
            for entry in fs::read_dir(&full)? {
                let entry = entry?;
                let file_name = entry.file_name().to_string_lossy().into_owned();
                if entry.file_type()?.is_file() && is_sql_file_name(&file_name) {
                    entries.insert(file_name);
                }
            }
            return Ok(Some(listing(entries)));
        }
        Ok(None)
    }
}

fn is_sql_file_name(name: &str) -> bool {
    name.ends_with(SQL_FILE_SUFFIX)
}

fn listing(entries: BTreeSet<String>) -> Cow<'static, [u8]> {
    let text = entries.into_iter().collect::<Vec<_>>().join("\n");
    Cow::Owned(text.into_bytes())
}

/// A named migration unit able to open its SQL text on demand.
#[derive(Clone)]
pub enum MigrationUnit {
    /// A `.sql` file inside a migrations folder.
    File { name: MigrationName, path: PathBuf },
    /// A resource resolved through a [`ResourceLoader`].
    Resource {
        name: MigrationName,
        path: String,
        loader: Arc<dyn ResourceLoader>,
    },
}

impl MigrationUnit {
    /// The unit's identity.
    pub fn name(&self) -> &MigrationName {
        match self {
            MigrationUnit::File { name, .. } | MigrationUnit::Resource { name, .. } => name,
        }
    }

    /// Where the unit's text is read from, for messages.
    pub fn location(&self) -> String {
        match self {
            MigrationUnit::File { path, .. } => path.display().to_string(),
            MigrationUnit::Resource { path, .. } => path.clone(),
        }
    }

    /// Open a fresh reader over the unit's text.
    pub fn open(&self) -> CoreResult<Box<dyn BufRead + Send>> {
        match self {
            MigrationUnit::File { path, .. } => {
                let file = File::open(path)
                    .map_err(|e| CoreError::io(path.display().to_string(), e))?;
                Ok(Box::new(BufReader::new(file)))
            }
            MigrationUnit::Resource { path, loader, .. } => {
                match loader.get(path).map_err(|e| CoreError::io(path.clone(), e))? {
                    Some(data) => Ok(Box::new(Cursor::new(data))),
                    None => Err(CoreError::ResourceNotFound { path: path.clone() }),
                }
            }
        }
    }

    /// Open the unit and split it into statements.
    pub fn statements(&self) -> CoreResult<Vec<String>> {
        let reader = self.open()?;
        split_sql(reader).map_err(|e| CoreError::io(self.location(), e))
    }
}

impl fmt::Debug for MigrationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationUnit::File { name, path } => f
                .debug_struct("File")
                .field("name", name)
                .field("path", path)
                .finish(),
            MigrationUnit::Resource { name, path, .. } => f
                .debug_struct("Resource")
                .field("name", name)
                .field("path", path)
                .finish(),
        }
    }
}

/// List the `.sql` files of `folder` as unordered migration units.
pub fn list_folder(folder: &Path) -> CoreResult<Vec<MigrationUnit>> {
    log::info!("Checking migrations folder: {}", folder.display());

    if !folder.is_dir() {
        return Err(CoreError::FolderNotFound {
            path: folder.display().to_string(),
        });
    }

    let read_err = |e| CoreError::io(folder.display().to_string(), e);
    let mut units = Vec::new();
    for entry in fs::read_dir(folder).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !is_sql_file_name(&file_name) || !entry.path().is_file() {
            continue;
        }
        let name = MigrationName::try_new(file_name).ok_or_else(|| CoreError::EmptyMigrationName {
            origin: folder.display().to_string(),
        })?;
        units.push(MigrationUnit::File {
            name,
            path: entry.path(),
        });
    }
    Ok(units)
}

/// List the units named by the manifest at `manifest_path`.
///
/// Each non-blank manifest line is a unit name resolved at
/// `manifest_path + "/" + name`. A missing manifest yields no units.
pub fn list_resources(
    loader: Arc<dyn ResourceLoader>,
    manifest_path: &str,
) -> CoreResult<Vec<MigrationUnit>> {
    let manifest = match loader
        .get(manifest_path)
        .map_err(|e| CoreError::io(manifest_path, e))?
    {
        Some(data) => data,
        None => {
            log::debug!("No migration manifest at {manifest_path}");
            return Ok(Vec::new());
        }
    };

    let mut base = manifest_path.to_string();
    if !base.ends_with(RESOURCE_SEPARATOR) {
        base.push(RESOURCE_SEPARATOR);
    }

    let reader: &[u8] = &manifest;
    let mut units = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| CoreError::io(manifest_path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let Some(name) = MigrationName::try_new(line) else {
            continue;
        };
        units.push(MigrationUnit::Resource {
            path: format!("{base}{name}"),
            name,
            loader: Arc::clone(&loader),
        });
    }
    Ok(units)
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
