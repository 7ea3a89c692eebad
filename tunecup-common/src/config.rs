//! Configuration loading and data folder resolution
//!
//! Bootstrap configuration lives in a small TOML file. Every field is
//! optional; a missing file means "use defaults".
//!
//! Data folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::records::{Competitor, Record, Round, Submission, Vote};
use crate::storage::{FileStorage, RecordStorage, StoreFormat};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable consulted for the data folder
pub const DATA_FOLDER_ENV: &str = "TUNECUP_DATA_FOLDER";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the four store files
    #[serde(default)]
    pub data_folder: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Store file names inside the data folder (optional)
    #[serde(default)]
    pub files: StoreFiles,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Format and file names of the four stores, relative to the data folder
///
/// Unset names default to `<store>.<format extension>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreFiles {
    pub format: StoreFormat,
    pub competitors: Option<String>,
    pub rounds: Option<String>,
    pub submissions: Option<String>,
    pub votes: Option<String>,
}

impl StoreFiles {
    /// Default names in the CSV layout
    pub fn csv() -> Self {
        Self {
            format: StoreFormat::Csv,
            ..Self::default()
        }
    }

    pub fn competitors_file(&self) -> String {
        self.file_name(&self.competitors, "competitors")
    }

    pub fn rounds_file(&self) -> String {
        self.file_name(&self.rounds, "rounds")
    }

    pub fn submissions_file(&self) -> String {
        self.file_name(&self.submissions, "submissions")
    }

    pub fn votes_file(&self) -> String {
        self.file_name(&self.votes, "votes")
    }

    fn file_name(&self, name: &Option<String>, stem: &str) -> String {
        name.clone()
            .unwrap_or_else(|| format!("{}.{}", stem, self.format.extension()))
    }
}

impl TomlConfig {
    /// Load configuration from `path`
    ///
    /// A missing file is not an error: a warning is logged and defaults are
    /// returned. A file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: TomlConfig = toml::from_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from the explicit `path`, or from the platform default location
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match default_config_path() {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }
}

/// Platform config file location (`<config dir>/tunecup/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tunecup").join("config.toml"))
}

/// OS-dependent default data folder
pub fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tunecup"))
        .unwrap_or_else(|| PathBuf::from("./tunecup_data"))
}

/// Resolve the data folder following the priority order in the module docs
pub fn resolve_data_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATA_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.data_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_data_folder()
}

/// Resolved data folder plus the store file names inside it
#[derive(Debug, Clone)]
pub struct DataFolder {
    root: PathBuf,
    files: StoreFiles,
}

impl DataFolder {
    pub fn new(root: impl Into<PathBuf>, files: StoreFiles) -> Self {
        Self {
            root: root.into(),
            files,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn competitors_path(&self) -> PathBuf {
        self.root.join(self.files.competitors_file())
    }

    pub fn rounds_path(&self) -> PathBuf {
        self.root.join(self.files.rounds_file())
    }

    pub fn submissions_path(&self) -> PathBuf {
        self.root.join(self.files.submissions_file())
    }

    pub fn votes_path(&self) -> PathBuf {
        self.root.join(self.files.votes_file())
    }

    pub fn format(&self) -> StoreFormat {
        self.files.format
    }

    pub fn competitor_storage(&self) -> FileStorage<Competitor> {
        FileStorage::new(self.files.format, self.competitors_path())
    }

    pub fn round_storage(&self) -> FileStorage<Round> {
        FileStorage::new(self.files.format, self.rounds_path())
    }

    pub fn submission_storage(&self) -> FileStorage<Submission> {
        FileStorage::new(self.files.format, self.submissions_path())
    }

    pub fn vote_storage(&self) -> FileStorage<Vote> {
        FileStorage::new(self.files.format, self.votes_path())
    }

    /// Create the folder and any missing store file as an empty collection
    ///
    /// Existing files are left untouched. Returns how many files were created.
    pub fn ensure_store_files(&self) -> Result<usize> {
        fs::create_dir_all(&self.root).map_err(|e| {
            Error::Config(format!(
                "Cannot create data folder {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let created = [
            create_if_missing(self.competitor_storage())?,
            create_if_missing(self.round_storage())?,
            create_if_missing(self.submission_storage())?,
            create_if_missing(self.vote_storage())?,
        ];
        Ok(created.iter().filter(|&&c| c).count())
    }
}

/// Write an empty collection unless the file already exists
fn create_if_missing<R: Record>(storage: FileStorage<R>) -> Result<bool> {
    if storage.path().exists() {
        return Ok(false);
    }
    storage.save(&[])?;
    info!("Created empty store file {}", storage.describe());
    Ok(true)
}
