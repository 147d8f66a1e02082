use crate::converter::{validate_identifier, Strategy};
use crate::error::{ObjectifyError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Service files converted when no configuration names any.
const DEFAULT_SERVICES: &[(&str, &str)] = &[
    ("status-service.js", "statusService"),
    ("checklist-service.js", "checklistService"),
    ("tag-service.js", "tagService"),
    ("comment-service.js", "commentService"),
    ("time-tracking-service.js", "timeTrackingService"),
    ("auth-service.js", "authService"),
    ("realtime-service.js", "realtimeService"),
    ("activity-service.js", "activityService"),
    ("space-service.js", "spaceService"),
    ("project-service.js", "projectService"),
    ("gantt-service.js", "ganttService"),
    ("dashboard-service.js", "dashboardService"),
    ("reports-service.js", "reportsService"),
    ("profile-service.js", "profileService"),
];

const MAX_INDENT_WIDTH: usize = 8;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub conversion: ConversionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub base_directory: PathBuf,
    pub entries: Vec<ServiceEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceEntry {
    pub file: String,
    pub object_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub strategy: Strategy,
    pub indent_width: usize,
    pub backup: bool,
}

impl ServiceEntry {
    pub fn new<F: Into<String>, N: Into<String>>(file: F, object_name: N) -> Self {
        Self {
            file: file.into(),
            object_name: object_name.into(),
        }
    }

    /// Parse `FILE=NAME`.
    pub fn parse(arg: &str) -> std::result::Result<Self, String> {
        let (file, name) = arg
            .split_once('=')
            .ok_or_else(|| format!("Expected FILE=NAME, got '{}'", arg))?;

        let file = file.trim();
        let name = name.trim();
        if file.is_empty() {
            return Err(format!("Missing file name in '{}'", arg));
        }
        validate_identifier(name).map_err(|_| format!("'{}' is not a valid object name", name))?;

        Ok(Self::new(file, name))
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            base_directory: PathBuf::from("frontend/src/js/services"),
            entries: DEFAULT_SERVICES
                .iter()
                .map(|(file, name)| ServiceEntry::new(*file, *name))
                .collect(),
        }
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Heuristic,
            indent_width: 2,
            backup: false,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ObjectifyError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ObjectifyError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ObjectifyError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["objectify.toml", ".objectify.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref base_dir) = cli_args.base_directory {
            self.services.base_directory = base_dir.clone();
        }

        if let Some(ref entries) = cli_args.entries {
            if !entries.is_empty() {
                self.services.entries = entries.clone();
            }
        }

        if let Some(strategy) = cli_args.strategy {
            self.conversion.strategy = strategy;
        }

        if let Some(indent_width) = cli_args.indent_width {
            self.conversion.indent_width = indent_width;
        }

        if cli_args.backup {
            self.conversion.backup = true;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ObjectifyError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| ObjectifyError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.services.entries.is_empty() {
            return Err(ObjectifyError::Config {
                message: "At least one service entry must be specified".to_string(),
            });
        }

        for entry in &self.services.entries {
            if entry.file.trim().is_empty() {
                return Err(ObjectifyError::Config {
                    message: format!("Service entry '{}' has an empty file name", entry.object_name),
                });
            }
            validate_identifier(&entry.object_name)?;
        }

        if self.conversion.indent_width == 0 || self.conversion.indent_width > MAX_INDENT_WIDTH {
            return Err(ObjectifyError::Config {
                message: format!(
                    "Indent width must be between 1 and {} (got {})",
                    MAX_INDENT_WIDTH, self.conversion.indent_width
                ),
            });
        }

        Ok(())
    }

    /// Entries paired with their resolved paths under the base directory.
    pub fn resolved_entries(&self) -> Vec<(PathBuf, &ServiceEntry)> {
        self.services
            .entries
            .iter()
            .map(|entry| (self.services.base_directory.join(&entry.file), entry))
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub base_directory: Option<PathBuf>,
    pub entries: Option<Vec<ServiceEntry>>,
    pub strategy: Option<Strategy>,
    pub indent_width: Option<usize>,
    pub backup: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_directory(mut self, base_directory: Option<PathBuf>) -> Self {
        self.base_directory = base_directory;
        self
    }

    pub fn with_entries(mut self, entries: Option<Vec<ServiceEntry>>) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_strategy(mut self, strategy: Option<Strategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_indent_width(mut self, indent_width: Option<usize>) -> Self {
        self.indent_width = indent_width;
        self
    }

    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }
}
