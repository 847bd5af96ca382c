use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::dataset::Dataset;

/// Contents of `.okr/config.toml` (project) or `<config_dir>/okr/config.toml` (user).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub dashboard: DashboardSection,
    #[serde(default)]
    pub ui: PartialUiConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSection {
    /// Dataset file; relative paths resolve against the config's root.
    #[serde(default)]
    pub dataset: Option<PathBuf>,
    /// Objective selected at startup when it exists.
    #[serde(default)]
    pub default_objective: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Event poll timeout for the TUI loop.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Share of the screen width taken by the detail drawer.
    #[serde(default = "default_drawer_percent")]
    pub drawer_percent: u16,
    /// Rows reserved for each card's mini chart.
    #[serde(default = "default_mini_chart_height")]
    pub mini_chart_height: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            drawer_percent: default_drawer_percent(),
            mini_chart_height: default_mini_chart_height(),
        }
    }
}

/// `[ui]` table as written; unset keys fall through to the next layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialUiConfig {
    #[serde(default)]
    pub tick_ms: Option<u64>,
    #[serde(default)]
    pub drawer_percent: Option<u16>,
    #[serde(default)]
    pub mini_chart_height: Option<u16>,
}

impl PartialUiConfig {
    /// Resolve each key as project, then user, then built-in default.
    #[must_use]
    pub fn resolve(project: &Self, user: &Self) -> UiConfig {
        UiConfig {
            tick_ms: project
                .tick_ms
                .or(user.tick_ms)
                .unwrap_or_else(default_tick_ms),
            drawer_percent: project
                .drawer_percent
                .or(user.drawer_percent)
                .unwrap_or_else(default_drawer_percent),
            mini_chart_height: project
                .mini_chart_height
                .or(user.mini_chart_height)
                .unwrap_or_else(default_mini_chart_height),
        }
        .normalized()
    }
}

impl UiConfig {
    /// Clamp values into ranges the layout can honour.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            tick_ms: self.tick_ms.clamp(16, 5_000),
            drawer_percent: self.drawer_percent.clamp(25, 80),
            mini_chart_height: self.mini_chart_height.clamp(2, 12),
        }
    }
}

/// Where the active dataset came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum DatasetSource {
    Flag(PathBuf),
    Env(PathBuf),
    ProjectConfig(PathBuf),
    UserConfig(PathBuf),
    BuiltinSample,
}

impl DatasetSource {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Flag(p) | Self::Env(p) | Self::ProjectConfig(p) | Self::UserConfig(p) => {
                Some(p)
            }
            Self::BuiltinSample => None,
        }
    }

    /// Load the dataset this source names.
    ///
    /// # Errors
    ///
    /// Propagates [`Dataset::load`] failures.
    pub fn load(&self) -> Result<Dataset> {
        match self.path() {
            Some(path) => Ok(Dataset::load(path)?),
            None => {
                let sample = Dataset::sample();
                sample.ensure_valid()?;
                Ok(sample)
            }
        }
    }

    /// Parse the dataset without rejecting invariant violations.
    ///
    /// # Errors
    ///
    /// Propagates [`Dataset::read`] failures.
    pub fn read(&self) -> Result<Dataset> {
        match self.path() {
            Some(path) => Ok(Dataset::read(path)?),
            None => Ok(Dataset::sample()),
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(p) => write!(f, "{} (--data)", p.display()),
            Self::Env(p) => write!(f, "{} (OKR_DATA)", p.display()),
            Self::ProjectConfig(p) => write!(f, "{} (project config)", p.display()),
            Self::UserConfig(p) => write!(f, "{} (user config)", p.display()),
            Self::BuiltinSample => f.write_str("built-in sample"),
        }
    }
}

/// Project and user config merged, project values winning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    pub dataset: DatasetSource,
    pub default_objective: Option<String>,
    pub ui: UiConfig,
}

/// Load `.okr/config.toml` under `project_root`; missing file means defaults.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<DashboardConfig> {
    load_config_file(&project_root.join(".okr/config.toml"))
}

/// Load the user-level config from the platform config directory.
///
/// # Errors
///
/// Returns an error when the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<DashboardConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(DashboardConfig::default());
    };
    load_config_file(&config_dir.join("okr/config.toml"))
}

fn load_config_file(path: &Path) -> Result<DashboardConfig> {
    if !path.exists() {
        return Ok(DashboardConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<DashboardConfig>(&content).map_err(|e| {
        crate::error::OkrError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Resolve dataset, default objective, and UI settings.
///
/// Dataset precedence: `flag` > `OKR_DATA` > project config > user config >
/// built-in sample.
///
/// # Errors
///
/// Returns an error when either config file is unreadable or malformed.
pub fn resolve_config(project_root: &Path, flag: Option<&Path>) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;
    let user_root = dirs::config_dir().map(|dir| dir.join("okr"));
    let env_data = env::var_os("OKR_DATA").map(PathBuf::from);
    Ok(merge_configs(
        project_root,
        &project,
        user_root.as_deref(),
        &user,
        flag,
        env_data,
    ))
}

fn merge_configs(
    project_root: &Path,
    project: &DashboardConfig,
    user_root: Option<&Path>,
    user: &DashboardConfig,
    flag: Option<&Path>,
    env_data: Option<PathBuf>,
) -> EffectiveConfig {
    let dataset = if let Some(path) = flag {
        DatasetSource::Flag(path.to_path_buf())
    } else if let Some(path) = env_data {
        DatasetSource::Env(path)
    } else if let Some(path) = &project.dashboard.dataset {
        DatasetSource::ProjectConfig(anchor(project_root, path))
    } else if let Some(path) = &user.dashboard.dataset {
        let root = user_root.unwrap_or(project_root);
        DatasetSource::UserConfig(anchor(root, path))
    } else {
        DatasetSource::BuiltinSample
    };

    let default_objective = project
        .dashboard
        .default_objective
        .clone()
        .or_else(|| user.dashboard.default_objective.clone());

    let ui = PartialUiConfig::resolve(&project.ui, &user.ui);

    EffectiveConfig {
        dataset,
        default_objective,
        ui,
    }
}

fn anchor(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

const fn default_tick_ms() -> u64 {
    250
}

const fn default_drawer_percent() -> u16 {
    45
}

const fn default_mini_chart_height() -> u16 {
    5
}
