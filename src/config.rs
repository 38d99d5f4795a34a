use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

pub const API_URL_ENV: &str = "LIFEOS_API_URL";
pub const PORT_ENV: &str = "PORT";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_local_store_dir")]
    pub local_store_dir: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_seed_sample_data")]
    pub seed_sample_data: bool,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_new")]
    pub new: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_toggle_task_status")]
    pub toggle_task_status: String,
    #[serde(default = "default_prioritize")]
    pub prioritize: String,
    #[serde(default = "default_summarize")]
    pub summarize: String,
    #[serde(default = "default_refresh")]
    pub refresh: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
    #[serde(default = "default_tab_left")]
    pub tab_left: String,
    #[serde(default = "default_tab_right")]
    pub tab_right: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
    #[serde(default = "default_tab_bg")]
    pub tab_bg: String,
    #[serde(default = "default_accent")]
    pub accent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            local_store_dir: default_local_store_dir(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
            seed_sample_data: default_seed_sample_data(),
            server: ServerConfig::default(),
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes: HashMap::new(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            new: default_new(),
            delete: default_delete(),
            toggle_task_status: default_toggle_task_status(),
            prioritize: default_prioritize(),
            summarize: default_summarize(),
            refresh: default_refresh(),
            help: default_help(),
            list_up: default_list_up(),
            list_down: default_list_down(),
            tab_left: default_tab_left(),
            tab_right: default_tab_right(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            highlight_fg: default_highlight_fg(),
            tab_bg: default_tab_bg(),
            accent: default_accent(),
        }
    }
}

impl Theme {
    fn preset(fg: &str, bg: &str, highlight_bg: &str, highlight_fg: &str, accent: &str) -> Self {
        Self {
            fg: fg.to_string(),
            bg: bg.to_string(),
            highlight_bg: highlight_bg.to_string(),
            highlight_fg: highlight_fg.to_string(),
            tab_bg: default_tab_bg(),
            accent: accent.to_string(),
        }
    }

    /// Get preset themes that are always available
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        let mut themes = HashMap::new();
        themes.insert("default".to_string(), Theme::default());
        themes.insert(
            "light".to_string(),
            Theme::preset("black", "white", "blue", "white", "magenta"),
        );
        themes.insert(
            "dark".to_string(),
            Theme::preset("white", "black", "cyan", "black", "magenta"),
        );
        themes.insert(
            "monochrome".to_string(),
            Theme::preset("white", "black", "white", "black", "white"),
        );
        themes
    }
}

// Default value functions
fn default_database_path() -> String {
    Config::data_path_for_profile(utils::Profile::Prod, "lifeos.db")
}

fn default_local_store_dir() -> String {
    Config::data_path_for_profile(utils::Profile::Prod, "local")
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    5
}

fn default_refresh_interval_secs() -> u64 {
    30
}

fn default_seed_sample_data() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_new() -> String {
    "n".to_string()
}

fn default_delete() -> String {
    "d".to_string()
}

fn default_toggle_task_status() -> String {
    "Space".to_string()
}

fn default_prioritize() -> String {
    "p".to_string()
}

fn default_summarize() -> String {
    "s".to_string()
}

fn default_refresh() -> String {
    "Ctrl+r".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_tab_left() -> String {
    "Left".to_string()
}

fn default_tab_right() -> String {
    "Right".to_string()
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_highlight_fg() -> String {
    "white".to_string()
}

fn default_tab_bg() -> String {
    "gray".to_string()
}

fn default_accent() -> String {
    "magenta".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Invalid value for {name}: {value}")]
    InvalidOverride { name: &'static str, value: String },
}

impl Config {
    /// Load configuration for a profile, or from an explicit file when one is given.
    /// A missing file is created with defaults. Environment overrides are applied
    /// afterwards and never written back.
    pub fn load_with_profile(
        profile: utils::Profile,
        path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::get_config_path(profile)?,
        };

        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            toml::from_str(&contents)?
        } else {
            let mut config = Config::default();
            config.database_path = Self::data_path_for_profile(profile, "lifeos.db");
            config.local_store_dir = Self::data_path_for_profile(profile, "local");
            config.save_to(&config_path)?;
            tracing::info!(path = %config_path.display(), "created default config");
            config
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply `LIFEOS_API_URL` and `PORT` from the given lookup
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidOverride {
                    name: PORT_ENV,
                    value: port.clone(),
                })?;
        }
        Ok(())
    }

    /// Save configuration to a file
    pub fn save_to(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string).map_err(|e| ConfigError::WriteError(e.to_string()))
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile).ok_or_else(|| {
            ConfigError::ConfigDirError("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("config.toml"))
    }

    fn data_path_for_profile(profile: utils::Profile, name: &str) -> String {
        match utils::get_data_dir(profile) {
            Some(data_dir) => data_dir.join(name).to_string_lossy().to_string(),
            None => format!("~/.local/share/{}/{}", profile.app_name(), name),
        }
    }

    /// Get the expanded database path (with ~ expansion)
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    pub fn get_local_store_dir(&self) -> PathBuf {
        utils::expand_path(&self.local_store_dir)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    /// Get the currently active theme
    /// If highlight_fg is empty, it is calculated from highlight_bg
    pub fn get_active_theme(&self) -> Theme {
        use crate::tui::widgets::color::{format_color_for_display, get_contrast_text_color, parse_color};

        let mut theme = self
            .themes
            .get(&self.current_theme)
            .cloned()
            .or_else(|| Theme::get_preset_themes().remove(&self.current_theme))
            .unwrap_or_default();

        if theme.highlight_fg.is_empty() {
            let highlight_bg_color = parse_color(&theme.highlight_bg);
            theme.highlight_fg = format_color_for_display(&get_contrast_text_color(highlight_bg_color));
        }

        theme
    }
}
