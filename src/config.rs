use crate::domain::{TagPolicy, INCOMING_LABEL};
use crate::error::{ReleaseNotesError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = "releasenotes.toml";

/// File name looked up in the user config directory
pub const USER_CONFIG_FILE: &str = ".releasenotes.toml";

/// Default CSP sent with every served file. Reports go to `/csp-report`.
pub const DEFAULT_CONTENT_SECURITY_POLICY: &str = "default-src 'self'; script-src 'self'; style-src 'self'; font-src 'self'; img-src 'self'; frame-src 'self'; report-uri /csp-report";

/// Represents the complete configuration for release-notes.
///
/// Contains export defaults, the release tag policy, render paths and server settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub releases: ReleasesConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_num_commits() -> usize {
    10
}

fn default_data_file() -> String {
    "release_notes.json".to_string()
}

fn default_markdown() -> Option<String> {
    Some("RELEASE_NOTES.md".to_string())
}

fn default_incoming_label() -> String {
    INCOMING_LABEL.to_string()
}

fn default_out_dir() -> String {
    "site".to_string()
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_root() -> String {
    ".".to_string()
}

fn default_content_security_policy() -> String {
    DEFAULT_CONTENT_SECURITY_POLICY.to_string()
}

/// Settings for `export`: which history to read and where to write it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExportConfig {
    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_num_commits")]
    pub num_commits: usize,

    #[serde(default = "default_data_file")]
    pub output: String,

    /// Markdown output path; `None` disables markdown generation
    #[serde(default = "default_markdown")]
    pub markdown: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            branch: default_branch(),
            num_commits: default_num_commits(),
            output: default_data_file(),
            markdown: default_markdown(),
        }
    }
}

/// How tags turn into releases.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleasesConfig {
    #[serde(default)]
    pub tag_policy: TagPolicy,

    #[serde(default = "default_incoming_label")]
    pub incoming_label: String,
}

impl Default for ReleasesConfig {
    fn default() -> Self {
        ReleasesConfig {
            tag_policy: TagPolicy::default(),
            incoming_label: default_incoming_label(),
        }
    }
}

/// Settings for `render`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RenderConfig {
    #[serde(default = "default_data_file")]
    pub input: String,

    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            input: default_data_file(),
            out_dir: default_out_dir(),
        }
    }
}

/// Settings for `serve`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_root")]
    pub root: String,

    #[serde(default = "default_content_security_policy")]
    pub content_security_policy: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: default_bind(),
            root: default_root(),
            content_security_policy: default_content_security_policy(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `releasenotes.toml` in current directory
/// 3. `.releasenotes.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        fs::read_to_string(LOCAL_CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse a TOML configuration document
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| ReleaseNotesError::config(e.to_string()))
}
