//! Configuration management for the visualization pipeline

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::filter::FilterCriteria;
use crate::viz::{NetworkOptions, NodeStyle};

/// Settings for a render run. Missing fields in a config file fall back to
/// the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Node table (`id,label,category,k_core`)
    pub nodes_path: PathBuf,

    /// Edge table (`source,target`)
    pub edges_path: PathBuf,

    /// Where the HTML page is written
    pub output_path: PathBuf,

    /// Nodes with a k-core strictly above this value are kept
    pub threshold: f64,

    /// Substring of `category` that forces a node to be kept
    pub category_tag: String,

    /// Node color when the category contains the tag
    pub highlight_color: String,

    /// Node color otherwise
    pub default_color: String,

    /// Canvas height (CSS length)
    pub height: String,

    /// Canvas width (CSS length)
    pub width: String,

    pub background_color: String,

    pub font_color: String,

    /// Script URL for the vis-network bundle
    pub vis_cdn_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nodes_path: PathBuf::from("nodes.csv"),
            edges_path: PathBuf::from("edges.csv"),
            output_path: PathBuf::from("graph.html"),
            threshold: 5.0,
            category_tag: "Botnet".to_string(),
            highlight_color: "red".to_string(),
            default_color: "skyblue".to_string(),
            height: "750px".to_string(),
            width: "100%".to_string(),
            background_color: "#222222".to_string(),
            font_color: "white".to_string(),
            vis_cdn_url: "https://unpkg.com/vis-network@9.1.2/standalone/umd/vis-network.min.js"
                .to_string(),
        }
    }
}

impl Config {
    /// Load a JSON config file. The result is validated before it is returned.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }

        let paths = [
            ("nodes_path", &self.nodes_path),
            ("edges_path", &self.edges_path),
            ("output_path", &self.output_path),
        ];
        for (field, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyValue { field });
            }
        }

        // An empty tag would match every category.
        let strings = [
            ("category_tag", &self.category_tag),
            ("highlight_color", &self.highlight_color),
            ("default_color", &self.default_color),
            ("height", &self.height),
            ("width", &self.width),
            ("background_color", &self.background_color),
            ("font_color", &self.font_color),
            ("vis_cdn_url", &self.vis_cdn_url),
        ];
        for (field, value) in strings {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyValue { field });
            }
        }

        Ok(())
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(self.threshold, self.category_tag.clone())
    }

    pub fn node_style(&self) -> NodeStyle {
        NodeStyle {
            category_tag: self.category_tag.clone(),
            highlight_color: self.highlight_color.clone(),
            default_color: self.default_color.clone(),
        }
    }

    pub fn network_options(&self) -> NetworkOptions {
        NetworkOptions {
            height: self.height.clone(),
            width: self.width.clone(),
            background_color: self.background_color.clone(),
            font_color: self.font_color.clone(),
            vis_cdn_url: self.vis_cdn_url.clone(),
            ..NetworkOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.threshold, 5.0);
        assert_eq!(config.category_tag, "Botnet");
        assert_eq!(config.output_path, PathBuf::from("graph.html"));
    }

    #[test]
    fn rejects_non_finite_threshold() {
        let config = Config {
            threshold: f64::NAN,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn rejects_empty_tag() {
        let config = Config {
            category_tag: String::new(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyValue { field: "category_tag" })
        ));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"threshold": 3, "highlight_color": "orange"}}"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.threshold, 3.0);
        assert_eq!(config.highlight_color, "orange");
        assert_eq!(config.default_color, "skyblue");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"threshold": "high"}}"#).unwrap();

        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
