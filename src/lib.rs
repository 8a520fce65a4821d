//! dsdviz - Domain-level strand notation visualiser
//!
//! This crate provides:
//! - A tokeniser and parser for strand notation (`a b( c ) d( e + f )`)
//! - A 2D layout engine that places domains on lines and circles
//! - An SVG renderer for laid-out complexes
//! - A REST API and demo page that run the whole pipeline
//! - A client that submits input to the API and keeps a view up to date

pub mod lex;
pub mod complex;
pub mod parse;
pub mod geometry;
pub mod render;
pub mod pipeline;
pub mod client;
pub mod api;

pub use client::{HttpBackend, MemoryView, RunBackend, RunClient, View};
pub use complex::{Chain, Domain, Hairpin, Node, SplitComplex};
pub use pipeline::RunResponse;

use std::path::Path;

/// Configuration for the dsdviz system
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Geometry settings
    #[serde(default)]
    pub layout: LayoutConfig,

    /// SVG output settings
    #[serde(default)]
    pub render: RenderConfig,
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        use anyhow::Context;

        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// HTTP server settings
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Geometry settings
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct LayoutConfig {
    /// Length of every domain
    #[serde(default = "default_domain_length")]
    pub domain_length: f64,

    /// Distance between a bound domain and its complement
    #[serde(default = "default_bound_gap")]
    pub bound_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            domain_length: default_domain_length(),
            bound_gap: default_bound_gap(),
        }
    }
}

fn default_domain_length() -> f64 { 50.0 }
fn default_bound_gap() -> f64 { 5.0 }

/// SVG output settings
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct RenderConfig {
    /// Where the first domain starts
    #[serde(default = "default_origin")]
    pub origin_x: f64,
    #[serde(default = "default_origin")]
    pub origin_y: f64,

    /// Padding around the drawing
    #[serde(default = "default_margin")]
    pub margin: f64,

    /// Stroke colour for domains
    #[serde(default = "default_stroke")]
    pub stroke: String,

    /// Stroke colour for complement domains
    #[serde(default = "default_complement_stroke")]
    pub complement_stroke: String,

    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,

    /// Draw domain names next to each domain
    #[serde(default = "default_labels")]
    pub labels: bool,

    #[serde(default = "default_font_size")]
    pub font_size: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            origin_x: default_origin(),
            origin_y: default_origin(),
            margin: default_margin(),
            stroke: default_stroke(),
            complement_stroke: default_complement_stroke(),
            stroke_width: default_stroke_width(),
            labels: default_labels(),
            font_size: default_font_size(),
        }
    }
}

fn default_origin() -> f64 { 100.0 }
fn default_margin() -> f64 { 20.0 }
fn default_stroke() -> String { "red".to_string() }
fn default_complement_stroke() -> String { "blue".to_string() }
fn default_stroke_width() -> f64 { 2.0 }
fn default_labels() -> bool { true }
fn default_font_size() -> f64 { 10.0 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.layout, LayoutConfig::default());
        assert_eq!(config.render.stroke, "red");
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 9000

            [layout]
            bound_gap = 8.0

            [render]
            labels = false
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.layout.domain_length, 50.0);
        assert_eq!(config.layout.bound_gap, 8.0);
        assert!(!config.render.labels);
        assert_eq!(config.render.margin, 20.0);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/dsdviz.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
