//! Configuration to acknowledge developer preferences as well as set defaults.
//!
//! Specifically, we try to find an espalier.toml, and if present we load settings from there.
//! This provides the simulation cadence, force tuning, and source pane width.

use facet::Facet;
use std::fs;

#[derive(Facet, Clone)]
/// User preferences loaded from espalier.toml or falling back to defaults.
pub struct Config {
    #[facet(default = 50)]
    /// Milliseconds between simulation ticks while the layout is moving.
    pub tick_ms: usize,
    #[facet(default = 14.0)]
    /// Resting length of the springs joining parent and child circles.
    pub link_length: f64,
    #[facet(default = 600.0)]
    /// Strength of the inverse-square repulsion between circles.
    pub repulsion: f64,
    #[facet(default = 0.85)]
    /// Velocity kept after each tick; lower values settle faster.
    pub damping: f64,
    #[facet(default = 36)]
    /// Width of the source text pane in characters.
    pub source_width: usize,
}

impl Config {
    #[must_use]
    /// Load configuration from espalier.toml if present.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    pub fn load() -> Self {
        if let Ok(contents) = fs::read_to_string("espalier.toml") {
            if let Ok(config) = facet_toml::from_str::<Self>(&contents) {
                return config;
            }
        }
        facet_toml::from_str::<Self>("").unwrap()
    }
}
