use serde::{Deserialize, Serialize};

use crate::export::MAX_IMAGE_DIMENSION;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Pixels moved by one directional pan button press.
    pub pan_step: f64,
    /// Scale factor of the zoom-in button.
    pub zoom_in: f64,
    /// Scale factor of the zoom-out button.
    pub zoom_out: f64,
    /// Scale factor for a scroll step toward the user (delta_y < 0).
    pub scroll_zoom_in: f64,
    /// Scale factor for any other scroll step.
    pub scroll_zoom_out: f64,
    /// Samples evaluated across the visible range per curve.
    pub samples: usize,
    /// Compiled expressions kept in memory.
    pub cache_capacity: usize,
    pub show_minor_grid: bool,
    pub dark_mode: bool,
    /// Size in pixels of exported images.
    pub width: u32,
    pub height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pan_step: 30.0,
            zoom_in: 1.2,
            zoom_out: 0.8,
            scroll_zoom_in: 1.1,
            scroll_zoom_out: 0.9,
            samples: 400,
            cache_capacity: 64,
            show_minor_grid: true,
            dark_mode: false,
            width: 800,
            height: 600,
        }
    }
}

impl Config {
    /// Replace out-of-range values with their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Config::default();

        if !self.pan_step.is_finite() {
            log::warn!("config: pan_step {} is not finite, using {}", self.pan_step, defaults.pan_step);
            self.pan_step = defaults.pan_step;
        }
        for (name, value, fallback) in [
            ("zoom_in", &mut self.zoom_in, defaults.zoom_in),
            ("zoom_out", &mut self.zoom_out, defaults.zoom_out),
            ("scroll_zoom_in", &mut self.scroll_zoom_in, defaults.scroll_zoom_in),
            ("scroll_zoom_out", &mut self.scroll_zoom_out, defaults.scroll_zoom_out),
        ] {
            if !value.is_finite() || *value <= 0.0 {
                log::warn!("config: {} must be positive, got {}, using {}", name, value, fallback);
                *value = fallback;
            }
        }
        if self.samples < 2 {
            log::warn!("config: samples must be at least 2, got {}, using {}", self.samples, defaults.samples);
            self.samples = defaults.samples;
        }
        if self.cache_capacity == 0 {
            log::warn!("config: cache_capacity must be nonzero, using {}", defaults.cache_capacity);
            self.cache_capacity = defaults.cache_capacity;
        }
        let fits = |side: u32| side > 0 && side <= MAX_IMAGE_DIMENSION;
        if !fits(self.width) || !fits(self.height) {
            log::warn!(
                "config: image size {}x{} is out of range, using {}x{}",
                self.width,
                self.height,
                defaults.width,
                defaults.height
            );
            self.width = defaults.width;
            self.height = defaults.height;
        }
        self
    }
}

/// Path to the config file.
pub fn config_path() -> Option<PathBuf> {
    Some(super::config_dir()?.join("config.toml"))
}

/// Parse config text. Missing keys take their defaults.
pub fn parse_config(content: &str) -> Result<Config, String> {
    toml::from_str::<Config>(content)
        .map(Config::sanitized)
        .map_err(|e| format!("config parse: {}", e))
}

/// Load config from disk, returning defaults if file doesn't exist or is invalid.
pub fn load_config() -> Config {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Config::default(),
    }
}

/// Load config from `path`, writing a commented default file if it is missing.
pub fn load_config_from(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|e| {
            log::warn!("{}: {}, using defaults", path.display(), e);
            Config::default()
        }),
        Err(_) => {
            // Create default config file on first run
            let config = Config::default();
            if let Err(e) = write_default_config(path, &config) {
                log::debug!("{}: {}", path.display(), e);
            }
            config
        }
    }
}

/// Write a default config file with comments.
fn write_default_config(path: &Path, config: &Config) -> Result<(), String> {
    let content = format!(
        "# graphcalc configuration\n\
         \n\
         # Pixels moved by one pan button press\n\
         pan_step = {:?}\n\
         \n\
         # Zoom button factors (> 1 zooms in)\n\
         zoom_in = {:?}\n\
         zoom_out = {:?}\n\
         \n\
         # Scroll wheel factors: scroll_zoom_in applies when scrolling up\n\
         scroll_zoom_in = {:?}\n\
         scroll_zoom_out = {:?}\n\
         \n\
         # Samples per curve across the visible x-range\n\
         samples = {}\n\
         \n\
         # Compiled expressions kept in memory\n\
         cache_capacity = {}\n\
         \n\
         # Initial display toggles\n\
         show_minor_grid = {}\n\
         dark_mode = {}\n\
         \n\
         # Exported image size in pixels\n\
         width = {}\n\
         height = {}\n",
        config.pan_step,
        config.zoom_in,
        config.zoom_out,
        config.scroll_zoom_in,
        config.scroll_zoom_out,
        config.samples,
        config.cache_capacity,
        config.show_minor_grid,
        config.dark_mode,
        config.width,
        config.height,
    );
    std::fs::write(path, content.as_bytes()).map_err(|e| format!("write error: {}", e))
}
