use std::time::Duration;

use anyhow::{bail, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Configuration for the game.
///
/// Built once at startup and passed by reference into the engine and the
/// renderer; nothing mutates it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid in tiles
    pub grid_width: usize,
    /// Height of the game grid in tiles
    pub grid_height: usize,
    /// Edge length of one tile in canvas pixels
    pub tile_size: u32,

    /// Step time at full speed, in milliseconds
    pub min_step_ms: u64,
    /// Step time at zero speed, in milliseconds
    pub max_step_ms: u64,
    /// Speed scalar in [0, 1]; 1.0 maps to `min_step_ms`
    pub speed: f32,

    /// Interpolate segment positions between steps
    pub fluid: bool,

    // Colors
    pub background_color: Color,
    pub snake_color: Color,
    pub food_color: Color,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 30,
            tile_size: 4,
            min_step_ms: 100,
            max_step_ms: 500,
            speed: 1.0,
            fluid: true,
            background_color: Color::Rgb(100, 240, 100),
            snake_color: Color::Rgb(30, 30, 30),
            food_color: Color::Rgb(180, 50, 50),
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Duration of one simulation step. The speed scalar maps linearly onto
    /// the [min, max] step-time range, 1.0 being the fastest.
    pub fn step_time(&self) -> Duration {
        let speed = self.speed.clamp(0.0, 1.0);
        let range = self.max_step_ms.saturating_sub(self.min_step_ms) as f32;
        let ms = self.max_step_ms as f32 - range * speed;
        Duration::from_millis(ms as u64)
    }

    /// Total number of grid cells
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Pixel dimensions of the playing field
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.grid_width as u32 * self.tile_size,
            self.grid_height as u32 * self.tile_size,
        )
    }

    /// Reject configurations the engine cannot run on.
    ///
    /// A 1-wide or 1-tall grid would place the initial tail marker on the
    /// head tile itself, so at least 2x2 is required.
    pub fn validate(&self) -> Result<()> {
        if self.grid_width < 2 || self.grid_height < 2 {
            bail!(
                "grid must be at least 2x2, got {}x{}",
                self.grid_width,
                self.grid_height
            );
        }
        if self.tile_size == 0 {
            bail!("tile size must be at least 1 pixel");
        }
        if self.min_step_ms == 0 || self.min_step_ms > self.max_step_ms {
            bail!(
                "step time bounds must satisfy 0 < min <= max, got {}..{}",
                self.min_step_ms,
                self.max_step_ms
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 30);
        assert_eq!(config.grid_height, 30);
        assert_eq!(config.tile_size, 4);
        assert!(config.fluid);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 12);
        assert_eq!(config.cell_count(), 180);
        assert_eq!(config.pixel_size(), (60, 48));
    }

    #[test]
    fn test_step_time_mapping() {
        let mut config = GameConfig::default();

        config.speed = 1.0;
        assert_eq!(config.step_time(), Duration::from_millis(100));

        config.speed = 0.0;
        assert_eq!(config.step_time(), Duration::from_millis(500));

        config.speed = 0.5;
        assert_eq!(config.step_time(), Duration::from_millis(300));

        // Out-of-range scalars clamp instead of extrapolating
        config.speed = 7.5;
        assert_eq!(config.step_time(), Duration::from_millis(100));
        config.speed = -1.0;
        assert_eq!(config.step_time(), Duration::from_millis(500));
    }

    #[test]
    fn test_validate_rejects_degenerate_grids() {
        assert!(GameConfig::new(1, 10).validate().is_err());
        assert!(GameConfig::new(10, 1).validate().is_err());
        assert!(GameConfig::new(2, 2).validate().is_ok());

        let mut config = GameConfig::default();
        config.tile_size = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.min_step_ms = 600;
        assert!(config.validate().is_err());
    }
}
