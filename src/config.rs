use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::{info, warn};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::direction::Direction;
use crate::snake::{Position, Snake, SnakeError};

const APP_DIR_NAME: &str = "arena-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Grid unit in arena pixels.
pub const DEFAULT_CELL_SIZE: i32 = 10;

/// Wall thickness in arena pixels.
pub const DEFAULT_WALL_THICKNESS: i32 = 10;

pub const DEFAULT_ARENA_WIDTH: i32 = 480;

pub const DEFAULT_ARENA_HEIGHT: i32 = 320;

/// Largest interior, in cells, accepted along either axis.
pub const MAX_GRID_CELLS: i32 = 1024;

/// Base tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 200;

/// Walled rectangle the snake lives in. Immutable for a session.
///
/// The playable interior on each axis spans `wall_thickness` up to and
/// including `dimension - wall_thickness - cell_size`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Arena {
    pub width: i32,
    pub height: i32,
    pub wall_thickness: i32,
    pub cell_size: i32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: DEFAULT_ARENA_WIDTH,
            height: DEFAULT_ARENA_HEIGHT,
            wall_thickness: DEFAULT_WALL_THICKNESS,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl Arena {
    #[must_use]
    pub fn min_x(self) -> i32 {
        self.wall_thickness
    }

    #[must_use]
    pub fn max_x(self) -> i32 {
        self.width
            .saturating_sub(self.wall_thickness)
            .saturating_sub(self.cell_size)
    }

    #[must_use]
    pub fn min_y(self) -> i32 {
        self.wall_thickness
    }

    #[must_use]
    pub fn max_y(self) -> i32 {
        self.height
            .saturating_sub(self.wall_thickness)
            .saturating_sub(self.cell_size)
    }

    /// Returns true when `position` lies inside the playable interior.
    #[must_use]
    pub fn in_interior(self, position: Position) -> bool {
        position.x >= self.min_x()
            && position.x <= self.max_x()
            && position.y >= self.min_y()
            && position.y <= self.max_y()
    }

    /// Returns true when `position` sits on the cell grid.
    #[must_use]
    pub fn is_aligned(self, position: Position) -> bool {
        let offset = self.wall_thickness.rem_euclid(self.cell_size);
        position.x.rem_euclid(self.cell_size) == offset
            && position.y.rem_euclid(self.cell_size) == offset
    }

    /// Iterates over every interior cell, column by column.
    pub fn interior_cells(self) -> impl Iterator<Item = Position> {
        let step = usize::try_from(self.cell_size).unwrap_or(1).max(1);
        (self.min_x()..=self.max_x()).step_by(step).flat_map(move |x| {
            (self.min_y()..=self.max_y())
                .step_by(step)
                .map(move |y| Position { x, y })
        })
    }

    /// Arena center, used to place outcome text.
    #[must_use]
    pub fn center(self) -> Position {
        Position {
            x: self.width / 2,
            y: self.height / 2,
        }
    }
}

/// Key name to direction table consumed by the input adapter.
///
/// Names follow the browser `KeyboardEvent.key` spelling for special keys
/// (`ArrowUp`, `Enter`, ...) and the literal character otherwise.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings(pub BTreeMap<String, Direction>);

impl Default for KeyBindings {
    fn default() -> Self {
        Self(BTreeMap::from([
            ("ArrowRight".to_owned(), Direction::Right),
            ("ArrowLeft".to_owned(), Direction::Left),
            ("ArrowDown".to_owned(), Direction::Down),
            ("ArrowUp".to_owned(), Direction::Up),
        ]))
    }
}

impl KeyBindings {
    #[must_use]
    pub fn lookup(&self, key_name: &str) -> Option<Direction> {
        self.0.get(key_name).copied()
    }
}

/// Colour names or `#rrggbb` values for each paint.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub wall: String,
    pub snake_head: String,
    pub snake_body: String,
    pub food: String,
    pub text: String,
    pub background: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            wall: "red".to_owned(),
            snake_head: "#f48126".to_owned(),
            snake_body: "#87ceeb".to_owned(),
            food: "#40da4c".to_owned(),
            text: "green".to_owned(),
            background: "black".to_owned(),
        }
    }
}

/// Resolved colours used by the terminal renderer.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Theme {
    pub wall: Color,
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub text: Color,
    pub background: Color,
}

impl ThemeConfig {
    /// Parses every colour, naming the first field that fails.
    pub fn resolve(&self) -> Result<Theme, ConfigError> {
        Ok(Theme {
            wall: parse_color("wall", &self.wall)?,
            snake_head: parse_color("snake_head", &self.snake_head)?,
            snake_body: parse_color("snake_body", &self.snake_body)?,
            food: parse_color("food", &self.food)?,
            text: parse_color("text", &self.text)?,
            background: parse_color("background", &self.background)?,
        })
    }
}

fn parse_color(field: &'static str, value: &str) -> Result<Color, ConfigError> {
    Color::from_str(value).map_err(|_| ConfigError::InvalidColor {
        field,
        value: value.to_owned(),
    })
}

/// Everything needed to (re)start a session.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub cell_size: i32,
    pub wall_thickness: i32,
    pub arena_width: i32,
    pub arena_height: i32,
    pub tick_period_ms: u64,
    /// Head first.
    pub initial_body: Vec<Position>,
    pub keys: KeyBindings,
    /// Fixed food RNG seed for reproducible sessions.
    pub seed: Option<u64>,
    pub theme: ThemeConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            wall_thickness: DEFAULT_WALL_THICKNESS,
            arena_width: DEFAULT_ARENA_WIDTH,
            arena_height: DEFAULT_ARENA_HEIGHT,
            tick_period_ms: DEFAULT_TICK_INTERVAL_MS,
            initial_body: vec![Position { x: 230, y: 130 }, Position { x: 230, y: 140 }],
            keys: KeyBindings::default(),
            seed: None,
            theme: ThemeConfig::default(),
        }
    }
}

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(i32),
    #[error("wall thickness must not be negative, got {0}")]
    InvalidWallThickness(i32),
    #[error("arena {width}x{height} has no room for a single interior cell")]
    ArenaTooSmall { width: i32, height: i32 },
    #[error("arena {width}x{height} exceeds {MAX_GRID_CELLS} interior cells per axis")]
    ArenaTooLarge { width: i32, height: i32 },
    #[error("wall thickness {wall_thickness} is not a multiple of the {cell_size}-unit cell")]
    UnalignedWall {
        wall_thickness: i32,
        cell_size: i32,
    },
    #[error("arena interior is not a whole number of {cell_size}-unit cells")]
    UnalignedArena { cell_size: i32 },
    #[error("tick period must be at least 1 ms")]
    ZeroTickPeriod,
    #[error("invalid initial snake: {0}")]
    InitialBody(#[from] SnakeError),
    #[error("invalid colour {value:?} for theme.{field}")]
    InvalidColor { field: &'static str, value: String },
}

impl GameConfig {
    #[must_use]
    pub fn arena(&self) -> Arena {
        Arena {
            width: self.arena_width,
            height: self.arena_height,
            wall_thickness: self.wall_thickness,
            cell_size: self.cell_size,
        }
    }

    #[must_use]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Builds the starting snake from `initial_body`.
    pub fn initial_snake(&self) -> Result<Snake, SnakeError> {
        Snake::new(self.initial_body.clone(), &self.arena())
    }

    /// Checks the geometry, timing, initial snake and colours.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size <= 0 {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if self.wall_thickness < 0 {
            return Err(ConfigError::InvalidWallThickness(self.wall_thickness));
        }

        if self.wall_thickness % self.cell_size != 0 {
            return Err(ConfigError::UnalignedWall {
                wall_thickness: self.wall_thickness,
                cell_size: self.cell_size,
            });
        }

        let interior = |dimension: i32| {
            self.wall_thickness
                .checked_mul(2)
                .and_then(|walls| dimension.checked_sub(walls))
                .filter(|span| *span >= self.cell_size)
        };
        let (Some(interior_width), Some(interior_height)) =
            (interior(self.arena_width), interior(self.arena_height))
        else {
            return Err(ConfigError::ArenaTooSmall {
                width: self.arena_width,
                height: self.arena_height,
            });
        };
        if interior_width % self.cell_size != 0 || interior_height % self.cell_size != 0 {
            return Err(ConfigError::UnalignedArena {
                cell_size: self.cell_size,
            });
        }
        if interior_width / self.cell_size > MAX_GRID_CELLS
            || interior_height / self.cell_size > MAX_GRID_CELLS
        {
            return Err(ConfigError::ArenaTooLarge {
                width: self.arena_width,
                height: self.arena_height,
            });
        }

        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }

        let _ = self.initial_snake()?;
        let _ = self.theme.resolve()?;
        Ok(())
    }
}

/// Returns the platform-correct default config path.
#[must_use]
pub fn default_config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}

/// Loads and validates the session configuration.
///
/// An explicit path must exist. Without one, the default path is tried and a
/// missing file yields the built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<GameConfig, ConfigError> {
    let config = match explicit {
        Some(path) => read_config(path)?,
        None => {
            let path = default_config_path();
            match read_config(&path) {
                Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                    info!("no config at {}, using defaults", path.display());
                    GameConfig::default()
                }
                other => other?,
            }
        }
    };

    config.validate()?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse_config(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!("loaded config from {}", path.display());
    if config.keys.0.is_empty() {
        warn!("config at {} binds no direction keys", path.display());
    }
    Ok(config)
}

/// Parses a (possibly partial) JSON configuration over the defaults.
pub fn parse_config(raw: &str) -> Result<GameConfig, serde_json::Error> {
    serde_json::from_str(raw)
}
