/// Sprite registry: every image the renderer may draw.
///
/// Sprites are small blocks of terminal glyphs plus a colour.  The registry
/// is built once at startup, either from the built-in set or from a TOML
/// sprite sheet, and handed to the `Renderer`.  A sheet that leaves any
/// sprite undefined is rejected, so lookups never fail afterwards.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crossterm::style::Color;
use log::{info, warn};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Player,
    Bullet,
    Squid,
    Squid2,
    Crab,
    Crab2,
    Octopus,
    Octopus2,
    Ufo,
    Death,
}

impl SpriteId {
    pub const ALL: [SpriteId; 10] = [
        SpriteId::Player,
        SpriteId::Bullet,
        SpriteId::Squid,
        SpriteId::Squid2,
        SpriteId::Crab,
        SpriteId::Crab2,
        SpriteId::Octopus,
        SpriteId::Octopus2,
        SpriteId::Ufo,
        SpriteId::Death,
    ];

    /// Table name used in sprite sheets.
    pub fn key(self) -> &'static str {
        match self {
            SpriteId::Player => "player",
            SpriteId::Bullet => "bullet",
            SpriteId::Squid => "squid",
            SpriteId::Squid2 => "squid2",
            SpriteId::Crab => "crab",
            SpriteId::Crab2 => "crab2",
            SpriteId::Octopus => "octopus",
            SpriteId::Octopus2 => "octopus2",
            SpriteId::Ufo => "ufo",
            SpriteId::Death => "death",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    /// One string per terminal row, top to bottom.
    pub rows: Vec<String>,
    pub color: Color,
}

impl Sprite {
    pub fn new(rows: &[&str], color: Color) -> Self {
        Self {
            rows: rows.iter().map(|r| r.to_string()).collect(),
            color,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("cannot read sprite sheet {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed sprite sheet: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("sprite sheet does not define `{0}`")]
    Missing(&'static str),
    #[error("sprite `{0}` has no glyph rows")]
    Empty(&'static str),
    #[error("sprite `{sprite}` uses unknown colour `{color}`")]
    UnknownColor { sprite: &'static str, color: String },
}

#[derive(Debug, Deserialize)]
struct SpriteSheet {
    sprites: HashMap<String, SpriteDef>,
}

#[derive(Debug, Deserialize)]
struct SpriteDef {
    glyphs: Vec<String>,
    #[serde(default = "default_color")]
    color: String,
}

fn default_color() -> String {
    "white".to_string()
}

/// Colour names accepted in sprite sheets.
pub fn parse_color(name: &str) -> Option<Color> {
    let color = match name.to_lowercase().replace(['-', ' '], "_").as_str() {
        "black" => Color::Black,
        "dark_grey" | "dark_gray" => Color::DarkGrey,
        "red" => Color::Red,
        "dark_red" => Color::DarkRed,
        "green" => Color::Green,
        "dark_green" => Color::DarkGreen,
        "yellow" => Color::Yellow,
        "dark_yellow" => Color::DarkYellow,
        "blue" => Color::Blue,
        "dark_blue" => Color::DarkBlue,
        "magenta" => Color::Magenta,
        "dark_magenta" => Color::DarkMagenta,
        "cyan" => Color::Cyan,
        "dark_cyan" => Color::DarkCyan,
        "white" => Color::White,
        "grey" | "gray" => Color::Grey,
        _ => return None,
    };
    Some(color)
}

/// Sprites indexed by `SpriteId`; complete by construction.
#[derive(Clone, Debug)]
pub struct SpriteRegistry {
    sprites: Vec<Sprite>,
}

impl SpriteRegistry {
    /// The glyph sprites shipped with the game.
    pub fn builtin() -> Self {
        let sprites = SpriteId::ALL
            .iter()
            .map(|&id| match id {
                SpriteId::Player => Sprite::new(&["/█\\"], Color::White),
                SpriteId::Bullet => Sprite::new(&["║"], Color::Cyan),
                SpriteId::Squid => Sprite::new(&["{@@}"], Color::Magenta),
                SpriteId::Squid2 => Sprite::new(&["/@@\\"], Color::Magenta),
                SpriteId::Crab => Sprite::new(&["/MM\\"], Color::Cyan),
                SpriteId::Crab2 => Sprite::new(&["|MM|"], Color::Cyan),
                SpriteId::Octopus => Sprite::new(&["<##>"], Color::Green),
                SpriteId::Octopus2 => Sprite::new(&["/##\\"], Color::Green),
                SpriteId::Ufo => Sprite::new(&["<=O=>"], Color::Red),
                SpriteId::Death => Sprite::new(&["\\**/"], Color::Yellow),
            })
            .collect();
        Self { sprites }
    }

    /// Parse a sprite sheet.  Every `SpriteId` must be defined.
    pub fn from_toml_str(text: &str) -> Result<Self, AssetError> {
        let mut sheet: SpriteSheet = toml::from_str(text)?;
        let mut sprites = Vec::with_capacity(SpriteId::ALL.len());
        for id in SpriteId::ALL {
            let def = sheet
                .sprites
                .remove(id.key())
                .ok_or(AssetError::Missing(id.key()))?;
            if def.glyphs.is_empty() {
                return Err(AssetError::Empty(id.key()));
            }
            let color = parse_color(&def.color).ok_or_else(|| AssetError::UnknownColor {
                sprite: id.key(),
                color: def.color.clone(),
            })?;
            sprites.push(Sprite {
                rows: def.glyphs,
                color,
            });
        }
        for name in sheet.sprites.keys() {
            warn!("ignoring unknown sprite `{}`", name);
        }
        Ok(Self { sprites })
    }

    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let text = fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_toml_str(&text)?;
        info!("loaded sprite sheet {}", path.display());
        Ok(registry)
    }

    pub fn get(&self, id: SpriteId) -> &Sprite {
        &self.sprites[id as usize]
    }
}

impl Default for SpriteRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
