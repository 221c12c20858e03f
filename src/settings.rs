use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Optional growth defaults read from the settings file. Every field is
/// optional; missing values fall through to the built-in defaults and an
/// unreadable file falls back to whatever was in effect before.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub plant: PlantSettings,
    #[serde(default)]
    pub berries: BerrySettings,
    #[serde(default)]
    pub leaves: LeafSettings,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct PlantSettings {
    pub segments: Option<u32>,
    pub variability: Option<u32>,
    pub branches: Option<u32>,
    pub line_width: Option<f32>,
    pub branch_probability: Option<f32>,
    pub probability_decay: Option<f32>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct BerrySettings {
    pub size: Option<f32>,
    pub max_per_segment: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LeafSettings {
    pub size: Option<f32>,
}

impl Settings {
    pub fn load() -> Self {
        read_file().unwrap_or_default()
    }

    /// Re-read the settings file, keeping `previous` when the file is
    /// missing or does not parse.
    pub fn reload_or(previous: &Settings) -> Settings {
        read_file().unwrap_or_else(|| previous.clone())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("plantart")
            .join("config.toml")
    }
}

fn read_file() -> Option<Settings> {
    let content = fs::read_to_string(Settings::config_path()).ok()?;
    parse(&content)
}

fn parse(content: &str) -> Option<Settings> {
    toml::from_str(content).ok()
}
