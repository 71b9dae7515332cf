use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use crate::color::{ActivityPalettes, ContributionPalettes, Palette, check_color};
use crate::utils::NumberFormatOptions;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub palettes: PaletteConfig,
    pub grid: GridConfig,
    pub formatting: FormattingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PaletteConfig {
    pub typing: Palette,
    pub active: Palette,
    #[serde(deserialize_with = "deserialize_color")]
    pub idle: String,
    pub contribution: Palette,
    #[serde(deserialize_with = "deserialize_color")]
    pub contribution_empty: String,
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    check_color(&value).map_err(serde::de::Error::custom)?;
    Ok(value)
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GridConfig {
    pub rolling_days: u32,
    pub bucket_minutes: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct FormattingConfig {
    pub number_comma: bool,
    pub locale: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        let activity = ActivityPalettes::default();
        let contributions = ContributionPalettes::default();
        Self {
            typing: activity.typing,
            active: activity.active,
            idle: activity.idle,
            contribution: contributions.levels,
            contribution_empty: contributions.empty,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rolling_days: 90,
            bucket_minutes: 15,
        }
    }
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            number_comma: false,
            locale: "en".to_string(),
        }
    }
}

impl PaletteConfig {
    pub fn activity(&self) -> ActivityPalettes {
        ActivityPalettes {
            typing: self.typing.clone(),
            active: self.active.clone(),
            idle: self.idle.clone(),
        }
    }

    pub fn contributions(&self) -> ContributionPalettes {
        ContributionPalettes {
            levels: self.contribution.clone(),
            empty: self.contribution_empty.clone(),
        }
    }
}

impl FormattingConfig {
    pub fn number_options(&self) -> NumberFormatOptions {
        NumberFormatOptions {
            use_comma: self.number_comma,
            locale: self.locale.clone(),
        }
    }
}

thread_local! {
    static TEST_CONFIG_PATH: RefCell<Option<PathBuf>> = const { RefCell::new(None) };
}

#[cfg(test)]
pub fn set_test_config_path(path: PathBuf) {
    TEST_CONFIG_PATH.with(|p| *p.borrow_mut() = Some(path));
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(test)]
        {
            if let Some(path) = TEST_CONFIG_PATH.with(|p| p.borrow().clone()) {
                return Ok(path);
            }
        }

        Ok(dirs::home_dir()
            .context("Could not find home directory")?
            .join(".heatgrid.toml"))
    }

    pub fn load() -> Result<Option<Config>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(Some(config))
    }

    pub fn save(&self, silent: bool) -> Result<()> {
        let config_path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, content).context("Failed to write config file")?;

        if !silent {
            println!("Configuration saved to: {}", config_path.display());
        }

        Ok(())
    }
}

fn parse_palette(value: &str) -> Result<Palette> {
    let colors = value
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect();
    Palette::new(colors).context("Invalid palette. Use comma-separated colours")
}

fn parse_color(value: &str) -> Result<String> {
    let value = value.trim();
    check_color(value)?;
    Ok(value.to_string())
}

fn parse_bool(value: &str) -> Result<bool> {
    value
        .parse::<bool>()
        .context("Invalid boolean value. Use 'true' or 'false'")
}

// CLI helper functions
pub fn create_default_config(overwrite: bool) -> Result<()> {
    let config = Config::default();
    if !std::fs::exists(Config::config_path()?)? || overwrite {
        config.save(true)?;

        println!("Created default configuration file:");
        println!("   {}", Config::config_path()?.display());
    } else {
        println!("Configuration already exists.  Pass `--overwrite` to overwrite.");
    }

    Ok(())
}

pub fn show_config() -> Result<()> {
    match Config::load()? {
        Some(config) => {
            let p = &config.palettes;
            println!("Current configuration:");
            println!("   Typing Palette: {}", p.typing.colors().join(", "));
            println!("   Active Palette: {}", p.active.colors().join(", "));
            println!("   Idle Color: {}", p.idle);
            println!(
                "   Contribution Palette: {}",
                p.contribution.colors().join(", ")
            );
            println!("   Contribution Empty: {}", p.contribution_empty);
            println!("   Rolling Days: {}", config.grid.rolling_days);
            println!("   Bucket Minutes: {}", config.grid.bucket_minutes);
            println!("   Number Comma: {}", config.formatting.number_comma);
            println!("   Locale: {}", config.formatting.locale);
        }
        None => {
            println!("No configuration file found.");
            println!("   Run 'heatgrid config init' to create one.");
        }
    }
    Ok(())
}

pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?.unwrap_or_default();

    match key {
        "typing-palette" => config.palettes.typing = parse_palette(value)?,
        "active-palette" => config.palettes.active = parse_palette(value)?,
        "contribution-palette" => config.palettes.contribution = parse_palette(value)?,
        "idle-color" => config.palettes.idle = parse_color(value)?,
        "contribution-empty" => config.palettes.contribution_empty = parse_color(value)?,
        "rolling-days" => {
            config.grid.rolling_days = value.parse::<u32>().context("Invalid number value")?;
        }
        "bucket-minutes" => {
            let minutes = value.parse::<u32>().context("Invalid number value")?;
            if minutes == 0 {
                anyhow::bail!("bucket-minutes must be greater than zero");
            }
            config.grid.bucket_minutes = minutes;
        }
        "number-comma" => config.formatting.number_comma = parse_bool(value)?,
        "locale" => config.formatting.locale = value.to_string(),
        _ => anyhow::bail!("Unknown config key: {}", key),
    }

    config.save(false)?;
    Ok(())
}
