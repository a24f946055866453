// Configuration management
// Loads the TOML config file, applies command-line overrides and builds game settings

use clap::Args;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::asw_field::{FieldRules, MAX_SIDE, MinePlacement};
use crate::asw_game::GameSettings;

pub const DEFAULT_ROWS: usize = 10;
pub const DEFAULT_COLS: usize = 10;
pub const DEFAULT_MINE_PERCENTAGE: u8 = 25;

/// User configuration, persisted to disk as TOML
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub rows: usize,
    pub cols: usize,
    pub mine_percentage: u8,
    pub placement: MinePlacement,
    pub flood_opens_flags: bool,
    pub unicode_glyphs: bool, // ■ ⚑ ☼ instead of . ! *
    pub language: String,     // "en" or "zh"

    // Only settable per run
    #[serde(skip)]
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        // Auto-detect system language on first run
        let system_lang = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
        let lang = if system_lang.to_lowercase().starts_with("zh") {
            "zh".to_string()
        } else {
            "en".to_string()
        };

        Config {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            mine_percentage: DEFAULT_MINE_PERCENTAGE,
            placement: MinePlacement::Lazy,
            flood_opens_flags: false,
            unicode_glyphs: false,
            language: lang,
            seed: None,
        }
    }
}

/// Command-line overrides, applied on top of the config file for this run only
#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Number of rows on the field (1-1024)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..=MAX_SIDE as i64))]
    pub rows: Option<u16>,

    /// Number of columns on the field (1-1024)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..=MAX_SIDE as i64))]
    pub cols: Option<u16>,

    /// Share of cells holding a mine, in percent
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub percent: Option<u8>,

    /// Force a seed instead of random
    #[arg(long)]
    pub seed: Option<u64>,

    /// Place mines before the first move (the first reveal may hit one)
    #[arg(long)]
    pub eager: bool,

    /// Let the flood fill open flagged cells
    #[arg(long)]
    pub flood_flags: bool,

    /// Use unicode glyphs for closed cells, flags and mines
    #[arg(long)]
    pub unicode: bool,

    /// Interface language ("en" or "zh")
    #[arg(long)]
    pub lang: Option<String>,
}

impl Config {
    /// Parse a config file body, missing keys take their defaults
    pub fn from_toml(s: &str) -> Result<Config, toml::de::Error> {
        toml::from_str::<Config>(s)
    }

    pub fn apply_overrides(&mut self, o: &Overrides) {
        if let Some(rows) = o.rows {
            self.rows = rows as usize;
        }
        if let Some(cols) = o.cols {
            self.cols = cols as usize;
        }
        if let Some(percent) = o.percent {
            self.mine_percentage = percent;
        }
        if o.seed.is_some() {
            self.seed = o.seed;
        }
        if o.eager {
            self.placement = MinePlacement::Eager;
        }
        if o.flood_flags {
            self.flood_opens_flags = true;
        }
        if o.unicode {
            self.unicode_glyphs = true;
        }
        if let Some(lang) = &o.lang {
            self.language = lang.clone();
        }
    }

    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            rows: self.rows,
            cols: self.cols,
            mine_percentage: self.mine_percentage,
            rules: FieldRules {
                placement: self.placement,
                flood_opens_flags: self.flood_opens_flags,
            },
        }
    }
}

/// Get the configuration file path
/// Uses platform-specific config directory (e.g., ~/.config/ansiswpr/ansiswpr.toml on Linux)
/// Falls back to current directory if ProjectDirs is unavailable
pub fn config_path() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let name = exe.file_stem().and_then(|s| s.to_str())?;
    match ProjectDirs::from("com", "xhbl", name) {
        Some(proj) => {
            let mut path = proj.config_dir().to_path_buf();
            path.push(format!("{}.toml", name));
            Some(path)
        }
        None => {
            let mut path = env::current_dir().ok()?;
            path.push(format!("{}.toml", name));
            Some(path)
        }
    }
}

/// Load configuration from disk, or create default if not found
/// A broken file is reported and replaced by defaults for this run, but left untouched on disk
pub fn load_or_create_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    if path.exists() {
        match fs::read_to_string(&path) {
            Ok(s) => match Config::from_toml(&s) {
                Ok(cfg) => return cfg,
                Err(e) => warn!(path = %path.display(), error = %e, "config unreadable, using defaults"),
            },
            Err(e) => warn!(path = %path.display(), error = %e, "config unreadable, using defaults"),
        }
        return Config::default();
    }

    let cfg = Config::default();
    save_config(&cfg, &path);
    cfg
}

fn save_config(cfg: &Config, path: &Path) {
    let s = match toml::to_string(cfg) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "could not serialize config");
            return;
        }
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Err(e) = fs::write(path, s) {
        warn!(path = %path.display(), error = %e, "could not write default config");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let cfg = Config::from_toml("rows = 16\nplacement = \"Eager\"\n").unwrap();
        assert_eq!(cfg.rows, 16);
        assert_eq!(cfg.cols, DEFAULT_COLS);
        assert_eq!(cfg.mine_percentage, DEFAULT_MINE_PERCENTAGE);
        assert_eq!(cfg.placement, MinePlacement::Eager);
        assert!(!cfg.flood_opens_flags);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut cfg = Config::default();
        cfg.cols = 30;
        cfg.flood_opens_flags = true;
        cfg.seed = Some(9);
        let s = toml::to_string(&cfg).unwrap();
        assert!(s.contains("placement = \"Lazy\""));
        assert!(!s.contains("seed"));
        let back = Config::from_toml(&s).unwrap();
        assert_eq!(back.cols, 30);
        assert!(back.flood_opens_flags);
        assert_eq!(back.seed, None);
    }

    #[test]
    fn bad_values_are_parse_errors() {
        assert!(Config::from_toml("mine_percentage = 300").is_err());
        assert!(Config::from_toml("rows = -2").is_err());
        assert!(Config::from_toml("placement = \"Later\"").is_err());
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut cfg = Config::default();
        let o = Overrides {
            rows: Some(5),
            percent: Some(0),
            seed: Some(3),
            eager: true,
            lang: Some("zh".to_string()),
            ..Overrides::default()
        };
        cfg.apply_overrides(&o);
        assert_eq!(cfg.rows, 5);
        assert_eq!(cfg.cols, DEFAULT_COLS);
        assert_eq!(cfg.mine_percentage, 0);
        assert_eq!(cfg.seed, Some(3));
        assert_eq!(cfg.language, "zh");

        let settings = cfg.game_settings();
        assert_eq!(settings.rows, 5);
        assert_eq!(settings.rules.placement, MinePlacement::Eager);
        assert!(!settings.rules.flood_opens_flags);
    }

    #[test]
    fn out_of_range_sizes_in_file_fail_game_setup() {
        use crate::asw_field::FieldError;
        use crate::asw_game::Game;
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        for body in ["rows = 0", "cols = 70000", "rows = 8589934592\ncols = 8589934592"] {
            let cfg = Config::from_toml(body).unwrap();
            assert!(matches!(
                Game::new(cfg.game_settings(), StdRng::seed_from_u64(1)),
                Err(FieldError::InvalidDimensions { .. })
            ));
        }
    }

    #[test]
    fn cli_sizes_are_bounded() {
        use clap::Parser;

        #[derive(Parser)]
        struct Cli {
            #[command(flatten)]
            overrides: Overrides,
        }

        let ok = Cli::try_parse_from(["ansiswpr", "-r", "1024", "-c", "3"]).unwrap();
        assert_eq!(ok.overrides.rows, Some(1024));
        assert!(Cli::try_parse_from(["ansiswpr", "-r", "1025"]).is_err());
        assert!(Cli::try_parse_from(["ansiswpr", "-c", "0"]).is_err());
        assert!(Cli::try_parse_from(["ansiswpr", "-p", "101"]).is_err());
    }
}
