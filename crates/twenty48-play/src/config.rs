use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use twenty48_core::TerminalRule;

#[derive(Clone, Debug, PartialEq, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base RNG seed. Fresh entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// `board_full` (default) or `no_moves`.
    #[serde(default)]
    pub terminal_rule: TerminalRule,

    #[serde(default)]
    pub autoplay: Autoplay,
    #[serde(default)]
    pub report: Report,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Autoplay {
    #[serde(default = "defaults::games")]
    pub games: u32,
    /// Stop a game after this many accepted moves even if it is not over.
    #[serde(default = "defaults::max_moves")]
    pub max_moves: u64,
    /// Worker threads for parallel games (defaults to Rayon default).
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Default for Autoplay {
    fn default() -> Self {
        Self {
            games: defaults::games(),
            max_moves: defaults::max_moves(),
            workers: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Report {
    /// Per-game summaries are written here as JSON lines.
    #[serde(default)]
    pub results_file: Option<PathBuf>,
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = std::fs::File::open(path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(cfg)
    }

    /// Load `path` when given, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_toml(p),
            None => Ok(Self::default()),
        }
    }
}

mod defaults {
    pub fn games() -> u32 { 100 }
    pub fn max_moves() -> u64 { 100_000 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(text: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(text.as_bytes()).unwrap();
        f
    }

    #[test]
    fn full_config() {
        let f = write_config(
            r#"
            seed = 42
            terminal_rule = "no_moves"

            [autoplay]
            games = 8
            max_moves = 500
            workers = 2

            [report]
            results_file = "out/results.jsonl"
            "#,
        );
        let cfg = Config::from_toml(f.path()).unwrap();
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.terminal_rule, TerminalRule::NoMoves);
        assert_eq!(
            cfg.autoplay,
            Autoplay { games: 8, max_moves: 500, workers: Some(2) }
        );
        assert_eq!(
            cfg.report.results_file.as_deref(),
            Some(Path::new("out/results.jsonl"))
        );
    }

    #[test]
    fn empty_config_uses_defaults() {
        let f = write_config("");
        let cfg = Config::from_toml(f.path()).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.terminal_rule, TerminalRule::BoardFull);
        assert_eq!(cfg.autoplay.games, 100);
        assert_eq!(cfg.autoplay.max_moves, 100_000);
        assert_eq!(Config::load(None).unwrap(), cfg);
    }

    #[test]
    fn rejects_unknown_rule() {
        let f = write_config("terminal_rule = \"whenever\"\n");
        assert!(Config::from_toml(f.path()).is_err());
        let f = write_config("[autoplay]\ngame = 3\n");
        assert!(Config::from_toml(f.path()).is_err());
    }

    #[test]
    fn missing_file_names_path() {
        let err = Config::from_toml("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
