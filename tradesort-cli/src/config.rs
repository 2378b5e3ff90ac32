use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tradesort_report::ExportScope;

use crate::state::{ensure_tradesort_home, tradesort_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ingest: IngestSection,
    #[serde(default)]
    pub export: ExportSection,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSection {
    /// Per-file read limit in seconds; 0 waits forever.
    pub read_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub output_dir: String,
    pub all_filename: String,
    pub short_filename: String,
    pub long_filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// `tracing` filter directive; `RUST_LOG` wins when set.
    pub filter: String,
}

impl Default for IngestSection {
    fn default() -> Self {
        Self { read_timeout_secs: 30 }
    }
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            all_filename: ExportScope::All.default_filename().to_string(),
            short_filename: ExportScope::ShortTerm.default_filename().to_string(),
            long_filename: ExportScope::LongTerm.default_filename().to_string(),
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl IngestSection {
    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_secs > 0).then(|| Duration::from_secs(self.read_timeout_secs))
    }
}

impl ExportSection {
    pub fn filename(&self, scope: ExportScope) -> &str {
        match scope {
            ExportScope::All => &self.all_filename,
            ExportScope::ShortTerm => &self.short_filename,
            ExportScope::LongTerm => &self.long_filename,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(tradesort_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

/// Keep a load failure fatal unless `tolerate` is set. Then the defaults
/// stand in and the error comes back for the caller to report.
pub fn or_defaults(
    loaded: Result<Config>,
    tolerate: bool,
) -> Result<(Config, Option<anyhow::Error>)> {
    match loaded {
        Ok(cfg) => Ok((cfg, None)),
        Err(err) if tolerate => Ok((Config::default(), Some(err))),
        Err(err) => Err(err),
    }
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = ensure_tradesort_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let source = if p.exists() { "" } else { " (not written; defaults)" };
    println!("# {}{}", p.display(), source);
    print!("{}", toml::to_string_pretty(cfg).context("serialize config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str("[export]\noutput_dir = \"out\"\n").unwrap();
        assert_eq!(cfg.export.output_dir, "out");
        assert_eq!(cfg.export.filename(ExportScope::ShortTerm), "sorted_short_term.csv");
        assert_eq!(cfg.ingest, IngestSection::default());
        assert_eq!(cfg.log.filter, "info");
    }

    #[test]
    fn test_zero_timeout_disables_limit() {
        let cfg: Config = toml::from_str("[ingest]\nread_timeout_secs = 0\n").unwrap();
        assert_eq!(cfg.ingest.read_timeout(), None);
        assert_eq!(IngestSection::default().read_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_broken_file_only_tolerated_on_request() {
        let broken = || toml::from_str::<Config>("[ingest\n").map_err(anyhow::Error::from);

        let (cfg, err) = or_defaults(broken(), true).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(err.is_some());

        assert!(or_defaults(broken(), false).is_err());

        let (cfg, err) = or_defaults(Ok(Config::default()), false).unwrap();
        assert_eq!(cfg.log.filter, "info");
        assert!(err.is_none());
    }

    #[test]
    fn test_defaults_round_trip() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, Config::default());
    }
}
