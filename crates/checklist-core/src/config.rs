use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tracing::{debug, info, trace, warn};

use crate::view::FilterMode;

pub const DEFAULT_SERVICE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_LIST_LIMIT: u32 = 4;

/// Flat key=value configuration with baked-in defaults, an optional rc file,
/// and CLI overrides applied last.
#[derive(Debug, Clone)]
pub struct Config {
    map: HashMap<String, String>,
    pub loaded_files: Vec<PathBuf>,
}

impl Config {
    #[tracing::instrument(skip(rcfile_override))]
    pub fn load(rcfile_override: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg = Config {
            map: HashMap::new(),
            loaded_files: vec![],
        };

        cfg.map.insert(
            "service.url".to_string(),
            DEFAULT_SERVICE_URL.to_string(),
        );
        cfg.map.insert(
            "service.limit".to_string(),
            DEFAULT_LIST_LIMIT.to_string(),
        );
        cfg.map
            .insert("default.filter".to_string(), "all".to_string());
        cfg.map.insert("color".to_string(), "on".to_string());

        if let Some(path) = resolve_rcfile_path(rcfile_override)? {
            info!(rcfile = %path.display(), "loading rc file");
            cfg.load_file(&path)?;
        } else {
            debug!("no rc file found; using defaults");
        }

        Ok(cfg)
    }

    #[tracing::instrument(skip(self, overrides))]
    pub fn apply_overrides<I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (k, v) in overrides {
            let key = k.strip_prefix("rc.").unwrap_or(&k).to_string();
            debug!(key = %key, value = %v, "applying override");
            self.map.insert(key, v);
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    #[tracing::instrument(skip(self))]
    fn load_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        self.loaded_files.push(path.to_path_buf());

        for (line_num, raw_line) in text.lines().enumerate() {
            let mut line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((before, _)) = line.split_once('#') {
                line = before.trim();
            }
            if line.is_empty() {
                continue;
            }

            let (k, v) = line.split_once('=').ok_or_else(|| {
                anyhow!(
                    "invalid config line {}:{}: {}",
                    path.display(),
                    line_num + 1,
                    raw_line
                )
            })?;

            let key = k.trim().to_string();
            let value = v.trim().to_string();
            trace!(key = %key, value = %value, "loaded config key");
            self.map.insert(key, value);
        }

        Ok(())
    }
}

/// CLI flag wins, then the config key, then the baked-in default.
pub fn resolve_base_url(cfg: &Config, cli_url: Option<&str>) -> String {
    let url = cli_url
        .map(|u| u.to_string())
        .or_else(|| cfg.get("service.url"))
        .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());
    url.trim_end_matches('/').to_string()
}

pub fn resolve_limit(cfg: &Config, cli_limit: Option<u32>) -> u32 {
    if let Some(limit) = cli_limit {
        return limit;
    }
    match cfg.get("service.limit") {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(value = %raw, "invalid service.limit; using default");
            DEFAULT_LIST_LIMIT
        }),
        None => DEFAULT_LIST_LIMIT,
    }
}

pub fn resolve_filter(cfg: &Config, cli_filter: Option<FilterMode>) -> anyhow::Result<FilterMode> {
    if let Some(mode) = cli_filter {
        return Ok(mode);
    }
    match cfg.get("default.filter") {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid default.filter: {raw}")),
        None => Ok(FilterMode::All),
    }
}

#[tracing::instrument(skip(override_path))]
fn resolve_rcfile_path(override_path: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = override_path {
        return Ok(Some(path.to_path_buf()));
    }

    if let Ok(rc_env) = std::env::var("CHECKLISTRC") {
        if rc_env == "/dev/null" {
            return Ok(None);
        }
        return Ok(Some(PathBuf::from(rc_env)));
    }

    let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot determine home directory"))?;
    let candidate = home.join(".checklistrc");
    if candidate.exists() {
        return Ok(Some(candidate));
    }

    Ok(None)
}
