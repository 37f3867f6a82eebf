use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, Context, Result};
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{
    config::AppConfig,
    models::{GameDefinition, GameEntry, TileCatalog},
};

/// Supplier of raw game and tile definitions.
pub trait DefinitionSource {
    /// All known games.
    fn games(&self) -> Result<Vec<GameEntry>>;
    /// Load one game by id or title.
    fn game(&self, name: &str) -> Result<GameDefinition>;
    /// Load the full tile catalog.
    fn tiles(&self) -> Result<TileCatalog>;
}

/// Thread-safe source that reads JSON definitions from a directory tree.
pub struct FsDefinitionSource {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    games_root: PathBuf,
    tiles_path: PathBuf,
    cache: Vec<GameEntry>,
}

impl FsDefinitionSource {
    /// Build a source over `games_root` and the catalog at `tiles_path`.
    pub fn new(games_root: impl Into<PathBuf>, tiles_path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                games_root: games_root.into(),
                tiles_path: tiles_path.into(),
                cache: Vec::new(),
            })),
        }
    }

    /// Build a source from the configured content database.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.games_path(), config.tiles_path())
    }

    /// Root directory scanned for game definitions.
    pub fn games_root(&self) -> PathBuf {
        self.inner.read().games_root.clone()
    }

    /// Point the source at new locations and drop the discovery cache.
    pub fn refresh(&self, games_root: impl Into<PathBuf>, tiles_path: impl Into<PathBuf>) {
        let mut inner = self.inner.write();
        inner.games_root = games_root.into();
        inner.tiles_path = tiles_path.into();
        inner.cache.clear();
    }

    /// Filter games using a case-insensitive substring search.
    pub fn games_matching(&self, query: &str) -> Result<Vec<GameEntry>> {
        let needle = query.trim().to_lowercase();
        let games = self.games()?;
        if needle.is_empty() {
            return Ok(games);
        }

        Ok(games
            .into_iter()
            .filter(|game| {
                game.id.to_lowercase().contains(&needle)
                    || game
                        .title
                        .as_ref()
                        .map(|title| title.to_lowercase().contains(&needle))
                        .unwrap_or(false)
            })
            .collect())
    }
}

impl DefinitionSource for FsDefinitionSource {
    fn games(&self) -> Result<Vec<GameEntry>> {
        let mut inner = self.inner.write();
        if inner.cache.is_empty() {
            let games = discover_games(&inner.games_root)?;
            inner.cache = games;
        }
        Ok(inner.cache.clone())
    }

    fn game(&self, name: &str) -> Result<GameDefinition> {
        let entry = self
            .games()?
            .into_iter()
            .find(|game| game.matches(name))
            .ok_or_else(|| anyhow!("unknown game '{name}'"))?;
        read_definition(&entry.path)
    }

    fn tiles(&self) -> Result<TileCatalog> {
        let path = self.inner.read().tiles_path.clone();
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read tile catalog {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse tile catalog {}", path.display()))
    }
}

/// Only the part of a definition needed for discovery.
#[derive(Debug, Deserialize)]
struct DefinitionHeader {
    #[serde(default)]
    info: Option<HeaderInfo>,
}

#[derive(Debug, Deserialize)]
struct HeaderInfo {
    #[serde(default)]
    title: Option<String>,
}

fn discover_games(root: &Path) -> Result<Vec<GameEntry>> {
    if !root.is_dir() {
        warn!("game directory {} does not exist", root.display());
        return Ok(Vec::new());
    }

    let mut games = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some("json")
        {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };

        match read_header(path) {
            Ok(header) => games.push(GameEntry {
                id: id.to_string(),
                title: header.info.and_then(|info| info.title),
                path: path.to_path_buf(),
            }),
            Err(err) => warn!("Skipping {}: {err:#}", path.display()),
        }
    }

    debug!(count = games.len(), root = %root.display(), "discovered games");
    Ok(games)
}

fn read_header(path: &Path) -> Result<DefinitionHeader> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

fn read_definition(path: &Path) -> Result<GameDefinition> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    GameDefinition::from_json(&contents)
        .with_context(|| format!("failed to parse game definition {}", path.display()))
}
