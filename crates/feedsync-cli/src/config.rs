use std::path::{Path, PathBuf};

use anyhow::Context;
use feedsync_sync::{ChangeJournal, SyncContext};
use feedsync_types::{Column, SyncStrategy, SyncType};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "/usr/local/data/feedsync.toml";

/// Contents of the TOML configuration file.
///
/// ```toml
/// [general]
/// sheet = "/usr/local/data/feed.json"
/// sheet_rows = 500
/// warehouse = "Main"
/// log_path = "/usr/local/data/log"
///
/// [sources]
/// inventory = "https://backend.example/export/stock.csv"
///
/// [columns]
/// price = ["H"]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub sources: SourcesConfig,
    pub columns: ColumnsConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// The destination sheet file.
    pub sheet: PathBuf,
    pub sheet_rows: Option<usize>,
    /// Warehouse whose physical stock is synced.
    pub warehouse: String,
    /// Change journal directory; no journal when unset.
    pub log_path: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            sheet: PathBuf::from("/usr/local/data/feed.json"),
            sheet_rows: None,
            warehouse: String::new(),
            log_path: None,
        }
    }
}

/// Export location (URL or file path) per sync type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub inventory: Option<String>,
    pub price: Option<String>,
    pub text: Option<String>,
    pub attr: Option<String>,
}

impl SourcesConfig {
    pub fn location(&self, sync_type: SyncType) -> Option<&str> {
        match sync_type {
            SyncType::Inventory => self.inventory.as_deref(),
            SyncType::Price => self.price.as_deref(),
            SyncType::Text => self.text.as_deref(),
            SyncType::Attr => self.attr.as_deref(),
        }
    }
}

/// Destination column overrides, one column per field of the sync type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub inventory: Option<Vec<Column>>,
    pub price: Option<Vec<Column>>,
    pub text: Option<Vec<Column>>,
    pub attr: Option<Vec<Column>>,
}

impl ColumnsConfig {
    pub fn get(&self, sync_type: SyncType) -> Option<&[Column]> {
        match sync_type {
            SyncType::Inventory => self.inventory.as_deref(),
            SyncType::Price => self.price.as_deref(),
            SyncType::Text => self.text.as_deref(),
            SyncType::Attr => self.attr.as_deref(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn strategy(&self, sync_type: SyncType) -> anyhow::Result<SyncStrategy> {
        let strategy = SyncStrategy::new(sync_type, &self.general.warehouse);
        match self.columns.get(sync_type) {
            Some(columns) => strategy
                .with_columns(columns.to_vec())
                .with_context(|| format!("invalid [columns] entry for {sync_type}")),
            None => Ok(strategy),
        }
    }

    /// Build the run context for `sync_type`.
    pub fn context(&self, sync_type: SyncType, dry_run: bool) -> anyhow::Result<SyncContext> {
        let mut ctx = SyncContext::new(self.strategy(sync_type)?).dry_run(dry_run);
        if let Some(rows) = self.general.sheet_rows {
            ctx = ctx.with_sheet_rows(rows);
        }
        if let Some(dir) = &self.general.log_path {
            ctx = ctx.with_journal(ChangeJournal::new(dir));
        }
        Ok(ctx)
    }
}
