use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::{LocalStore, write_atomic};
use crate::model::{SortSpec, TableColumn};

const TABLE_ID: &str = "experiment-table";

/// Column visibility and sort order of the experiment table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePrefs {
    pub sort: SortSpec,
    pub hidden_columns: BTreeSet<TableColumn>,
}

impl Default for TablePrefs {
    fn default() -> Self {
        Self {
            sort: SortSpec::default(),
            hidden_columns: TableColumn::ALL
                .into_iter()
                .filter(|c| c.hidden_by_default())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedTablePrefs {
    version: u32,
    table: String,
    saved_at: String,
    prefs: TablePrefs,
}

/// Identity of the table a preference record belongs to: the backend plus
/// the table id, hashed so it is safe as a file name.
pub fn table_key(base_url: &str) -> String {
    let identity = format!("{}#{}", base_url.trim_end_matches('/'), TABLE_ID);
    let hash = blake3::hash(identity.as_bytes()).to_hex();
    hash.as_str()[..16].to_string()
}

impl LocalStore {
    fn table_prefs_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("table-{}.json", key))
    }

    /// Saved preferences, or `None` when missing, unreadable or older than
    /// `retention_days`.
    pub fn load_table_prefs(
        &self,
        key: &str,
        retention_days: u64,
        now: OffsetDateTime,
    ) -> Option<TablePrefs> {
        let path = self.table_prefs_path(key);
        let bytes = fs::read(&path).ok()?;
        let saved: SavedTablePrefs = match serde_json::from_slice(&bytes) {
            Ok(saved) => saved,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable table preferences");
                return None;
            }
        };
        let saved_at = OffsetDateTime::parse(&saved.saved_at, &Rfc3339).ok()?;
        // A window too large for a `Duration` never expires.
        let max_age = retention_days
            .checked_mul(86_400)
            .and_then(|secs| i64::try_from(secs).ok())
            .map(time::Duration::seconds);
        if max_age.is_some_and(|max_age| now - saved_at > max_age) {
            tracing::debug!(saved_at = %saved.saved_at, "table preferences expired");
            return None;
        }
        Some(saved.prefs)
    }

    pub fn save_table_prefs(
        &self,
        key: &str,
        prefs: &TablePrefs,
        now: OffsetDateTime,
    ) -> Result<()> {
        let saved = SavedTablePrefs {
            version: 1,
            table: TABLE_ID.to_string(),
            saved_at: now.format(&Rfc3339).context("format timestamp")?,
            prefs: prefs.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&saved).context("serialize table preferences")?;
        write_atomic(&self.table_prefs_path(key), &bytes).context("write table preferences")?;
        Ok(())
    }
}
