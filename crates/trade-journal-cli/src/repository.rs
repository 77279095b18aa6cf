use std::fs;
use std::path::{Path, PathBuf};

use trade_journal_core::journal::{InMemoryRepository, TradeRepository};
use trade_journal_core::trade::Trade;
use trade_journal_core::{JournalError, JournalResult};

/// Trade repository persisted as a pretty-printed JSON array.
///
/// The whole file is rewritten after every mutation. Derived fields are
/// recomputed as each trade is deserialized, so a hand-edited file can
/// never carry a stale P&L.
pub struct JsonFileRepository {
    path: PathBuf,
    inner: InMemoryRepository,
}

impl JsonFileRepository {
    /// Open `path`, treating a missing file as an empty journal.
    pub fn open(path: impl AsRef<Path>) -> JournalResult<Self> {
        let path = path.as_ref().to_path_buf();
        let trades = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| storage(&path, e))?;
            if contents.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str::<Vec<Trade>>(&contents)?
            }
        } else {
            Vec::new()
        };
        tracing::debug!(path = %path.display(), trades = trades.len(), "journal opened");
        Ok(Self {
            path,
            inner: InMemoryRepository::with_trades(trades),
        })
    }

    fn persist(&self) -> JournalResult<()> {
        let trades = self.inner.list()?;
        let json = serde_json::to_string_pretty(&trades)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| storage(parent, e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| storage(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| storage(&self.path, e))?;
        Ok(())
    }
}

impl TradeRepository for JsonFileRepository {
    fn list(&self) -> JournalResult<Vec<Trade>> {
        self.inner.list()
    }

    fn get(&self, id: &str) -> JournalResult<Option<Trade>> {
        self.inner.get(id)
    }

    fn create(&mut self, trade: Trade) -> JournalResult<()> {
        self.inner.create(trade)?;
        self.persist()
    }

    fn update(&mut self, trade: Trade) -> JournalResult<()> {
        self.inner.update(trade)?;
        self.persist()
    }

    fn delete(&mut self, id: &str) -> JournalResult<()> {
        self.inner.delete(id)?;
        self.persist()
    }
}

fn storage(path: &Path, e: std::io::Error) -> JournalError {
    JournalError::Storage(format!("{}: {}", path.display(), e))
}
