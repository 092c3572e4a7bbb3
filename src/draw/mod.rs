//! Winning Numbers
//!
//! Resolves a (game, issue) pair to the official draw result. Results are
//! fetched through a pluggable [`DrawSource`] and memoized for the life of
//! the store.

pub mod http;

pub use http::HttpDrawSource;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{CheckError, CheckResult};
use crate::slip::numbers::extract_and_pad;
use crate::slip::Game;

/// Official winning numbers for one draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningRecord {
    pub game: Game,
    /// Red (SSQ) or front (CJDLT) numbers
    pub red: Vec<String>,
    /// Blue (SSQ) or back (CJDLT) numbers
    pub blue: Vec<String>,
}

impl WinningRecord {
    /// Numbers formatted as `red + blue`
    pub fn display(&self) -> String {
        let mut parts: Vec<&str> = self.red.iter().map(String::as_str).collect();
        parts.push("+");
        parts.extend(self.blue.iter().map(String::as_str));
        parts.join(" ")
    }
}

/// Parse the raw winning-number string returned by a draw source
pub fn parse_winning_record(raw: &str, game: Game) -> CheckResult<WinningRecord> {
    let tokens = extract_and_pad(raw);
    if tokens.len() < game.line_size() {
        return Err(CheckError::MissingInfo(format!(
            "winning numbers {:?} hold {} numbers, need {}",
            raw,
            tokens.len(),
            game.line_size()
        )));
    }
    let line = game.split_line(&tokens)?;
    Ok(WinningRecord {
        game,
        red: line.red,
        blue: line.blue,
    })
}

/// Capability that fetches the raw winning-number string for a draw.
///
/// Implementations report transport problems as
/// [`CheckError::RemoteUnavailable`] and an unknown or undrawn issue as
/// [`CheckError::NoDrawData`].
pub trait DrawSource: Send + Sync {
    fn fetch(&self, game: Game, issue: &str) -> CheckResult<String>;
}

/// Cache key for a draw
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DrawKey {
    pub game: Game,
    pub issue: String,
}

/// Memoizing lookup of winning records
pub struct WinningRecordStore {
    source: Arc<dyn DrawSource>,
    /// One cell per key; the cell's init lock keeps fetches per key to one at a time
    cache: Mutex<HashMap<DrawKey, Arc<OnceCell<WinningRecord>>>>,
}

impl WinningRecordStore {
    pub fn new(source: Arc<dyn DrawSource>) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a draw, fetching it on first use
    pub fn lookup(&self, game: Game, issue: &str) -> CheckResult<WinningRecord> {
        let key = DrawKey {
            game,
            issue: issue.to_string(),
        };
        let cell = {
            let mut cache = self.cache.lock();
            cache.entry(key.clone()).or_default().clone()
        };

        if let Some(record) = cell.get() {
            debug!("Draw {} {} served from cache", game, issue);
            return Ok(record.clone());
        }

        let result = cell
            .get_or_try_init(|| {
                info!("Fetching winning numbers for {} issue {}", game, issue);
                let raw = self.source.fetch(game, issue).map_err(|e| {
                    warn!("Fetch for {} issue {} failed: {}", game, issue, e);
                    e
                })?;
                parse_winning_record(&raw, game)
            })
            .cloned();

        if result.is_err() {
            self.evict_empty(&key, &cell);
        }
        result
    }

    /// Drop the cell for `key` if it is still unresolved and still the one in the map
    fn evict_empty(&self, key: &DrawKey, cell: &Arc<OnceCell<WinningRecord>>) {
        let mut cache = self.cache.lock();
        let unresolved = cache
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, cell) && current.get().is_none());
        if unresolved {
            cache.remove(key);
        }
    }

    /// Run [`WinningRecordStore::lookup`] on a worker thread
    pub fn lookup_in_background(self: &Arc<Self>, game: Game, issue: &str) -> PendingLookup {
        let (tx, rx) = bounded(1);
        let store = Arc::clone(self);
        let issue = issue.to_string();
        std::thread::spawn(move || {
            let result = store.lookup(game, &issue);
            // Receiver may have timed out and gone away
            let _ = tx.send(result);
        });
        PendingLookup { rx }
    }

    /// Number of draws resolved so far
    pub fn cached_count(&self) -> usize {
        self.cache.lock().values().filter(|cell| cell.get().is_some()).count()
    }
}

/// Result of a lookup running on another thread
pub struct PendingLookup {
    rx: Receiver<CheckResult<WinningRecord>>,
}

impl PendingLookup {
    /// Wait for the lookup; a timeout is reported as `RemoteUnavailable`
    pub fn wait(self, timeout: Duration) -> CheckResult<WinningRecord> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(CheckError::RemoteUnavailable(format!(
                "no response within {:?}",
                timeout
            ))),
            Err(RecvTimeoutError::Disconnected) => Err(CheckError::RemoteUnavailable(
                "lookup worker exited without a result".to_string(),
            )),
        }
    }

    /// Non-blocking poll, for callers driving an event loop
    pub fn try_take(&self) -> Option<CheckResult<WinningRecord>> {
        self.rx.try_recv().ok()
    }
}
