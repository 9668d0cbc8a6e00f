//! Player profile history.
//!
//! After every assessment of a named player, a [`HistoryEntry`] is forwarded
//! to a [`ProfileHistory`] sink; weekly goals read the player's recent
//! entries back from the same sink.
//!
//! [`JsonFileHistory`] stores one JSON array per player, newest entry first,
//! capped at [`HISTORY_CAPACITY`] entries.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tierlift_core::{FeatureVector, StatRecord, Tier};

/// Entries kept per player.
pub const HISTORY_CAPACITY: usize = 50;

/// Entries returned by [`ProfileHistory::recent`].
pub const RECENT_LIMIT: usize = 5;

/// One forwarded assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub stats: FeatureVector,
    pub tier: Tier,
    pub tips: Vec<String>,
    pub drills: Vec<String>,
    pub promotion_ready: bool,
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    #[must_use]
    pub fn to_record(&self) -> StatRecord {
        StatRecord::new(self.stats, self.tier, self.timestamp)
    }
}

/// `%Y-%m-%d %H:%M:%S`, interpreted as UTC.
mod timestamp_format {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize as _, Deserializer, Serializer, de::Error as _};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub(super) fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&timestamp.format(FORMAT))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(D::Error::custom)
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum HistoryError {
    #[display("failed to access profile history at {}", path.display())]
    Io {
        path: PathBuf,
        #[error(source)]
        source: io::Error,
    },
    #[display("malformed profile history at {}", path.display())]
    Json {
        path: PathBuf,
        #[error(source)]
        source: serde_json::Error,
    },
}

/// Where assessments are forwarded and recent history is read from.
pub trait ProfileHistory: Send + Sync {
    /// Records `entry` as the player's newest.
    fn append(&self, username: &str, entry: HistoryEntry) -> Result<(), HistoryError>;

    /// Up to [`RECENT_LIMIT`] of the player's newest entries, newest first.
    /// Unknown players have an empty history.
    fn recent(&self, username: &str) -> Result<Vec<HistoryEntry>, HistoryError>;
}

/// File-backed [`ProfileHistory`], one file per player under a directory.
#[derive(Debug)]
pub struct JsonFileHistory {
    dir: PathBuf,
    // serializes read-modify-write cycles within the process
    lock: Mutex<()>,
}

impl JsonFileHistory {
    #[must_use]
    pub fn new<P>(dir: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, username: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_file_stem(username)))
    }

    fn load(path: &Path) -> Result<Vec<HistoryEntry>, HistoryError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(source) => {
                return Err(HistoryError::Io {
                    path: path.to_owned(),
                    source,
                });
            }
        };
        serde_json::from_slice(&bytes).map_err(|source| HistoryError::Json {
            path: path.to_owned(),
            source,
        })
    }

    fn store(path: &Path, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let io_err = |source| HistoryError::Io {
            path: path.to_owned(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let bytes = serde_json::to_vec_pretty(entries).map_err(|source| HistoryError::Json {
            path: path.to_owned(),
            source,
        })?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)
    }
}

impl ProfileHistory for JsonFileHistory {
    fn append(&self, username: &str, entry: HistoryEntry) -> Result<(), HistoryError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let path = self.path_for(username);
        let mut entries = Self::load(&path)?;
        entries.insert(0, entry);
        entries.truncate(HISTORY_CAPACITY);
        Self::store(&path, &entries)
    }

    fn recent(&self, username: &str) -> Result<Vec<HistoryEntry>, HistoryError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = Self::load(&self.path_for(username))?;
        entries.truncate(RECENT_LIMIT);
        Ok(entries)
    }
}

/// Maps a username to a file stem: ASCII alphanumerics, `-` and `_` are kept,
/// every other byte becomes `%XX`.
fn encode_file_stem(username: &str) -> String {
    use std::fmt::Write as _;

    let mut stem = String::with_capacity(username.len());
    for b in username.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
            stem.push(char::from(b));
        } else {
            let _ = write!(stem, "%{b:02X}");
        }
    }
    stem
}
