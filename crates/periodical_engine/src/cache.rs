use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use periodical_logging::{periodical_debug, periodical_info};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use url::Url;

use crate::fetch::Transport;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::{CachedResponse, FailureKind, FetchError};

/// How long a stored response is served without asking the network again.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(60 * 60);

const RECORD_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("cache io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("corrupt cache entry {path:?}: {reason}")]
    Corrupt { path: PathBuf, reason: String },
    #[error("failed to encode cache record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to store cache entry: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub dir: PathBuf,
}

impl CacheSettings {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Settings pointing at the per-user cache directory for `app_name`.
    pub fn for_app(app_name: &str) -> Option<Self> {
        default_cache_dir(app_name).map(Self::new)
    }
}

/// `$XDG_CACHE_HOME/{app_name}`, falling back to `$HOME/.cache/{app_name}`.
pub fn default_cache_dir(app_name: &str) -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .filter(|path| path.is_absolute())
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))?;
    Some(base.join(app_name))
}

/// Hex SHA-256 over the URL followed by every key and value in the order given.
///
/// Reordering the same parameters yields a different fingerprint.
pub fn fingerprint(url: &str, params: &[(&str, &str)]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    for (key, value) in params {
        hasher.update(key.as_bytes());
        hasher.update(value.as_bytes());
    }
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordHeader {
    version: u32,
    url: String,
    status: u16,
    headers: Vec<(String, String)>,
    body_len: u64,
}

/// Response cache keyed by request fingerprint, one file per entry.
///
/// The freshness boundary is fixed when the cache is built, so every lookup
/// in a run compares against the same instant.
pub struct ResponseCache {
    writer: AtomicFileWriter,
    epoch: SystemTime,
    transport: Box<dyn Transport>,
}

impl ResponseCache {
    pub fn new(settings: CacheSettings, transport: Box<dyn Transport>) -> Self {
        let epoch = SystemTime::now()
            .checked_sub(FRESHNESS_WINDOW)
            .unwrap_or(UNIX_EPOCH);
        Self::with_epoch(settings, transport, epoch)
    }

    /// Build a cache whose entries count as fresh when modified after `epoch`.
    pub fn with_epoch(
        settings: CacheSettings,
        transport: Box<dyn Transport>,
        epoch: SystemTime,
    ) -> Self {
        Self {
            writer: AtomicFileWriter::new(settings.dir),
            epoch,
            transport,
        }
    }

    pub fn dir(&self) -> &Path {
        self.writer.dir()
    }

    pub fn epoch(&self) -> SystemTime {
        self.epoch
    }

    pub fn entry_path(&self, url: &str, params: &[(&str, &str)]) -> PathBuf {
        self.dir().join(fingerprint(url, params))
    }

    pub fn fetch(&self, url: &str, params: &[(&str, &str)]) -> Result<CachedResponse, CacheError> {
        periodical_info!("Downloading {}", url);

        let key = fingerprint(url, params);
        let path = self.dir().join(&key);
        if self.is_fresh(&path)? {
            periodical_debug!("Cache hit for {} ({})", url, key);
            return read_record(&path);
        }

        let request_url = request_url(url, params)?;
        let response = self.transport.get(&request_url)?;
        if !response.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(response.status),
                format!("{} answered {}", request_url, response.status),
            )
            .into());
        }

        self.writer.write_bytes(&key, &encode_record(&response)?)?;
        periodical_debug!("Stored {} as {}", url, key);
        Ok(response)
    }

    fn is_fresh(&self, path: &Path) -> Result<bool, CacheError> {
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(source) => {
                return Err(CacheError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let modified = meta.modified().map_err(|source| CacheError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(modified > self.epoch)
    }
}

fn request_url(url: &str, params: &[(&str, &str)]) -> Result<Url, FetchError> {
    let mut parsed =
        Url::parse(url).map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if !params.is_empty() {
        parsed.query_pairs_mut().extend_pairs(params.iter());
    }
    Ok(parsed)
}

fn encode_record(response: &CachedResponse) -> Result<Vec<u8>, CacheError> {
    let header = RecordHeader {
        version: RECORD_VERSION,
        url: response.url.clone(),
        status: response.status,
        headers: response.headers.clone(),
        body_len: response.body.len() as u64,
    };
    let mut record = serde_json::to_vec(&header)?;
    record.push(b'\n');
    record.extend_from_slice(&response.body);
    Ok(record)
}

fn read_record(path: &Path) -> Result<CachedResponse, CacheError> {
    let raw = fs::read(path).map_err(|source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let corrupt = |reason: String| CacheError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };

    let split = raw
        .iter()
        .position(|b| *b == b'\n')
        .ok_or_else(|| corrupt("missing header line".into()))?;
    let header: RecordHeader =
        serde_json::from_slice(&raw[..split]).map_err(|err| corrupt(err.to_string()))?;
    if header.version != RECORD_VERSION {
        return Err(corrupt(format!("unsupported record version {}", header.version)));
    }
    let body = &raw[split + 1..];
    if body.len() as u64 != header.body_len {
        return Err(corrupt(format!(
            "body length {} does not match header {}",
            body.len(),
            header.body_len
        )));
    }

    Ok(CachedResponse {
        url: header.url,
        status: header.status,
        headers: header.headers,
        body: body.to_vec(),
    })
}
