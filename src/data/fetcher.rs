//! Dataset Fetcher Module
//! Downloads remote CSV files into a local cache directory, once per session.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Per-request timeout for dataset downloads.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Failed to write download: {0}")]
    Io(#[from] io::Error),
}

/// Retrieves the body of a URL.
pub trait Transport {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP transport backed by reqwest.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let network = |source| FetchError::Network {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().map_err(network)?.to_vec())
    }
}

/// Downloads files into `cache_dir`, memoized by `(url, file name)`.
pub struct Fetcher<T: Transport> {
    transport: T,
    cache_dir: PathBuf,
    fetched: HashMap<(String, String), PathBuf>,
    reuse_existing: bool,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            cache_dir: cache_dir.into(),
            fetched: HashMap::new(),
            reuse_existing: false,
        }
    }

    /// Treat files already present in the cache directory as fetched.
    pub fn with_reuse_existing(mut self, reuse: bool) -> Self {
        self.reuse_existing = reuse;
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Fetch `url` into `<cache_dir>/<file_name>` unless this session already did.
    pub fn fetch(&mut self, url: &str, file_name: &str) -> Result<PathBuf, FetchError> {
        let key = (url.to_string(), file_name.to_string());
        if let Some(path) = self.fetched.get(&key) {
            log::info!("Using cached {} for {url}", path.display());
            return Ok(path.clone());
        }

        let destination = self.cache_dir.join(file_name);
        if self.reuse_existing && destination.is_file() {
            log::info!("Reusing existing {}", destination.display());
            self.fetched.insert(key, destination.clone());
            return Ok(destination);
        }

        log::info!("Downloading {file_name} from {url}");
        let body = self.transport.get(url)?;
        Self::write_atomically(&self.cache_dir, &destination, &body)?;
        log::info!("Saved {} bytes to {}", body.len(), destination.display());

        self.fetched.insert(key, destination.clone());
        Ok(destination)
    }

    /// Forget one download and remove its file so the next fetch hits the network.
    pub fn invalidate(&mut self, url: &str, file_name: &str) -> Result<(), FetchError> {
        let key = (url.to_string(), file_name.to_string());
        if let Some(path) = self.fetched.remove(&key) {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    /// Forget every download of this session. Files stay on disk.
    pub fn clear(&mut self) {
        self.fetched.clear();
    }

    /// The body lands in a temp file first and is renamed once complete.
    fn write_atomically(dir: &Path, destination: &Path, body: &[u8]) -> Result<(), FetchError> {
        fs::create_dir_all(dir)?;
        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(body)?;
        temp.as_file().sync_all()?;
        temp.persist(destination).map_err(|err| err.error)?;
        Ok(())
    }
}
