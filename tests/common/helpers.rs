use async_trait::async_trait;
use haul::download::DownloadRequest;
use haul::downloader::{Downloader, DownloaderBuilder, PostAction};
use haul::http::{Outcome, Transport};
use haul::logging::Logger;
use haul::{Error, Summary};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Url;
use sha2::{Digest, Sha256};
use std::error::Error as StdError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

// Common test constants
pub const TEST_DOMAIN: &str = "http://domain.com/file.zip";
pub const TEST_USER_AGENT: &str = "haul-test-agent";
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Routes `tracing` output to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates a temporary file with the given content
pub fn create_temp_file(dir: &Path, filename: &str, content: &[u8]) -> PathBuf {
    let file_path = dir.join(filename);
    fs::write(&file_path, content).expect("Failed to write temporary file");
    file_path
}

/// Creates test file content of specified size
pub fn create_test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// Creates random test content of specified size
pub fn create_random_content(size: usize) -> Vec<u8> {
    let mut content = vec![0u8; size];
    rand::fill(&mut content[..]);
    content
}

pub fn sha256_hex(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

pub fn md5_hex(content: &[u8]) -> String {
    format!("{:x}", md5::compute(content))
}

/// Asserts that a file exists at the given path
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "File should exist at path: {:?}", path);
}

/// Asserts that no file exists at the given path
pub fn assert_file_missing(path: &Path) {
    assert!(!path.exists(), "File should not exist at path: {:?}", path);
}

/// Asserts that a file has the expected size
pub fn assert_file_size(path: &Path, expected_size: u64) {
    let metadata = fs::metadata(path).expect("Failed to get file metadata");
    assert_eq!(
        metadata.len(),
        expected_size,
        "File size mismatch at path: {:?}",
        path
    );
}

/// Creates a test request from the common test domain
pub fn create_test_request() -> DownloadRequest {
    DownloadRequest::try_from(TEST_DOMAIN)
        .expect("Failed to create test request")
        .headless(true)
}

/// Creates a headless request for `url`
pub fn create_request(url: &str) -> DownloadRequest {
    DownloadRequest::try_from(url)
        .expect("Failed to create request")
        .headless(true)
}

/// Creates test headers with common user agent
pub fn create_test_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(TEST_USER_AGENT));
    headers
}

/// Creates test headers with custom user agent
pub fn create_test_headers_with_agent(agent: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_str(agent).expect("Invalid header value"));
    headers
}

// === Scripted Transport ===

/// What a [`ScriptedTransport`] does when fetching.
#[derive(Debug, Clone)]
pub enum Script {
    /// Writes the content in chunks and completes.
    Complete(Vec<u8>),
    /// Writes the content, then waits until cancelled.
    Stall(Vec<u8>),
    /// Writes the content, then completes once the gate is notified.
    Gated(Vec<u8>, Arc<Notify>),
    /// Fails without writing anything.
    Fail(String),
}

/// In-memory [`Transport`] driven by a [`Script`].
pub struct ScriptedTransport {
    script: Script,
    reachable: bool,
    chunk_size: usize,
    fetches: Mutex<Vec<Url>>,
}

impl ScriptedTransport {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            reachable: true,
            chunk_size: 4096,
            fetches: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }

    async fn write(
        &self,
        content: &[u8],
        destination: &Path,
        progress: &(dyn Fn(u64, Option<u64>) + Send + Sync),
    ) -> io::Result<()> {
        let total = Some(content.len() as u64);
        progress(0, total);
        let mut written = Vec::new();
        for chunk in content.chunks(self.chunk_size) {
            written.extend_from_slice(chunk);
            tokio::fs::write(destination, &written).await?;
            progress(written.len() as u64, total);
            tokio::task::yield_now().await;
        }
        if content.is_empty() {
            tokio::fs::write(destination, &written).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn probe(&self, url: &Url) -> haul::Result<()> {
        if self.reachable {
            Ok(())
        } else {
            Err(Error::Internal(format!("{} is unreachable", url)))
        }
    }

    async fn fetch(
        &self,
        url: &Url,
        destination: &Path,
        cancel: CancellationToken,
        progress: &(dyn Fn(u64, Option<u64>) + Send + Sync),
    ) -> Outcome {
        self.fetches.lock().unwrap().push(url.clone());
        match self.script {
            Script::Complete(ref content) => {
                if cancel.is_cancelled() {
                    return Outcome::Cancelled;
                }
                match self.write(content, destination, progress).await {
                    Ok(()) => Outcome::Completed,
                    Err(e) => Outcome::Failed(e.into()),
                }
            }
            Script::Stall(ref content) => {
                if let Err(e) = self.write(content, destination, progress).await {
                    return Outcome::Failed(e.into());
                }
                cancel.cancelled().await;
                Outcome::Cancelled
            }
            Script::Gated(ref content, ref gate) => {
                if let Err(e) = self.write(content, destination, progress).await {
                    return Outcome::Failed(e.into());
                }
                gate.notified().await;
                Outcome::Completed
            }
            Script::Fail(ref message) => Outcome::Failed(Error::Internal(message.clone())),
        }
    }
}

// === Logger and Post Actions ===

/// [`Logger`] keeping every message in memory.
#[derive(Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries().iter().any(|entry| entry.contains(needle))
    }
}

impl Logger for MemoryLogger {
    fn info(&self, message: &str) {
        self.entries.lock().unwrap().push(format!("INFO {}", message));
    }

    fn error(&self, message: &str, error: Option<&(dyn StdError + 'static)>) {
        let entry = match error {
            Some(error) => format!("ERROR {}: {}", message, error),
            None => format!("ERROR {}", message),
        };
        self.entries.lock().unwrap().push(entry);
    }

    fn exception(&self, error: &(dyn StdError + 'static)) {
        self.entries
            .lock()
            .unwrap()
            .push(format!("EXCEPTION {}", error));
    }
}

/// [`PostAction`] recording the paths it was asked to launch.
#[derive(Default)]
pub struct RecordingPostAction {
    launched: Mutex<Vec<PathBuf>>,
}

impl RecordingPostAction {
    pub fn launched(&self) -> Vec<PathBuf> {
        self.launched.lock().unwrap().clone()
    }
}

impl PostAction for RecordingPostAction {
    fn launch(&self, path: &Path) -> io::Result<()> {
        self.launched.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

/// [`PostAction`] that always fails.
pub struct FailingPostAction;

impl PostAction for FailingPostAction {
    fn launch(&self, _path: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::NotFound, "no application registered"))
    }
}

/// [`PostAction`] that panics.
pub struct PanickingPostAction;

impl PostAction for PanickingPostAction {
    fn launch(&self, _path: &Path) -> io::Result<()> {
        panic!("launcher crashed");
    }
}

// === Downloader Builder Helpers ===

/// Creates a hidden downloader builder storing files in `dir`
pub fn create_test_downloader_builder(dir: &Path) -> DownloaderBuilder {
    init_tracing();
    DownloaderBuilder::hidden()
        .directory(dir.to_path_buf())
        .sample_period(Duration::from_millis(50))
}

/// Creates a downloader running `script` and logging into `logger`
pub fn create_scripted_downloader(
    dir: &Path,
    script: Script,
    logger: Arc<MemoryLogger>,
) -> Downloader {
    create_test_downloader_builder(dir)
        .transport(Arc::new(ScriptedTransport::new(script)))
        .logger(logger)
        .build()
        .expect("Failed to build downloader")
}

/// Waits for the current attempt with a timeout
pub async fn wait_for_summary(downloader: &Downloader) -> Summary {
    tokio::time::timeout(WAIT_TIMEOUT, downloader.wait())
        .await
        .expect("Download did not finish in time")
        .expect("Download produced no summary")
}

/// Polls until `predicate` holds or the timeout elapses
pub async fn wait_until<F: Fn() -> bool>(predicate: F) {
    tokio::time::timeout(WAIT_TIMEOUT, async {
        while !predicate() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("Condition not reached in time");
}
