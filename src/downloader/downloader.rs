//! Represents the download controller.

use super::config::DownloaderConfig;
use super::events::Event;
use super::sampler::{record_sample, SpeedSampler};
use crate::download::{compare, detect_hash_type, hash_file, is_plain_filename, HashType};
use crate::download::{DownloadRequest, Status, Summary, TransferState};
use crate::error::{Error, Result};
use crate::http::{Outcome, Transport};
use crate::progress::{Progress, ProgressDisplay};
use crate::utils::format_speed;

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::fs::{self, OpenOptions};
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Represents the download controller.
///
/// A downloader runs at most one transfer at a time. [`Downloader::start`]
/// validates the request and returns as soon as the transfer is running; the
/// outcome is delivered through the completion callback, the
/// [`Downloader::subscribe`] channel, or [`Downloader::wait`].
///
/// A downloader can be created via its builder:
///
/// ```rust
/// # fn main() -> Result<(), haul::Error> {
/// use haul::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Downloader {
    config: Arc<DownloaderConfig>,
    transport: Arc<dyn Transport>,
    shared: Arc<Shared>,
}

struct Shared {
    inner: Mutex<Inner>,
    events: broadcast::Sender<Event>,
    finished: watch::Sender<Finished>,
}

/// Published on every change of `running`, with the last terminal summary.
#[derive(Debug, Clone, Default)]
struct Finished {
    running: bool,
    last: Option<Summary>,
}

#[derive(Default)]
struct Inner {
    state: TransferState,
    /// Set from the moment `start` accepts to validate until the completion
    /// protocol ends.
    running: bool,
    attempt: Option<Attempt>,
    request: Option<DownloadRequest>,
    destination: Option<PathBuf>,
    temp_path: Option<PathBuf>,
    progress_text: String,
}

struct Attempt {
    request: DownloadRequest,
    destination: PathBuf,
    temp_path: PathBuf,
    hash_type: Option<HashType>,
    cancel: CancellationToken,
    stop_sampler: CancellationToken,
    display: ProgressDisplay,
}

struct Prepared {
    destination: PathBuf,
    temp_path: PathBuf,
    hash_type: Option<HashType>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}

impl Downloader {
    /// Creates a new Downloader with the given configuration.
    pub(crate) fn new(config: DownloaderConfig, transport: Arc<dyn Transport>) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let (finished, _) = watch::channel(Finished::default());
        Self {
            config: Arc::new(config),
            transport,
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner::default()),
                events,
                finished,
            }),
        }
    }

    /// Gets the directory where files will be downloaded.
    pub fn directory(&self) -> &PathBuf {
        &self.config.directory
    }

    /// Gets whether `start` probes the URL first.
    pub fn probe(&self) -> bool {
        self.config.probe
    }

    /// Gets the interval between two speed samples.
    pub fn sample_period(&self) -> Duration {
        self.config.sample_period
    }

    /// Starts downloading `request`.
    ///
    /// Returns once the transfer runs in the background. Fails with
    /// [`Error::AlreadyRunning`] while another transfer is in progress and with
    /// [`Error::InvalidRequest`] when the URL, the expected hash or the
    /// destination is unusable; in both cases nothing is transferred.
    pub async fn start(&self, request: DownloadRequest) -> Result<()> {
        self.reserve()?;
        match self.prepare(&request).await {
            Ok(prepared) => {
                self.launch(request, prepared);
                Ok(())
            }
            Err(e) => {
                let mut inner = self.shared.lock();
                inner.running = false;
                self.shared.finished.send_modify(|f| f.running = false);
                Err(e)
            }
        }
    }

    /// Asks the running transfer to stop.
    ///
    /// Does nothing when no transfer runs. The attempt ends with
    /// [`Status::Cancelled`] once the transport notices.
    pub fn cancel(&self) {
        let token = self
            .shared
            .lock()
            .attempt
            .as_ref()
            .map(|attempt| attempt.cancel.clone());

        if let Some(token) = token {
            if !token.is_cancelled() {
                self.config.logger.info("Download cancelled");
                token.cancel();
            }
        }
    }

    /// Records transport progress and notifies subscribers.
    ///
    /// Ignored outside of a running transfer.
    pub fn on_progress(&self, bytes_received: u64, total_bytes: Option<u64>) {
        let progress = {
            let mut inner = self.shared.lock();
            if inner.state.status != Status::Downloading {
                return;
            }
            inner.state.record_progress(bytes_received, total_bytes);

            let Some(attempt) = inner.attempt.as_ref() else {
                return;
            };
            let progress = Progress {
                filename: attempt.request.filename.clone(),
                bytes_received: inner.state.bytes_received,
                total_bytes: inner.state.total_bytes,
                percent: inner.state.percent(),
                bytes_per_second: inner.state.bytes_per_second,
            };
            attempt.display.update(&progress);
            inner.progress_text = progress.text();
            progress
        };

        if let Some(ref callback) = self.config.on_progress {
            callback(&progress);
        }
        let _ = self.shared.events.send(Event::Progress(progress));
    }

    /// Runs the completion protocol for the transport's terminal `outcome`.
    ///
    /// Only the first call of an attempt has an effect.
    pub async fn on_completed(&self, outcome: Outcome) {
        let Some(attempt) = self.shared.lock().attempt.take() else {
            debug!("Ignoring completion without a running download");
            return;
        };
        attempt.stop_sampler.cancel();

        let summary = Summary::new(
            attempt.request.clone(),
            attempt.destination.clone(),
            self.bytes_received(),
        );

        let mut summary = match outcome {
            Outcome::Cancelled => {
                self.set_status(Status::Cancelled);
                self.delete_temporary_file(&attempt.temp_path).await;
                summary.with_status(Status::Cancelled)
            }
            Outcome::Failed(e) => {
                self.set_status(Status::Failed);
                self.config
                    .logger
                    .error("Error occurred downloading file", Some(&e));
                self.delete_temporary_file(&attempt.temp_path).await;
                summary.fail(e.detail())
            }
            Outcome::Completed => self.finalize(&attempt, summary).await,
        };

        if summary.status() == Status::Succeeded && attempt.request.run_on_finish {
            self.run_post_action(&attempt.destination, &mut summary).await;
        }

        attempt.display.finish(summary.message());
        self.complete(summary);
    }

    /// Waits for the current attempt to end and returns its summary.
    ///
    /// Returns the last summary right away when nothing runs, `None` if no
    /// attempt ever completed. A start rejected during validation yields the
    /// summary of the attempt before it.
    pub async fn wait(&self) -> Option<Summary> {
        let mut finished = self.shared.finished.subscribe();
        let last = match finished.wait_for(|f| !f.running).await {
            Ok(f) => f.last.clone(),
            Err(_) => None,
        };
        last
    }

    /// Subscribe to progress and completion events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.shared.events.subscribe()
    }

    /// Snapshot of the counters of the current (or last) attempt.
    pub fn state(&self) -> TransferState {
        self.shared.lock().state.clone()
    }

    pub fn status(&self) -> Status {
        self.shared.lock().state.status
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().running
    }

    pub fn bytes_received(&self) -> u64 {
        self.shared.lock().state.bytes_received
    }

    /// Size announced by the server, if any.
    pub fn total_bytes(&self) -> Option<u64> {
        self.shared.lock().state.total_bytes
    }

    pub fn bytes_per_second(&self) -> u64 {
        self.shared.lock().state.bytes_per_second
    }

    /// Speed as text, e.g. `"1.5 MB/s"`, once it has been sampled.
    pub fn speed(&self) -> Option<String> {
        format_speed(self.bytes_per_second())
    }

    /// Last `"<received> of <total>"` text.
    pub fn progress_text(&self) -> String {
        self.shared.lock().progress_text.clone()
    }

    /// Request of the current (or last) attempt.
    pub fn request(&self) -> Option<DownloadRequest> {
        self.shared.lock().request.clone()
    }

    /// Final path of the current (or last) attempt.
    pub fn destination(&self) -> Option<PathBuf> {
        self.shared.lock().destination.clone()
    }

    /// Path of the in-progress file of the current (or last) attempt.
    pub fn temp_path(&self) -> Option<PathBuf> {
        self.shared.lock().temp_path.clone()
    }

    fn reserve(&self) -> Result<()> {
        let mut inner = self.shared.lock();
        if inner.running {
            return Err(Error::AlreadyRunning);
        }
        inner.running = true;
        self.shared.finished.send_modify(|f| f.running = true);
        Ok(())
    }

    async fn prepare(&self, request: &DownloadRequest) -> Result<Prepared> {
        let logger = &self.config.logger;
        logger.info(&format!(
            "Url: {} - SaveAs: {} - CloseOnFinish: {} - RunOnFinish: {} - Headless: {}",
            request.url,
            request.filename,
            request.close_on_finish,
            request.run_on_finish,
            request.headless
        ));

        if !matches!(request.url.scheme(), "http" | "https") {
            logger.error("No valid URL specified", None);
            return Err(Error::InvalidRequest(format!(
                "Download URL must use http or https: {}",
                request.url
            )));
        }

        if !is_plain_filename(&request.filename) {
            logger.error("SaveAs path is not valid", None);
            return Err(Error::InvalidRequest(format!(
                "SaveAs must be a file name inside the download directory: {:?}",
                request.filename
            )));
        }

        let hash_type = match request.hash {
            Some(ref hash) => Some(detect_hash_type(hash).ok_or_else(|| {
                Error::InvalidRequest(format!("Unsupported hash format: {}", hash))
            })?),
            None => None,
        };

        if self.config.probe {
            if let Err(e) = self.transport.probe(&request.url).await {
                logger.error("Url was not valid", Some(&e));
                return Err(Error::InvalidRequest(format!(
                    "The specified url cannot be found: {}",
                    e.detail()
                )));
            }
        }

        let destination = self.config.directory.join(&request.filename);
        let temp_path = destination.with_file_name(request.temp_filename());

        if let Err(e) = validate_destination(&destination).await {
            logger.error("SaveAs path is not valid", Some(&e));
            return Err(Error::InvalidRequest(format!(
                "SaveAs path is not a valid path or filename: {}",
                e
            )));
        }

        Ok(Prepared {
            destination,
            temp_path,
            hash_type,
        })
    }

    fn launch(&self, request: DownloadRequest, prepared: Prepared) {
        let cancel = CancellationToken::new();
        let stop_sampler = CancellationToken::new();
        let display = ProgressDisplay::new(&self.config.style, &request);
        let url = request.url.clone();
        let temp_path = prepared.temp_path.clone();

        {
            let mut inner = self.shared.lock();
            inner.state = TransferState {
                status: Status::Downloading,
                ..TransferState::default()
            };
            inner.progress_text.clear();
            inner.request = Some(request.clone());
            inner.destination = Some(prepared.destination.clone());
            inner.temp_path = Some(prepared.temp_path.clone());
            inner.attempt = Some(Attempt {
                request,
                destination: prepared.destination,
                temp_path: prepared.temp_path,
                hash_type: prepared.hash_type,
                cancel: cancel.clone(),
                stop_sampler: stop_sampler.clone(),
                display,
            });
        }
        self.config.logger.info("Download started");

        let sampler = self.clone();
        SpeedSampler::new(self.config.sample_period)
            .spawn(stop_sampler, move |period| sampler.sample(period));

        let this = self.clone();
        tokio::spawn(async move {
            let progress = |received: u64, total: Option<u64>| this.on_progress(received, total);
            let outcome = this
                .transport
                .fetch(&url, &temp_path, cancel, &progress)
                .await;
            this.on_completed(outcome).await;
        });
    }

    fn sample(&self, period: Duration) -> bool {
        let mut inner = self.shared.lock();
        if inner.state.status != Status::Downloading {
            return false;
        }
        record_sample(&mut inner.state, period);
        true
    }

    fn set_status(&self, status: Status) {
        let mut inner = self.shared.lock();
        if inner.state.status == Status::Downloading {
            inner.state.status = status;
        }
    }

    /// Verifies the hash when one was requested, then moves the file in place.
    async fn finalize(&self, attempt: &Attempt, summary: Summary) -> Summary {
        let logger = &self.config.logger;

        if let (Some(hash_type), Some(expected)) = (attempt.hash_type, &attempt.request.hash) {
            let path = attempt.temp_path.clone();
            let hashed = tokio::task::spawn_blocking(move || hash_file(&path, hash_type)).await;
            let computed = match hashed {
                Ok(hashed) => hashed.map_err(Error::from),
                Err(e) => {
                    logger.exception(&e);
                    Err(Error::Internal(format!("Hashing task failed: {}", e)))
                }
            };

            match computed {
                Ok(actual) if compare(&actual, expected) => {}
                Ok(actual) => {
                    self.set_status(Status::HashMismatch);
                    logger.error(
                        &format!(
                            "Failed hash verification. Downloaded File Hash: {} Compare Hash: {}",
                            actual, expected
                        ),
                        None,
                    );
                    self.delete_temporary_file(&attempt.temp_path).await;
                    return summary.hash_mismatch(format!("Expected hash {}, got {}", expected, actual));
                }
                Err(e) => {
                    self.set_status(Status::Failed);
                    logger.error("Error verifying downloaded file", Some(&e));
                    self.delete_temporary_file(&attempt.temp_path).await;
                    return summary.fail(e.detail());
                }
            }
        }

        if let Err(e) = move_into_place(&attempt.temp_path, &attempt.destination).await {
            self.set_status(Status::Failed);
            logger.error(
                &format!("Error saving file {}", attempt.destination.display()),
                Some(&e),
            );
            self.delete_temporary_file(&attempt.temp_path).await;
            return summary.fail(Error::from(e).detail());
        }

        self.set_status(Status::Succeeded);
        logger.info(&format!(
            "File Downloaded Successfully - {}",
            attempt.destination.display()
        ));
        summary.with_status(Status::Succeeded)
    }

    /// Launches the saved file on the blocking pool; launchers may wait on the
    /// spawned process.
    async fn run_post_action(&self, destination: &Path, summary: &mut Summary) {
        let logger = &self.config.logger;
        let action = self.config.post_action.clone();
        let path = destination.to_path_buf();

        match tokio::task::spawn_blocking(move || action.launch(&path)).await {
            Ok(Ok(())) => logger.info(&format!("File opened: {}", destination.display())),
            Ok(Err(source)) => {
                let err = Error::PostAction {
                    path: destination.to_path_buf(),
                    source,
                };
                logger.error("Error trying to open downloaded file", Some(&err));
                summary.set_post_action_error(err.detail());
            }
            Err(e) => {
                logger.exception(&e);
                summary.set_post_action_error(format!(
                    "Error trying to run downloaded file {}: {}",
                    destination.display(),
                    e
                ));
            }
        }
    }

    /// Best-effort removal; failures are logged.
    async fn delete_temporary_file(&self, path: &Path) {
        match fs::remove_file(path).await {
            Ok(()) => debug!("Removed temporary file {:?}", path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => self.config.logger.error(
                &format!("Error deleting temporary file: {}", path.display()),
                Some(&e),
            ),
        }
    }

    fn complete(&self, summary: Summary) {
        {
            let mut inner = self.shared.lock();
            inner.running = false;
            self.shared.finished.send_replace(Finished {
                running: false,
                last: Some(summary.clone()),
            });
        }

        if let Some(ref callback) = self.config.on_complete {
            callback(&summary);
        }
        let _ = self.shared.events.send(Event::Completed(summary));
    }
}

/// Checks that `destination` can be written without altering an existing file.
async fn validate_destination(destination: &Path) -> std::io::Result<()> {
    if let Some(parent) = destination.parent() {
        debug!("Creating destination directory {:?}", parent);
        fs::create_dir_all(parent).await?;
    }

    if fs::try_exists(destination).await? {
        OpenOptions::new().write(true).open(destination).await?;
        return Ok(());
    }

    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
        .await?;
    fs::remove_file(destination).await
}

/// Replaces `destination` in one step, so a failed move leaves it as it was.
async fn move_into_place(temp_path: &Path, destination: &Path) -> std::io::Result<()> {
    fs::rename(temp_path, destination).await
}
