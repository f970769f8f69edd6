//! The merge orchestrator.
//!
//! [`Merger`] owns the ordered entry list of a session and runs merges over
//! it. A merge moves the session from `Idle` to `Merging` and back:
//!
//! 1. [`Merger::begin_merge`] snapshots the entries and freezes the list.
//! 2. [`MergeJob::run`] resolves every page specification and composes the
//!    output on a blocking worker.
//! 3. [`Merger::finish_merge`] unfreezes the list and keeps the output if
//!    the merge succeeded.
//!
//! [`Merger::merge`] runs all three steps. A failed merge never produces
//! output and never changes the entry list or a previous output.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::task;
use tracing::{debug, info, warn};

use crate::backend::{DocumentBackend, LopdfBackend};
use crate::config::MergeConfig;
use crate::error::{PdfMergeError, Result};
use crate::io::intake::{FileIntake, RejectedFile};
use crate::merge::entries::{EntryList, Reorderable, SourceEntry, SourceFile};
use crate::merge::plan::MergePlan;
use crate::utils::format_file_size;

/// Whether a merge is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeState {
    /// Entries may be changed freely.
    #[default]
    Idle,
    /// A merge job holds a snapshot; entries are frozen.
    Merging,
}

/// Statistics about a merge operation.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of entries that contributed pages.
    pub entries_merged: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Size of the serialized output in bytes.
    pub output_size: u64,

    /// Time taken to compose and serialize the output.
    pub merge_time: Duration,
}

impl MergeStatistics {
    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// The serialized result of a successful merge.
#[derive(Clone)]
pub struct MergeOutput {
    /// The merged document.
    pub bytes: Vec<u8>,

    /// File name the output should be offered under, e.g. `merged.pdf`.
    pub file_name: String,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

impl std::fmt::Debug for MergeOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergeOutput")
            .field("file_name", &self.file_name)
            .field("size", &self.bytes.len())
            .field("statistics", &self.statistics)
            .finish()
    }
}

/// Outcome of adding a batch of files.
#[derive(Debug, Default)]
pub struct AddReport {
    /// Positions of the entries created, in input order.
    pub added: Vec<usize>,

    /// Files that were not added, with the reason.
    pub rejected: Vec<RejectedFile>,
}

impl AddReport {
    /// Whether every file of the batch was added.
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }

    fn reject(&mut self, name: String, error: PdfMergeError) {
        self.rejected.push(RejectedFile { name, error });
    }
}

/// Cancels the merge job it was taken from.
///
/// A cancelled job stops before copying the next entry and returns
/// [`PdfMergeError::Cancelled`] without output.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A merge over a frozen snapshot of the entry list.
///
/// Obtained from [`Merger::begin_merge`]; its result must be handed back to
/// [`Merger::finish_merge`] to unfreeze the session. A job dropped without
/// finishing leaves the session `Merging` until [`Merger::abort_merge`].
#[must_use = "a merge job does nothing until run, and the session stays frozen until finish_merge"]
pub struct MergeJob<B: DocumentBackend> {
    entries: Vec<SourceEntry>,
    backend: Arc<B>,
    file_name: String,
    cancel: CancelHandle,
}

impl<B: DocumentBackend> MergeJob<B> {
    /// The entries being merged, as they were when the merge began.
    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    /// A handle that cancels this job.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Resolve every entry and compose the merged output.
    ///
    /// # Errors
    ///
    /// - [`PdfMergeError::InvalidPageSpec`] if an entry's page specification
    ///   does not resolve; nothing is composed in that case.
    /// - [`PdfMergeError::MergeIo`] if the backend fails on an entry or while
    ///   serializing.
    /// - [`PdfMergeError::Cancelled`] if the job was cancelled.
    pub async fn run(self) -> Result<MergeOutput> {
        let plan = MergePlan::build(&self.entries)?;
        debug!(
            entries = self.entries.len(),
            pages = plan.total_pages(),
            "resolved merge plan"
        );

        let Self {
            entries,
            backend,
            file_name,
            cancel,
        } = self;

        task::spawn_blocking(move || {
            compose(backend.as_ref(), &entries, &plan, file_name, &cancel)
        })
        .await
        .map_err(|e| PdfMergeError::output_io(format!("merge worker failed: {e}")))?
    }
}

/// Copy the planned pages of every entry into one document and serialize it.
///
/// The target is a local of this function, so any early return drops the
/// partially built document.
fn compose<B: DocumentBackend>(
    backend: &B,
    entries: &[SourceEntry],
    plan: &MergePlan,
    file_name: String,
    cancel: &CancelHandle,
) -> Result<MergeOutput> {
    let start = Instant::now();
    let mut target = backend.create_target();

    for planned in plan.entries() {
        if cancel.is_cancelled() {
            warn!(entry = planned.entry, "merge cancelled");
            return Err(PdfMergeError::Cancelled);
        }

        let entry = &entries[planned.entry];
        debug!(
            entry = planned.entry,
            name = entry.name(),
            pages = planned.pages.len(),
            "copying pages"
        );

        let source = backend
            .open(entry.bytes())
            .map_err(|e| PdfMergeError::entry_io(planned.entry, entry.name(), e.message()))?;
        backend
            .copy_pages(&mut target, source, &planned.pages)
            .map_err(|e| PdfMergeError::entry_io(planned.entry, entry.name(), e.message()))?;
    }

    let total_pages = backend.target_page_count(&target);
    let bytes = backend
        .save(target)
        .map_err(|e| PdfMergeError::output_io(e.message()))?;

    let statistics = MergeStatistics {
        entries_merged: plan.entries().len(),
        total_pages,
        output_size: bytes.len() as u64,
        merge_time: start.elapsed(),
    };

    Ok(MergeOutput {
        bytes,
        file_name,
        statistics,
    })
}

/// Resets the session when an in-flight [`Merger::merge`] is dropped.
struct IdleOnDrop<'a> {
    state: &'a mut MergeState,
    cancel: CancelHandle,
}

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        // A finished job ignores the flag.
        self.cancel.cancel();
        *self.state = MergeState::Idle;
    }
}

/// A merge session: the ordered entries and the latest merged output.
pub struct Merger<B: DocumentBackend = LopdfBackend> {
    entries: EntryList,
    backend: Arc<B>,
    config: MergeConfig,
    state: MergeState,
    last_output: Option<MergeOutput>,
}

impl Merger<LopdfBackend> {
    /// Create a session backed by lopdf.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: MergeConfig) -> Result<Self> {
        let backend = LopdfBackend::from_config(&config);
        Self::with_backend(backend, config)
    }
}

impl<B: DocumentBackend> Merger<B> {
    /// Create a session using a custom document backend.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::InvalidConfig`] if the configuration is invalid.
    pub fn with_backend(backend: B, config: MergeConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            entries: EntryList::new(),
            backend: Arc::new(backend),
            config,
            state: MergeState::Idle,
            last_output: None,
        })
    }

    /// The session configuration.
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Current entries in merge order.
    pub fn entries(&self) -> &[SourceEntry] {
        self.entries.as_slice()
    }

    /// Whether a merge is running.
    pub fn state(&self) -> MergeState {
        self.state
    }

    /// Output of the most recent successful merge.
    pub fn last_output(&self) -> Option<&MergeOutput> {
        self.last_output.as_ref()
    }

    /// Take the output of the most recent successful merge.
    pub fn take_output(&mut self) -> Option<MergeOutput> {
        self.last_output.take()
    }

    fn ensure_idle(&self) -> Result<()> {
        match self.state {
            MergeState::Idle => Ok(()),
            MergeState::Merging => Err(PdfMergeError::MergeInProgress),
        }
    }

    /// Open each file to learn its page count and append it as a new entry.
    ///
    /// The batch goes through the same limit and extension filter as
    /// [`Merger::add_paths`]. Files are appended at the tail in input order.
    /// A file with the wrong extension or one the backend cannot open is
    /// reported in [`AddReport::rejected`] and does not stop the rest of the
    /// batch.
    ///
    /// # Errors
    ///
    /// - [`PdfMergeError::MergeInProgress`] while a merge is running.
    /// - [`PdfMergeError::TooManyFiles`] if the batch exceeds the limit;
    ///   nothing is added in that case.
    pub async fn add_entries(&mut self, files: Vec<SourceFile>) -> Result<AddReport> {
        self.ensure_idle()?;

        let batch = FileIntake::new(&self.config).filter_files(files)?;
        let mut report = self.open_entries(batch.accepted).await;

        let mut rejected = batch.rejected;
        rejected.append(&mut report.rejected);
        report.rejected = rejected;

        Ok(report)
    }

    async fn open_entries(&mut self, files: Vec<SourceFile>) -> AddReport {
        let opens = files.into_iter().map(|file| {
            let backend = Arc::clone(&self.backend);
            async move {
                let bytes = Arc::clone(&file.bytes);
                let opened = task::spawn_blocking(move || {
                    backend
                        .open(&bytes)
                        .map(|source| backend.page_count(&source))
                })
                .await;
                (file, opened)
            }
        });

        let mut report = AddReport::default();
        for (file, opened) in join_all(opens).await {
            let page_count = match opened {
                Ok(Ok(page_count)) => page_count,
                Ok(Err(e)) => {
                    warn!(name = %file.name, reason = e.message(), "rejected file");
                    let error = PdfMergeError::failed_to_open(&file.name, e.message());
                    report.reject(file.name, error);
                    continue;
                }
                Err(e) => {
                    warn!(name = %file.name, error = %e, "page count worker failed");
                    let error = PdfMergeError::failed_to_open(&file.name, e.to_string());
                    report.reject(file.name, error);
                    continue;
                }
            };

            debug!(name = %file.name, page_count, "added entry");
            let index = self.entries.push(SourceEntry::new(file, page_count));
            report.added.push(index);
        }

        info!(
            added = report.added.len(),
            rejected = report.rejected.len(),
            total = self.entries.len(),
            "added files"
        );
        report
    }

    /// Read files from disk through intake, then add them as entries.
    ///
    /// Rejections from intake (unsupported extension, unreadable file) come
    /// first in the report, in selection order, followed by files the
    /// backend could not open.
    ///
    /// # Errors
    ///
    /// - [`PdfMergeError::MergeInProgress`] while a merge is running.
    /// - [`PdfMergeError::TooManyFiles`] if the batch exceeds the limit.
    pub async fn add_paths(&mut self, paths: &[PathBuf]) -> Result<AddReport> {
        self.ensure_idle()?;

        let batch = FileIntake::new(&self.config).read_paths(paths).await?;
        let mut report = self.open_entries(batch.accepted).await;

        let mut rejected = batch.rejected;
        rejected.append(&mut report.rejected);
        report.rejected = rejected;

        Ok(report)
    }

    /// Remove and return the entry at `index`.
    ///
    /// # Errors
    ///
    /// - [`PdfMergeError::MergeInProgress`] while a merge is running.
    /// - [`PdfMergeError::IndexOutOfRange`] if there is no such entry.
    pub fn remove_entry(&mut self, index: usize) -> Result<SourceEntry> {
        self.ensure_idle()?;
        let removed = self.entries.remove(index)?;
        debug!(index, name = removed.name(), "removed entry");
        Ok(removed)
    }

    /// Replace the page specification of the entry at `index`.
    ///
    /// The text is stored as typed; it is only parsed when a merge runs, so
    /// half-typed specifications are fine in the meantime.
    ///
    /// # Errors
    ///
    /// - [`PdfMergeError::MergeInProgress`] while a merge is running.
    /// - [`PdfMergeError::IndexOutOfRange`] if there is no such entry.
    pub fn set_page_spec(&mut self, index: usize, spec: impl Into<String>) -> Result<()> {
        self.ensure_idle()?;
        let spec: String = spec.into();
        self.entries.set_page_spec(index, spec.as_str())?;
        debug!(index, spec = %spec, "set page spec");
        Ok(())
    }

    /// Resolve every entry's page specification without composing anything.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::InvalidPageSpec`] for the first entry whose
    /// specification does not resolve.
    pub fn plan(&self) -> Result<MergePlan> {
        MergePlan::build(self.entries.as_slice())
    }

    /// Freeze the entry list and hand out a job merging a snapshot of it.
    ///
    /// # Errors
    ///
    /// - [`PdfMergeError::MergeInProgress`] if a merge is already running.
    /// - [`PdfMergeError::NoFilesToMerge`] if there are no entries.
    pub fn begin_merge(&mut self) -> Result<MergeJob<B>> {
        self.ensure_idle()?;
        if self.entries.is_empty() {
            return Err(PdfMergeError::NoFilesToMerge);
        }

        self.state = MergeState::Merging;
        info!(entries = self.entries.len(), "merge started");

        Ok(MergeJob {
            entries: self.entries.as_slice().to_vec(),
            backend: Arc::clone(&self.backend),
            file_name: self.config.output_file_name(),
            cancel: CancelHandle::default(),
        })
    }

    /// Unfreeze the entry list and record the outcome of a merge job.
    ///
    /// A successful output replaces the previous one. On failure the
    /// previous output, if any, is kept and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the job's error unchanged.
    pub fn finish_merge(&mut self, outcome: Result<MergeOutput>) -> Result<&MergeOutput> {
        self.state = MergeState::Idle;

        match outcome {
            Ok(output) => {
                info!(
                    pages = output.statistics.total_pages,
                    size = %output.statistics.format_output_size(),
                    elapsed_ms = output.statistics.merge_time.as_millis() as u64,
                    "merge finished"
                );
                Ok(&*self.last_output.insert(output))
            }
            Err(e) => {
                warn!(error = %e, "merge failed");
                Err(e)
            }
        }
    }

    /// Merge all entries in order into a single document.
    ///
    /// # Errors
    ///
    /// See [`Merger::begin_merge`] and [`MergeJob::run`]. On error the entry
    /// list and any previous output are unchanged.
    ///
    /// Dropping the returned future before it completes cancels the merge
    /// and returns the session to `Idle`.
    pub async fn merge(&mut self) -> Result<&MergeOutput> {
        let job = self.begin_merge()?;
        let outcome = {
            let _guard = IdleOnDrop {
                state: &mut self.state,
                cancel: job.cancel_handle(),
            };
            job.run().await
        };
        self.finish_merge(outcome)
    }

    /// Return to `Idle` without recording an outcome.
    ///
    /// For a [`MergeJob`] that was dropped instead of being handed to
    /// [`Merger::finish_merge`]. Cancel a job that is still running through
    /// its [`CancelHandle`] first. Returns whether a merge was in progress.
    pub fn abort_merge(&mut self) -> bool {
        let was_merging = self.state == MergeState::Merging;
        if was_merging {
            warn!("merge aborted");
        }
        self.state = MergeState::Idle;
        was_merging
    }
}

impl<B: DocumentBackend> Reorderable for Merger<B> {
    fn move_entry(&mut self, from: usize, to: usize) -> Result<()> {
        self.ensure_idle()?;
        self.entries.move_entry(from, to)?;
        debug!(from, to, "moved entry");
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
