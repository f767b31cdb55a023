// THEORY:
// The `ControlLoop` owns the frame source and transport sink for a whole run and
// drives the per-frame pipeline between them. It is a small state machine:
//
//   INITIALIZING ──acquire ok──▶ RUNNING ──end of stream / interrupt──▶ TERMINATED
//        │                          │
//        └──acquire failed──▶ FAULTED ◀──too many consecutive write failures
//
// Key principles:
// 1.  **Single owner**: source and sink are created by factories the loop calls
//     itself, so no handle exists outside the loop. Each lives in a scope guard
//     that releases it exactly once on every exit path.
// 2.  **Synchronous and blocking**: one frame is pulled, fully processed and (maybe)
//     transmitted before the next pull. There is no pipelining.
// 3.  **No signal when uncertain**: if either marker is missing, nothing is written
//     for that frame. A skipped frame is not a zero vector.
// 4.  **Cooperative cancellation**: a watch flag is checked once per iteration,
//     before the pull. A diagnostic observer may also request an interrupt after
//     seeing a frame. An iteration in progress always completes.
// 5.  **No retries**: a failed pull ends the run. A failed write is reported and the
//     loop moves on, escalating to FAULTED only after a run of consecutive failures.

use crate::core_modules::frame::Frame;
use crate::error::{AcquireError, SinkError, SourceError};
use crate::pipeline::{FrameAnalysis, Report, TrackingPipeline};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Consecutive write failures tolerated before the loop faults.
pub const DEFAULT_MAX_CONSECUTIVE_WRITE_FAILURES: u32 = 30;

/// Anything that yields frames, one per call.
pub trait FrameSource {
    /// `Ok(None)` signals end of stream.
    fn try_read(&mut self) -> Result<Option<Frame>, SourceError>;

    /// Releases the underlying device. Called exactly once by the loop.
    fn release(&mut self) {}
}

/// Anything that accepts encoded command bytes.
pub trait CommandSink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError>;

    /// Closes the underlying transport. Called exactly once by the loop.
    fn close(&mut self) {}
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn try_read(&mut self) -> Result<Option<Frame>, SourceError> {
        (**self).try_read()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

impl<T: CommandSink + ?Sized> CommandSink for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        (**self).write(bytes)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// What a diagnostic front end wants after seeing a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverSignal {
    Continue,
    Interrupt,
}

/// Optional diagnostic hook, called once per processed frame after transmission.
pub trait FrameObserver {
    fn observe(&mut self, frame: &Frame, analysis: &FrameAnalysis) -> ObserverSignal;
}

/// Why a run ended gracefully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The source reported end of stream.
    EndOfStream,
    /// The source failed mid-run. Treated as terminal, not retried.
    SourceFailed(SourceError),
    /// An operator interrupt (cancellation flag or observer).
    Interrupted,
}

/// Why a run faulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultCause {
    Acquire(AcquireError),
    SinkFailed {
        consecutive_failures: u32,
        last_error: SinkError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopState {
    Initializing,
    Running,
    Terminated(TerminationReason),
    Faulted(FaultCause),
}

impl LoopState {
    pub fn is_faulted(&self) -> bool {
        matches!(self, LoopState::Faulted(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopOptions {
    /// `Some(n)` faults after `n` consecutive write failures (0 behaves like 1).
    /// `None` never escalates.
    pub max_consecutive_write_failures: Option<u32>,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            max_consecutive_write_failures: Some(DEFAULT_MAX_CONSECUTIVE_WRITE_FAILURES),
        }
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopReport {
    pub state: LoopState,
    pub frames_processed: u64,
    pub commands_sent: u64,
    pub frames_skipped: u64,
    pub write_failures: u64,
}

impl LoopReport {
    fn new() -> Self {
        Self {
            state: LoopState::Initializing,
            frames_processed: 0,
            commands_sent: 0,
            frames_skipped: 0,
            write_failures: 0,
        }
    }
}

/// Releases the source exactly once when dropped.
struct SourceGuard<S: FrameSource>(S);

impl<S: FrameSource> Drop for SourceGuard<S> {
    fn drop(&mut self) {
        self.0.release();
        debug!("frame source released");
    }
}

/// Closes the sink exactly once when dropped.
struct SinkGuard<K: CommandSink>(K);

impl<K: CommandSink> Drop for SinkGuard<K> {
    fn drop(&mut self) {
        self.0.close();
        debug!("transport sink closed");
    }
}

/// The top-level controller: one instance per run.
pub struct ControlLoop {
    pipeline: TrackingPipeline,
    options: LoopOptions,
    cancel: Option<watch::Receiver<bool>>,
    state: LoopState,
}

impl ControlLoop {
    pub fn new(pipeline: TrackingPipeline, options: LoopOptions) -> Self {
        Self {
            pipeline,
            options,
            cancel: None,
            state: LoopState::Initializing,
        }
    }

    /// Stops the run (after the current iteration) once the flag turns `true`.
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    /// Acquires the sink then the source, runs until a terminal state, and
    /// releases whatever was acquired.
    pub fn run<S, K, FS, FK>(
        mut self,
        open_source: FS,
        open_sink: FK,
        mut observer: Option<&mut dyn FrameObserver>,
    ) -> LoopReport
    where
        S: FrameSource,
        K: CommandSink,
        FS: FnOnce() -> Result<S, AcquireError>,
        FK: FnOnce() -> Result<K, AcquireError>,
    {
        let mut report = LoopReport::new();

        // --- INITIALIZING ---
        let mut sink = match open_sink() {
            Ok(sink) => SinkGuard(sink),
            Err(err) => return self.fault(report, FaultCause::Acquire(err)),
        };
        let mut source = match open_source() {
            Ok(source) => SourceGuard(source),
            Err(err) => {
                drop(sink);
                return self.fault(report, FaultCause::Acquire(err));
            }
        };
        self.transition(LoopState::Running);

        // --- RUNNING ---
        let mut consecutive_failures = 0u32;
        let next_state = loop {
            if self.cancel_requested() {
                break LoopState::Terminated(TerminationReason::Interrupted);
            }

            let frame = match source.0.try_read() {
                Ok(Some(frame)) => frame,
                Ok(None) => break LoopState::Terminated(TerminationReason::EndOfStream),
                Err(err) => {
                    warn!("frame source failed: {err}");
                    break LoopState::Terminated(TerminationReason::SourceFailed(err));
                }
            };
            report.frames_processed += 1;

            let analysis = self.pipeline.analyze(&frame);
            match analysis.report {
                Report::Transmit(command) => match sink.0.write(&command.to_bytes()) {
                    Ok(()) => {
                        consecutive_failures = 0;
                        report.commands_sent += 1;
                        log_transmission(&analysis, &command.to_string());
                    }
                    Err(err) => {
                        consecutive_failures += 1;
                        report.write_failures += 1;
                        warn!(consecutive_failures, "dropping command {command}: {err}");
                        if let Some(limit) = self.options.max_consecutive_write_failures {
                            if consecutive_failures >= limit.max(1) {
                                break LoopState::Faulted(FaultCause::SinkFailed {
                                    consecutive_failures,
                                    last_error: err,
                                });
                            }
                        }
                    }
                },
                Report::NoSignal(missing) => {
                    report.frames_skipped += 1;
                    debug!(?missing, "marker not found, skipping transmission");
                }
                Report::Degenerate => {
                    report.frames_skipped += 1;
                    debug!("frame has no extent, skipping transmission");
                }
            }

            if let Some(observer) = observer.as_deref_mut() {
                if observer.observe(&frame, &analysis) == ObserverSignal::Interrupt {
                    break LoopState::Terminated(TerminationReason::Interrupted);
                }
            }
        };

        // --- TERMINATED / FAULTED ---
        drop(source);
        drop(sink);
        if let LoopState::Faulted(cause) = &next_state {
            error!("control loop faulted: {cause:?}");
        }
        self.transition(next_state);
        report.state = self.state.clone();
        info!(
            frames = report.frames_processed,
            sent = report.commands_sent,
            skipped = report.frames_skipped,
            write_failures = report.write_failures,
            "control loop stopped"
        );
        report
    }

    fn fault(&mut self, mut report: LoopReport, cause: FaultCause) -> LoopReport {
        error!("control loop faulted during initialization: {cause:?}");
        self.transition(LoopState::Faulted(cause));
        report.state = self.state.clone();
        report
    }

    fn cancel_requested(&self) -> bool {
        self.cancel.as_ref().is_some_and(|cancel| *cancel.borrow())
    }

    fn transition(&mut self, next: LoopState) {
        debug!(from = ?self.state, to = ?next, "control loop transition");
        self.state = next;
    }
}

fn log_transmission(analysis: &FrameAnalysis, payload: &str) {
    if let (Some(d), Some(v)) = (analysis.displacement, analysis.vector) {
        info!(
            "tx dx={}, dy={} (norm: {:.2}, {:.2}) -> {payload}",
            d.dx, d.dy, v.x, v.y
        );
    }
}
