//! Live analysis pipeline
//!
//! One dedicated analysis thread runs frames strictly one at a time. Frames are
//! handed over through a single "latest frame" slot: a frame submitted while
//! another is still waiting replaces it, and the replaced frame is dropped
//! rather than queued. Accepted results are published on a channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::{Condvar, Mutex};

use crate::analyzer::QrAnalyzer;
use crate::decoder::BarcodeDecoder;
use crate::error::ScanError;
use crate::models::frame::check_packed;
use crate::models::{LumaFrame, ScanResult};
use crate::utils::frame_pool::FramePool;
use crate::utils::grayscale::rgba_to_luma_into;
use crate::viewfinder::SharedOverlay;

struct Slot {
    pending: Option<LumaFrame>,
    shutdown: bool,
}

struct Shared {
    slot: Mutex<Slot>,
    ready: Condvar,
    finished: AtomicBool,
    submitted: AtomicU64,
    dropped: AtomicU64,
    analyzed: AtomicU64,
}

/// Background scanner fed with camera frames
pub struct ScanPipeline {
    shared: Arc<Shared>,
    pool: FramePool,
    overlay: SharedOverlay,
    results: Receiver<ScanResult>,
    thread_handle: Option<JoinHandle<()>>,
}

impl ScanPipeline {
    /// Start the analysis thread with a fresh frame pool
    pub fn spawn<D: BarcodeDecoder + 'static>(analyzer: QrAnalyzer<D>) -> Result<Self, ScanError> {
        Self::spawn_with_pool(analyzer, FramePool::new())
    }

    /// Start the analysis thread, recycling frame buffers into `pool`
    pub fn spawn_with_pool<D: BarcodeDecoder + 'static>(
        analyzer: QrAnalyzer<D>,
        pool: FramePool,
    ) -> Result<Self, ScanError> {
        let shared = Arc::new(Shared {
            slot: Mutex::new(Slot {
                pending: None,
                shutdown: false,
            }),
            ready: Condvar::new(),
            finished: AtomicBool::new(false),
            submitted: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            analyzed: AtomicU64::new(0),
        });
        let (result_sender, results) = crossbeam_channel::unbounded();
        let overlay = analyzer.overlay().clone();

        let shared_clone = shared.clone();
        let pool_clone = pool.clone();
        let thread_handle = std::thread::Builder::new()
            .name("qr-analysis".to_string())
            .spawn(move || {
                Self::analysis_thread(analyzer, shared_clone, pool_clone, result_sender);
            })?;

        Ok(Self {
            shared,
            pool,
            overlay,
            results,
            thread_handle: Some(thread_handle),
        })
    }

    /// Analysis thread main loop
    fn analysis_thread<D: BarcodeDecoder>(
        mut analyzer: QrAnalyzer<D>,
        shared: Arc<Shared>,
        pool: FramePool,
        result_sender: Sender<ScanResult>,
    ) {
        log::info!("analysis thread started");

        loop {
            let frame = {
                let mut slot = shared.slot.lock();
                loop {
                    if slot.shutdown {
                        if let Some(stale) = slot.pending.take() {
                            pool.recycle(stale.into_data());
                        }
                        log::info!("analysis thread stopped");
                        return;
                    }
                    if let Some(frame) = slot.pending.take() {
                        break frame;
                    }
                    shared.ready.wait(&mut slot);
                }
            };

            let result = analyzer.analyze(&frame);
            shared.analyzed.fetch_add(1, Ordering::Relaxed);
            pool.recycle(frame.into_data());

            if let Some(result) = result {
                shared.finished.store(true, Ordering::Release);
                if result_sender.send(result).is_err() {
                    log::warn!("scan result dropped: receiver gone");
                }
            }
        }
    }

    /// Hand a luminance frame to the analysis thread without blocking.
    ///
    /// Returns `false` when the frame was discarded because scanning already
    /// finished, the pipeline is shutting down, or the analysis thread died.
    pub fn submit(&self, frame: LumaFrame) -> bool {
        if self.is_finished() {
            self.pool.recycle(frame.into_data());
            return false;
        }
        if !self.is_running() {
            log::warn!("analysis thread is gone; frame discarded");
            self.pool.recycle(frame.into_data());
            return false;
        }

        let sequence = self.shared.submitted.fetch_add(1, Ordering::Relaxed);
        let frame = frame.with_sequence(sequence);

        let mut slot = self.shared.slot.lock();
        if slot.shutdown {
            drop(slot);
            self.pool.recycle(frame.into_data());
            return false;
        }
        if let Some(stale) = slot.pending.replace(frame) {
            self.shared.dropped.fetch_add(1, Ordering::Relaxed);
            log::trace!("frame {} dropped: analysis busy", stale.sequence);
            self.pool.recycle(stale.into_data());
        }
        drop(slot);
        self.shared.ready.notify_one();
        true
    }

    /// Convert an RGBA camera frame into a pooled luminance buffer and submit it
    pub fn submit_rgba(&self, rgba: &[u8], width: u32, height: u32) -> Result<bool, ScanError> {
        check_packed(rgba, width, height, 4)?;

        let (w, h) = (width as usize, height as usize);
        let mut luma = self.pool.take(w * h);
        rgba_to_luma_into(rgba, w, h, &mut luma);
        let frame = LumaFrame::from_luma(luma, width, height)?;
        Ok(self.submit(frame))
    }

    /// Receiver of accepted scan results
    pub fn results(&self) -> &Receiver<ScanResult> {
        &self.results
    }

    /// Viewfinder shared with the analysis thread (resize it from the layout side)
    pub fn overlay(&self) -> &SharedOverlay {
        &self.overlay
    }

    /// True once a result has been produced
    pub fn is_finished(&self) -> bool {
        self.shared.finished.load(Ordering::Acquire)
    }

    /// False after shutdown, or when the analysis thread died (a decoder panic)
    pub fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Frames accepted by `submit`
    pub fn submitted_frames(&self) -> u64 {
        self.shared.submitted.load(Ordering::Relaxed)
    }

    /// Frames replaced in the slot before the analysis thread picked them up
    pub fn dropped_frames(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }

    /// Frames the analysis thread has taken and released
    pub fn analyzed_frames(&self) -> u64 {
        self.shared.analyzed.load(Ordering::Relaxed)
    }

    /// Stop the analysis thread and wait for it
    pub fn shutdown(&mut self) {
        {
            let mut slot = self.shared.slot.lock();
            slot.shutdown = true;
        }
        self.shared.ready.notify_all();

        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                log::error!("analysis thread panicked");
            }
        }
    }
}

impl Drop for ScanPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}
