use crate::pcounter::PCounter;
use runpoint_capture::{CaptureOptions, Host, NativeHost};
use runpoint_types::InvariantError;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Creates [`PCounter`]s against one host with an adjustable depth limit.
///
/// Changing the limit only affects captures started afterwards.
pub struct Capturer<H: Host = NativeHost> {
    host: Arc<H>,
    depth: AtomicUsize,
    skip_frames: usize,
}

impl<H: Host> Capturer<H> {
    pub fn new(host: H) -> Self {
        Self::with_options(host, CaptureOptions::default())
    }

    pub fn with_options(host: H, options: CaptureOptions) -> Self {
        Self::from_shared(Arc::new(host), options)
    }

    pub fn from_shared(host: Arc<H>, options: CaptureOptions) -> Self {
        Self {
            host,
            depth: AtomicUsize::new(options.max_frames.get()),
            skip_frames: options.skip_frames,
        }
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    pub fn depth_limit(&self) -> usize {
        self.depth.load(Ordering::Acquire)
    }

    /// Sets the maximum number of frames later captures request and returns
    /// the previous limit.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is zero. The stored limit is left untouched.
    pub fn set_depth_limit(&self, depth: usize) -> usize {
        match self.try_set_depth_limit(depth) {
            Ok(previous) => previous,
            Err(error) => panic!("invariant violated: {error}"),
        }
    }

    pub fn try_set_depth_limit(&self, depth: usize) -> Result<usize, InvariantError> {
        if depth == 0 {
            return Err(InvariantError::ZeroDepth);
        }
        let previous = self.depth.swap(depth, Ordering::AcqRel);
        debug!(previous, depth, "stack depth limit changed");
        Ok(previous)
    }

    /// Captures the stack starting at the caller of `capture`, skipping `skip`
    /// further frames.
    ///
    /// A caller that returns `capture(..)` directly may be compiled as a tail
    /// call in optimized builds, leaving no frame of its own; bind the result
    /// and use it before returning when that frame matters.
    #[inline(never)]
    pub fn capture(&self, skip: usize) -> PCounter<H> {
        let pc = self.capture_with_depth(skip + 1, self.current_depth());
        // Each layer between the caller and the host keeps its own frame.
        std::hint::black_box(&pc);
        pc
    }

    /// Like [`Capturer::capture`] with an explicit depth instead of the stored limit.
    #[inline(never)]
    pub fn capture_with_depth(&self, skip: usize, depth: NonZeroUsize) -> PCounter<H> {
        let addresses = self
            .host
            .capture_addresses(skip + 1 + self.skip_frames, depth);
        PCounter::from_addresses(Arc::clone(&self.host), addresses)
    }

    pub(crate) fn current_depth(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.depth_limit()).unwrap_or(NonZeroUsize::MIN)
    }
}

impl<H: Host + Default> Default for Capturer<H> {
    fn default() -> Self {
        Self::new(H::default())
    }
}

impl<H: Host> std::fmt::Debug for Capturer<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capturer")
            .field("depth", &self.depth_limit())
            .field("skip_frames", &self.skip_frames)
            .finish_non_exhaustive()
    }
}
