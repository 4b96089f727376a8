//! Stack capture and symbol resolution for `runpoint`.
//!
//! The [`Host`] trait is the seam between the capture handle and whatever can
//! walk and symbolize the current stack. [`NativeHost`] does it in-process with
//! the `backtrace` crate; tests substitute their own hosts.

use runpoint_types::{FrameAddress, InvariantError, Symbol};
use std::num::NonZeroUsize;
use tracing::warn;

mod native;

pub use native::NativeHost;

/// Environment variable overriding the default maximum capture depth.
pub const STACK_DEPTH_ENV: &str = "RUNPOINT_STACK_DEPTH";

pub const DEFAULT_MAX_FRAMES: usize = 32;

/// Stack walking and symbolization provided by the host runtime.
pub trait Host: Send + Sync {
    /// Returns up to `max_depth` addresses, outermost-first.
    ///
    /// With `skip == 0` the first address is the frame of the function that
    /// called `capture_addresses`. Sentinel addresses are never returned; a
    /// stack shorter than `skip` yields an empty vector.
    fn capture_addresses(&self, skip: usize, max_depth: NonZeroUsize) -> Vec<FrameAddress>;

    /// Resolves one address. Unresolvable and sentinel addresses give `Symbol::default()`.
    fn resolve(&self, address: FrameAddress) -> Symbol;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    pub max_frames: NonZeroUsize,
    pub skip_frames: usize,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            max_frames: NonZeroUsize::new(DEFAULT_MAX_FRAMES)
                .expect("invariant violated: default max_frames must be non-zero"),
            skip_frames: 0,
        }
    }
}

impl CaptureOptions {
    /// Defaults, with `max_frames` taken from `RUNPOINT_STACK_DEPTH` when it is set.
    ///
    /// A malformed value is reported and ignored.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        let Some(raw) = std::env::var(STACK_DEPTH_ENV)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        else {
            return options;
        };

        match Self::parse_depth(&raw) {
            Ok(depth) => options.max_frames = depth,
            Err(error) => warn!(
                env = STACK_DEPTH_ENV,
                %error,
                default = DEFAULT_MAX_FRAMES,
                "ignoring stack depth override"
            ),
        }
        options
    }

    pub fn parse_depth(raw: &str) -> Result<NonZeroUsize, InvariantError> {
        let value: usize = raw
            .trim()
            .parse()
            .map_err(|_| InvariantError::InvalidDepthValue(raw.to_string()))?;
        NonZeroUsize::new(value).ok_or(InvariantError::ZeroDepth)
    }
}
