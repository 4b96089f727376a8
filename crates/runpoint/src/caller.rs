//! One-shot queries about the calling function, backed by the process-wide
//! [`Capturer`].

use crate::capturer::Capturer;
use crate::frame::Frame;
use crate::pcounter::PCounter;
use runpoint_capture::{CaptureOptions, NativeHost};
use std::num::NonZeroUsize;
use std::sync::OnceLock;

static DEFAULT_CAPTURER: OnceLock<Capturer<NativeHost>> = OnceLock::new();

/// The capturer used by the free functions of this crate.
///
/// Created on first use; its depth limit starts at `RUNPOINT_STACK_DEPTH` or 32.
pub fn default_capturer() -> &'static Capturer<NativeHost> {
    DEFAULT_CAPTURER.get_or_init(|| Capturer::with_options(NativeHost, CaptureOptions::from_env()))
}

/// Sets the depth limit of the default capturer and returns the previous one.
///
/// # Panics
///
/// Panics if `depth` is zero.
pub fn set_depth_limit(depth: usize) -> usize {
    default_capturer().set_depth_limit(depth)
}

pub fn depth_limit() -> usize {
    default_capturer().depth_limit()
}

/// Captures the stack of the function calling `pc`, skipping `skip` further frames.
///
/// Optimized builds may turn `fn here() -> PCounter { pc(0) }` into a jump,
/// in which case `here` has no frame and its caller is reported instead.
#[inline(never)]
pub fn pc(skip: usize) -> PCounter {
    let capturer = default_capturer();
    let pc = capturer.capture_with_depth(skip + 1, capturer.current_depth());
    std::hint::black_box(&pc);
    pc
}

/// The frame of the function calling `caller`, skipping `skip` further frames.
#[inline(never)]
pub fn caller(skip: usize) -> Frame {
    default_capturer()
        .capture_with_depth(skip + 1, NonZeroUsize::MIN)
        .into_first_frame()
}

/// Full name of the calling function.
#[inline(never)]
pub fn func_full() -> String {
    caller(1).function_full().to_owned()
}

/// Package path of the calling function.
#[inline(never)]
pub fn pack_full() -> String {
    caller(1).package_path().to_owned()
}

/// Last component of the calling function's package path.
#[inline(never)]
pub fn package() -> String {
    caller(1).package().to_owned()
}

/// Name of the calling function after its package, closures included.
#[inline(never)]
pub fn func_long() -> String {
    caller(1).func_long().to_owned()
}

/// Receiver type of the calling method, empty for free functions.
#[inline(never)]
pub fn receiver() -> String {
    caller(1).receiver().to_owned()
}

/// Short name of the calling function.
#[inline(never)]
pub fn function() -> String {
    caller(1).function().to_owned()
}

#[inline(never)]
pub fn dir() -> String {
    caller(1).dir().to_owned()
}

#[inline(never)]
pub fn file() -> String {
    caller(1).file().to_owned()
}

#[inline(never)]
pub fn filename() -> String {
    caller(1).filename().to_owned()
}

#[inline(never)]
pub fn line() -> u32 {
    caller(1).line()
}
