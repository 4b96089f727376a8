use crate::Host;
use runpoint_types::{FrameAddress, Symbol};
use std::ffi::c_void;
use std::num::NonZeroUsize;
use tracing::debug;

/// In-process host backed by the `backtrace` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeHost;

impl Host for NativeHost {
    #[inline(never)]
    fn capture_addresses(&self, skip: usize, max_depth: NonZeroUsize) -> Vec<FrameAddress> {
        // Skip is counted from this frame, found by its symbol address.
        let this: fn(&Self, usize, NonZeroUsize) -> Vec<FrameAddress> =
            <Self as Host>::capture_addresses;
        let addresses = walk(this as *const () as usize, skip, max_depth);
        // The anchor frame must stay on the stack: no tail call into `walk`.
        std::hint::black_box(&addresses);
        addresses
    }

    fn resolve(&self, address: FrameAddress) -> Symbol {
        if address.is_sentinel() {
            return Symbol::default();
        }

        let mut resolved: Option<Symbol> = None;
        // Inlined frames come innermost first; keep the first one.
        backtrace::resolve(address.get() as *mut c_void, |symbol| {
            if resolved.is_some() {
                return;
            }
            resolved = Some(Symbol {
                function: symbol
                    .name()
                    .map(|name| format!("{name:#}"))
                    .unwrap_or_default(),
                file: symbol
                    .filename()
                    .map(|path| path.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                line: symbol.lineno().unwrap_or(0),
            });
        });

        resolved.unwrap_or_else(|| {
            debug!(address = address.get(), "frame address did not resolve");
            Symbol::default()
        })
    }
}

/// Walks the current thread's stack. `skip == 0` starts at the caller of the
/// function whose entry address is `anchor`.
fn walk(anchor: usize, skip: usize, max_depth: NonZeroUsize) -> Vec<FrameAddress> {
    let mut seen = Vec::new();
    let mut anchor_index = None;

    backtrace::trace(|frame| {
        let ip = frame.ip() as usize;
        if ip == 0 {
            return true;
        }
        seen.push(FrameAddress::new(ip));
        if anchor_index.is_none() && frame.symbol_address() as usize == anchor {
            anchor_index = Some(seen.len() - 1);
        }
        // Once the anchor is known, stop as soon as enough frames are in hand.
        match anchor_index {
            Some(index) => seen.len() < index + 1 + skip + max_depth.get(),
            None => true,
        }
    });

    let start = match anchor_index {
        Some(index) => index + 1,
        None => {
            debug!(
                frames = seen.len(),
                "capture anchor frame not found; keeping the unfiltered stack"
            );
            0
        }
    };

    seen.into_iter()
        .skip(start + skip)
        .take(max_depth.get())
        .collect()
}
