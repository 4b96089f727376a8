use runpoint_capture::Host;
use runpoint_types::{FrameAddress, Symbol};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Host with a fixed stack and a fixed symbol table. Counts resolutions and
/// records every capture request.
#[derive(Default)]
pub(crate) struct TableHost {
    stack: Vec<FrameAddress>,
    symbols: HashMap<FrameAddress, Symbol>,
    delay: Option<Duration>,
    resolutions: AtomicUsize,
    requests: Mutex<Vec<(usize, usize)>>,
}

impl TableHost {
    /// `0x10` → `0x20` → `0x30`, innermost first.
    pub(crate) fn demo() -> Self {
        Self {
            stack: [0x10, 0x20, 0x30].map(FrameAddress::new).to_vec(),
            symbols: HashMap::from([
                (
                    FrameAddress::new(0x10),
                    Symbol::new(
                        "example.com/svc.(*Server).Inner.func1",
                        "/src/svc/server.go",
                        42,
                    ),
                ),
                (
                    FrameAddress::new(0x20),
                    Symbol::new("example.com/svc.Outer", "/src/svc/server.go", 17),
                ),
                (
                    FrameAddress::new(0x30),
                    Symbol::new("main.main", "/src/main.go", 7),
                ),
            ]),
            ..Self::default()
        }
    }

    pub(crate) fn with_delay(mut self) -> Self {
        self.delay = Some(Duration::from_millis(20));
        self
    }

    pub(crate) fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::SeqCst)
    }

    /// `(skip, max_depth)` for every capture so far.
    pub(crate) fn requests(&self) -> Vec<(usize, usize)> {
        self.requests.lock().expect("requests lock poisoned").clone()
    }
}

impl Host for TableHost {
    fn capture_addresses(&self, skip: usize, max_depth: NonZeroUsize) -> Vec<FrameAddress> {
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push((skip, max_depth.get()));
        self.stack
            .iter()
            .copied()
            .skip(skip)
            .take(max_depth.get())
            .collect()
    }

    fn resolve(&self, address: FrameAddress) -> Symbol {
        self.resolutions.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.symbols.get(&address).cloned().unwrap_or_default()
    }
}
