use crate::frame::Frame;
use runpoint_capture::{Host, NativeHost};
use runpoint_types::FrameAddress;
use std::ops::ControlFlow;
use std::sync::{Arc, OnceLock};

/// A captured call stack.
///
/// The addresses are fixed when the handle is created. The first one is
/// resolved on the first metadata query and the resulting [`Frame`] is kept;
/// concurrent first queries resolve it exactly once. Walking the whole stack
/// resolves every address again and never touches that cached frame.
pub struct PCounter<H: Host = NativeHost> {
    stack: Vec<FrameAddress>,
    host: Arc<H>,
    first: OnceLock<Frame>,
}

impl<H: Host> PCounter<H> {
    /// Wraps already-captured addresses, outermost first.
    pub fn from_addresses(host: Arc<H>, stack: Vec<FrameAddress>) -> Self {
        Self {
            stack,
            host,
            first: OnceLock::new(),
        }
    }

    pub fn addresses(&self) -> &[FrameAddress] {
        &self.stack
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// The frame nearest the capture site. An empty stack gives [`Frame::unresolved`].
    pub fn first_frame(&self) -> &Frame {
        self.first.get_or_init(|| match self.stack.first() {
            Some(&address) => resolve(self.host.as_ref(), address),
            None => Frame::unresolved(),
        })
    }

    pub fn into_first_frame(self) -> Frame {
        self.first_frame();
        self.first.into_inner().unwrap_or_default()
    }

    /// Example: `github.com/goentf/runpoint.(*PCounter).FuncFull.func1`
    pub fn function_full(&self) -> &str {
        self.first_frame().function_full()
    }

    /// Example: `github.com/goentf/runpoint`
    pub fn package_path(&self) -> &str {
        self.first_frame().package_path()
    }

    /// Example: `runpoint`
    pub fn package(&self) -> &str {
        self.first_frame().package()
    }

    /// Example: `(*PCounter).FuncLong.func1`
    pub fn func_long(&self) -> &str {
        self.first_frame().func_long()
    }

    /// Example: `*PCounter`
    pub fn receiver(&self) -> &str {
        self.first_frame().receiver()
    }

    /// Example: `Function`
    pub fn function(&self) -> &str {
        self.first_frame().function()
    }

    pub fn dir(&self) -> &str {
        self.first_frame().dir()
    }

    pub fn file(&self) -> &str {
        self.first_frame().file()
    }

    pub fn filename(&self) -> &str {
        self.first_frame().filename()
    }

    pub fn line(&self) -> u32 {
        self.first_frame().line()
    }

    /// Resolves every captured address, outermost first, on each iteration.
    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        self.stack
            .iter()
            .map(move |&address| resolve(self.host.as_ref(), address))
    }

    /// Visits every frame and returns how many were visited.
    pub fn walk_frames(&self, mut visit: impl FnMut(&Frame)) -> usize {
        self.walk_frames_until(|frame| {
            visit(frame);
            ControlFlow::Continue(())
        })
    }

    /// Like [`PCounter::walk_frames`], but stops after the visitor breaks.
    /// The breaking frame is counted.
    pub fn walk_frames_until(&self, mut visit: impl FnMut(&Frame) -> ControlFlow<()>) -> usize {
        let mut visited = 0;
        for frame in self.frames() {
            visited += 1;
            if visit(&frame).is_break() {
                break;
            }
        }
        visited
    }
}

impl<H: Host> std::fmt::Debug for PCounter<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PCounter")
            .field("stack", &self.stack)
            .field("first", &self.first.get())
            .finish_non_exhaustive()
    }
}

fn resolve<H: Host + ?Sized>(host: &H, address: FrameAddress) -> Frame {
    if address.is_sentinel() {
        return Frame::unresolved();
    }
    Frame::new(host.resolve(address))
}
