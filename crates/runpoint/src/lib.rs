//! Call-site introspection.
//!
//! [`pc`] captures the current call stack into a [`PCounter`]. Its first frame
//! is resolved lazily, exactly once, and answers questions about the code that
//! asked: function name, package, receiver, source file and line.
//!
//! ```rust,no_run
//! fn handle_request() {
//!     let here = runpoint::pc(0);
//!     println!("{} at {}:{}", here.function(), here.filename(), here.line());
//!
//!     here.walk_frames(|frame| println!("  {frame}"));
//! }
//! ```
//!
//! Function names are split into components by [`name::parse`], which accepts
//! both dotted `path/to/pkg.(*Type).Method.func1` names and Rust paths such as
//! `krate::module::Type::method::{{closure}}`.
//!
//! Resolution gaps never fail: an address that cannot be resolved, or an empty
//! stack, yields empty strings and line 0.
//!
//! # Configuration
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `RUNPOINT_STACK_DEPTH` | Initial depth limit of the default capturer (default 32). |
//!
//! Use [`Capturer`] for an independent depth limit or a custom [`Host`].

pub mod name;

mod caller;
mod capturer;
mod frame;
mod pcounter;

#[cfg(test)]
mod testing;

pub use self::caller::*;
pub use self::capturer::Capturer;
pub use self::frame::Frame;
pub use self::pcounter::PCounter;

pub use runpoint_capture::{CaptureOptions, Host, NativeHost, STACK_DEPTH_ENV};
pub use runpoint_types::{FrameAddress, InvariantError, NameParts, Symbol};
