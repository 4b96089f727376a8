use facet::Facet;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    ZeroDepth,
    InvalidDepthValue(String),
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDepth => write!(f, "stack depth limit must be at least 1"),
            Self::InvalidDepthValue(raw) => {
                write!(f, "stack depth limit must be a positive integer, got {raw:?}")
            }
        }
    }
}

impl Error for InvariantError {}

/// Opaque token for one activation record, as handed out by the host's stack walker.
///
/// Only meaningful as a resolution key inside the process that captured it.
#[derive(Facet, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameAddress(usize);

impl FrameAddress {
    /// The "no frame" address.
    pub const SENTINEL: Self = Self(0);

    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    pub const fn get(self) -> usize {
        self.0
    }

    pub const fn is_sentinel(self) -> bool {
        self.0 == 0
    }
}

impl fmt::LowerHex for FrameAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// What the host reports for one address. The default value means "unresolved".
#[derive(Facet, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub function: String,
    pub file: String,
    pub line: u32,
}

impl Symbol {
    pub fn new(function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            function: function.into(),
            file: file.into(),
            line,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.function.is_empty() || !self.file.is_empty() || self.line != 0
    }
}

/// Components of a qualified function name.
///
/// For `github.com/goentf/runpoint.(*PCounter).FuncFull.func1`:
///
/// | field | value |
/// |-------|-------|
/// | `package_path` | `github.com/goentf/runpoint` |
/// | `package_name` | `runpoint` |
/// | `long_name` | `(*PCounter).FuncFull.func1` |
/// | `receiver` | `*PCounter` |
/// | `short_name` | `FuncFull` |
#[derive(Facet, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NameParts {
    pub package_path: String,
    pub package_name: String,
    pub long_name: String,
    pub receiver: String,
    pub short_name: String,
}

impl NameParts {
    pub fn is_empty(&self) -> bool {
        self.package_path.is_empty()
            && self.package_name.is_empty()
            && self.long_name.is_empty()
            && self.receiver.is_empty()
            && self.short_name.is_empty()
    }
}
