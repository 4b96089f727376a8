use crate::name;
use runpoint_types::{NameParts, Symbol};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

/// One resolved stack frame.
///
/// Name components are parsed from [`Frame::function_full`] on first use and
/// cached for the life of the value. An unresolved frame answers every query
/// with an empty string or line 0.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    symbol: Symbol,
    parts: OnceLock<NameParts>,
}

impl Frame {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            parts: OnceLock::new(),
        }
    }

    /// The "no frame" record.
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn is_resolved(&self) -> bool {
        self.symbol.is_resolved()
    }

    /// Name components of [`Frame::function_full`].
    pub fn name_parts(&self) -> &NameParts {
        self.parts.get_or_init(|| name::parse(&self.symbol.function))
    }

    /// Full name as reported by the runtime, e.g.
    /// `github.com/goentf/runpoint.(*PCounter).FuncFull.func1` or
    /// `runpoint::pcounter::PCounter::function_full`.
    pub fn function_full(&self) -> &str {
        &self.symbol.function
    }

    /// Example: `github.com/goentf/runpoint`
    pub fn package_path(&self) -> &str {
        &self.name_parts().package_path
    }

    /// Example: `runpoint`
    pub fn package(&self) -> &str {
        &self.name_parts().package_name
    }

    /// Example: `(*PCounter).FuncLong.func1`
    pub fn func_long(&self) -> &str {
        &self.name_parts().long_name
    }

    /// Example: `*PCounter`
    pub fn receiver(&self) -> &str {
        &self.name_parts().receiver
    }

    /// Example: `Function`
    pub fn function(&self) -> &str {
        &self.name_parts().short_name
    }

    /// Directory holding the source file, `.` for a bare file name.
    pub fn dir(&self) -> &str {
        match Path::new(&self.symbol.file).parent().and_then(Path::to_str) {
            Some("") => ".",
            Some(dir) => dir,
            None => "",
        }
    }

    pub fn file(&self) -> &str {
        &self.symbol.file
    }

    /// Last component of the source file path.
    pub fn filename(&self) -> &str {
        Path::new(&self.symbol.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    pub fn line(&self) -> u32 {
        self.symbol.line
    }
}

impl From<Symbol> for Frame {
    fn from(symbol: Symbol) -> Self {
        Self::new(symbol)
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for Frame {}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_resolved() {
            return write!(f, "<unresolved>");
        }
        let function = if self.symbol.function.is_empty() {
            "<unknown>"
        } else {
            self.symbol.function.as_str()
        };
        write!(f, "{function}")?;
        if !self.symbol.file.is_empty() {
            write!(f, " ({}:{})", self.symbol.file, self.symbol.line)?;
        }
        Ok(())
    }
}
