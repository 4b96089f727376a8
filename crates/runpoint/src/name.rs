//! Decomposition of runtime-reported function names.
//!
//! Two spellings are understood:
//!
//! - dotted names, `path/to/pkg.(*Type).Method.func1`: the package ends at the
//!   first `.` after the last `/`, an optional parenthesized receiver follows,
//!   then the short name, then any `.funcN` closure suffixes;
//! - Rust paths, `krate::module::Type::method::{{closure}}` and
//!   `<krate::Type as Trait>::method`: segments split on `::` outside `<...>`,
//!   trailing `{...}` segments are closures, and the segment before the short
//!   name is a receiver when it looks like a type.
//!
//! Anything that fits neither shape yields empty parts. Parsing never panics.

use runpoint_types::NameParts;

/// Splits `qualified` into package path, package name, long name, receiver and short name.
pub fn parse(qualified: &str) -> NameParts {
    if qualified.is_empty() {
        return NameParts::default();
    }
    if qualified.contains("::") {
        parse_path(qualified)
    } else {
        parse_dotted(qualified)
    }
}

/// Drops a trailing legacy-mangling hash such as `::h0123456789abcdef`.
pub fn strip_hash_suffix(name: &str) -> &str {
    if let Some(idx) = name.rfind("::h") {
        let suffix = &name[idx + 3..];
        if suffix.len() == 16 && suffix.chars().all(|c| c.is_ascii_hexdigit()) {
            return &name[..idx];
        }
    }
    name
}

fn parse_dotted(name: &str) -> NameParts {
    let last_segment = name.rfind('/').map_or(0, |idx| idx + 1);
    let Some(boundary) = name[last_segment..].find('.').map(|idx| last_segment + idx) else {
        return NameParts::default();
    };

    let package_path = &name[..boundary];
    let long_name = &name[boundary + 1..];
    let package_name = package_path.rsplit('/').next().unwrap_or_default();
    let (receiver, short_name) = split_dotted_long_name(long_name);

    NameParts {
        package_path: package_path.to_owned(),
        package_name: package_name.to_owned(),
        long_name: long_name.to_owned(),
        receiver: receiver.to_owned(),
        short_name: short_name.to_owned(),
    }
}

fn split_dotted_long_name(long_name: &str) -> (&str, &str) {
    let Some(after_open) = long_name.strip_prefix('(') else {
        return ("", leading_dotted_segment(long_name));
    };
    // Outermost balanced parentheses delimit the receiver, so a receiver type
    // may itself contain dots.
    let Some(close) = matching_close(after_open, b'(', b')') else {
        return (after_open, "");
    };
    let receiver = &after_open[..close];
    match after_open[close + 1..].strip_prefix('.') {
        Some(rest) => (receiver, leading_dotted_segment(rest)),
        None => (receiver, ""),
    }
}

/// Text up to the first `.` that is not inside square brackets.
fn leading_dotted_segment(s: &str) -> &str {
    let mut depth = 0usize;
    for (idx, byte) in s.bytes().enumerate() {
        match byte {
            b'[' => depth += 1,
            b']' => depth = depth.saturating_sub(1),
            b'.' if depth == 0 => return &s[..idx],
            _ => {}
        }
    }
    s
}

/// Index of the byte closing an already-opened `open`.
fn matching_close(s: &str, open: u8, close: u8) -> Option<usize> {
    let mut depth = 1usize;
    for (idx, byte) in s.bytes().enumerate() {
        if byte == open {
            depth += 1;
        } else if byte == close {
            depth -= 1;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}

fn parse_path(name: &str) -> NameParts {
    let name = strip_hash_suffix(name);
    let segments = split_path(name);

    let Some(short_index) = segments.iter().rposition(|s| !is_closure_segment(s)) else {
        return NameParts::default();
    };
    let short_name = segments[short_index];

    if short_index > 0 && segments[0].starts_with('<') {
        return parse_qualified_self(&segments, short_index);
    }

    let package_end = if short_index > 0 && looks_like_type(segments[short_index - 1]) {
        short_index - 1
    } else {
        short_index
    };
    let receiver = if package_end < short_index {
        segments[package_end]
    } else {
        ""
    };
    let package = &segments[..package_end];

    NameParts {
        package_path: package.join("::"),
        package_name: package.last().copied().unwrap_or_default().to_owned(),
        long_name: segments[package_end..].join("::"),
        receiver: receiver.to_owned(),
        short_name: short_name.to_owned(),
    }
}

/// `<Self as Trait>::rest` or `<Self>::rest`.
fn parse_qualified_self(segments: &[&str], short_index: usize) -> NameParts {
    let head = segments[0];
    let inner = head
        .strip_prefix('<')
        .map(|s| s.strip_suffix('>').unwrap_or(s))
        .unwrap_or(head);
    let (self_ty, trait_path) = split_as(inner);

    let (pointer, bare_ty) = peel_pointer(self_ty);
    let ty_segments = split_path(bare_ty);
    let (ty_name, module) = match ty_segments.split_last() {
        Some((last, module)) => (*last, module),
        None => (bare_ty, &[][..]),
    };

    let receiver = format!("{pointer}{ty_name}");
    let rest = segments[1..].join("::");
    let long_name = match trait_path {
        Some(trait_path) => format!("<{receiver} as {trait_path}>::{rest}"),
        None => format!("{receiver}::{rest}"),
    };

    NameParts {
        package_path: module.join("::"),
        package_name: module.last().copied().unwrap_or_default().to_owned(),
        long_name,
        receiver,
        short_name: segments[short_index].to_owned(),
    }
}

/// Splits on `::` outside angle brackets. A `::<` turbofish stays attached to
/// the segment it qualifies; a `::<impl ...>` block is a segment of its own.
fn split_path(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        match bytes[idx] {
            b'<' => depth += 1,
            // `->` inside fn pointer types is not a closing bracket.
            b'>' if idx > 0 && bytes[idx - 1] == b'-' => {}
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0
                && bytes.get(idx + 1) == Some(&b':')
                && (bytes.get(idx + 2) != Some(&b'<') || path[idx + 2..].starts_with("<impl ")) =>
            {
                segments.push(&path[start..idx]);
                idx += 2;
                start = idx;
                continue;
            }
            _ => {}
        }
        idx += 1;
    }
    segments.push(&path[start..]);
    segments
}

/// Splits `Self as Trait` at the top-level ` as `.
fn split_as(inner: &str) -> (&str, Option<&str>) {
    let bytes = inner.as_bytes();
    let mut depth = 0usize;
    for idx in 0..bytes.len() {
        match bytes[idx] {
            b'<' => depth += 1,
            b'>' if idx > 0 && bytes[idx - 1] == b'-' => {}
            b'>' => depth = depth.saturating_sub(1),
            b' ' if depth == 0 && inner[idx..].starts_with(" as ") => {
                return (&inner[..idx], Some(&inner[idx + 4..]));
            }
            _ => {}
        }
    }
    (inner, None)
}

fn peel_pointer(ty: &str) -> (&str, &str) {
    const PREFIXES: [&str; 5] = ["&mut ", "&", "*const ", "*mut ", "dyn "];
    let mut rest = ty;
    while let Some(prefix) = PREFIXES.iter().find(|p| rest.starts_with(**p)) {
        rest = &rest[prefix.len()..];
    }
    (&ty[..ty.len() - rest.len()], rest)
}

fn is_closure_segment(segment: &str) -> bool {
    segment.starts_with('{')
}

/// Type names start uppercase; `<impl ...>` blocks start with `<`. Generic
/// arguments do not count, so `helper<T>` stays a function.
fn looks_like_type(segment: &str) -> bool {
    segment.starts_with(|c: char| c.is_ascii_uppercase()) || segment.starts_with('<')
}
