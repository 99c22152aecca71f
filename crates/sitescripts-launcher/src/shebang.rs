//! Interpreter directive construction
//!
//! From `execve(2)`: the kernel ignores characters beyond a fixed limit in the
//! text following `#!`. Before Linux 5.1 the limit is 127 characters, since
//! then it is 255. Interpreter paths that are too long, or that contain a
//! space, are started through `/bin/sh` instead.

use sitescripts_config::ShebangPolicy;
use std::fs;
use tracing::debug;

pub const LEGACY_SHEBANG_LIMIT: usize = 127;
pub const MODERN_SHEBANG_LIMIT: usize = 255;

const KERNEL_OSRELEASE: &str = "/proc/sys/kernel/osrelease";

/// Longest interpreter path allowed on a direct `#!` line under `policy`
pub fn max_length(policy: ShebangPolicy) -> usize {
    match policy {
        ShebangPolicy::Legacy => LEGACY_SHEBANG_LIMIT,
        ShebangPolicy::Modern => MODERN_SHEBANG_LIMIT,
        ShebangPolicy::Detect => detect_max_length(),
    }
}

fn detect_max_length() -> usize {
    let release = fs::read_to_string(KERNEL_OSRELEASE).ok();
    let limit = match release.as_deref().and_then(parse_kernel_release) {
        Some(version) if version >= (5, 1) => MODERN_SHEBANG_LIMIT,
        _ => LEGACY_SHEBANG_LIMIT,
    };
    debug!("Kernel release {:?} allows {} byte shebangs", release, limit);
    limit
}

/// `major.minor` of a kernel release string such as `6.8.0-45-generic`
fn parse_kernel_release(release: &str) -> Option<(u32, u32)> {
    let mut parts = release.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor: String = parts
        .next()?
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    Some((major, minor.parse().ok()?))
}

/// Build the header for a launcher run by `interpreter`.
///
/// The fallback is a Python/sh polyglot: `/bin/sh` sees `'''exec' ...` as an
/// `exec` of the interpreter with the script path and arguments, while Python
/// sees the same lines as a string literal and skips them. A path with a
/// space is double-quoted so the shell keeps it as one word.
pub fn build_shebang(interpreter: &str, limit: usize) -> String {
    if !interpreter.contains(' ') && interpreter.len() <= limit {
        return format!("#!{}", interpreter);
    }
    let executable = if interpreter.contains(' ') {
        format!("\"{}\"", interpreter)
    } else {
        interpreter.to_string()
    };
    format!(
        "#!/bin/sh\n'''exec' {} \"$0\" \"$@\"\n' '''",
        executable
    )
}
