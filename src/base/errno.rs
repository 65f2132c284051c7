//! Symbolic names for OS error numbers.

/// Returns the symbolic name (`"ECONNREFUSED"`) of an OS error code.
///
/// Every errno the platform defines has a name; unknown codes, and every
/// code on non-unix targets, yield `None`.
#[cfg(unix)]
pub fn errno_name(code: i32) -> Option<String> {
    use nix::errno::Errno;

    match Errno::from_raw(code) {
        Errno::UnknownErrno => None,
        errno => Some(format!("{errno:?}")),
    }
}

#[cfg(not(unix))]
pub fn errno_name(_code: i32) -> Option<String> {
    None
}
