use std::io;
use thiserror::Error;

/// Symbolic classification of a socket-level failure.
///
/// Codes follow Chromium's `net_error_list.h` so they can be compared with
/// browser network logs.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum NetError {
    #[error("Connection closed (TCP FIN)")]
    ConnectionClosed,
    #[error("Connection reset (TCP RST)")]
    ConnectionReset,
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("Connection aborted")]
    ConnectionAborted,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Internet disconnected")]
    InternetDisconnected,
    #[error("Address invalid")]
    AddressInvalid,
    #[error("Address unreachable")]
    AddressUnreachable,
    #[error("Socket not connected")]
    SocketNotConnected,
    #[error("Connection timed out")]
    ConnectionTimedOut,
    #[error("Name resolution failed")]
    NameResolutionFailed,
    #[error("Network access denied")]
    NetworkAccessDenied,
    #[error("Address in use")]
    AddressInUse,
    #[error("No buffer space")]
    NoBufferSpace,
    #[error("Address family not supported")]
    AddressFamilyNotSupported,
    #[error("Too many open sockets")]
    InsufficientResources,

    #[error("Unknown network error ({0})")]
    Unknown(i32),
}

impl NetError {
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::ConnectionClosed => -100,
            NetError::ConnectionReset => -101,
            NetError::ConnectionRefused => -102,
            NetError::ConnectionAborted => -103,
            NetError::ConnectionFailed => -104,
            NetError::NameNotResolved => -105,
            NetError::InternetDisconnected => -106,
            NetError::AddressInvalid => -108,
            NetError::AddressUnreachable => -109,
            NetError::SocketNotConnected => -112,
            NetError::ConnectionTimedOut => -118,
            NetError::NameResolutionFailed => -137,
            NetError::NetworkAccessDenied => -138,
            NetError::AddressInUse => -147,
            NetError::NoBufferSpace => -176,
            // ERR_INSUFFICIENT_RESOURCES
            NetError::InsufficientResources => -12,
            // Not in net_error_list.h; kept clear of the -100..-999 ranges.
            NetError::AddressFamilyNotSupported => -10001,
            NetError::Unknown(code) => *code,
        }
    }

    /// Returns true for failures that say nothing about the peer and are
    /// specific to this host's socket support (e.g. IPv6 disabled).
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            NetError::AddressFamilyNotSupported
                | NetError::InsufficientResources
                | NetError::NoBufferSpace
                | NetError::AddressInUse
        )
    }
}

impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -100 => NetError::ConnectionClosed,
            -101 => NetError::ConnectionReset,
            -102 => NetError::ConnectionRefused,
            -103 => NetError::ConnectionAborted,
            -104 => NetError::ConnectionFailed,
            -105 => NetError::NameNotResolved,
            -106 => NetError::InternetDisconnected,
            -108 => NetError::AddressInvalid,
            -109 => NetError::AddressUnreachable,
            -112 => NetError::SocketNotConnected,
            -118 => NetError::ConnectionTimedOut,
            -137 => NetError::NameResolutionFailed,
            -138 => NetError::NetworkAccessDenied,
            -147 => NetError::AddressInUse,
            -176 => NetError::NoBufferSpace,
            -12 => NetError::InsufficientResources,
            -10001 => NetError::AddressFamilyNotSupported,
            _ => NetError::Unknown(code),
        }
    }
}

impl From<&io::Error> for NetError {
    fn from(err: &io::Error) -> Self {
        #[cfg(unix)]
        if let Some(code) = err.raw_os_error() {
            if let Some(mapped) = from_errno(code) {
                return mapped;
            }
        }

        match err.kind() {
            io::ErrorKind::ConnectionRefused => NetError::ConnectionRefused,
            io::ErrorKind::ConnectionReset => NetError::ConnectionReset,
            io::ErrorKind::ConnectionAborted => NetError::ConnectionAborted,
            io::ErrorKind::NotConnected => NetError::SocketNotConnected,
            io::ErrorKind::TimedOut => NetError::ConnectionTimedOut,
            io::ErrorKind::AddrInUse => NetError::AddressInUse,
            io::ErrorKind::AddrNotAvailable => NetError::AddressInvalid,
            io::ErrorKind::PermissionDenied => NetError::NetworkAccessDenied,
            io::ErrorKind::UnexpectedEof => NetError::ConnectionClosed,
            _ => NetError::ConnectionFailed,
        }
    }
}

#[cfg(unix)]
fn from_errno(code: i32) -> Option<NetError> {
    let mapped = match code {
        libc::ECONNREFUSED => NetError::ConnectionRefused,
        libc::ECONNRESET => NetError::ConnectionReset,
        libc::ECONNABORTED => NetError::ConnectionAborted,
        libc::ETIMEDOUT => NetError::ConnectionTimedOut,
        libc::EHOSTUNREACH | libc::ENETUNREACH | libc::EHOSTDOWN => NetError::AddressUnreachable,
        libc::ENETDOWN => NetError::InternetDisconnected,
        libc::EADDRINUSE => NetError::AddressInUse,
        libc::EADDRNOTAVAIL | libc::EINVAL => NetError::AddressInvalid,
        libc::EACCES | libc::EPERM => NetError::NetworkAccessDenied,
        libc::EAFNOSUPPORT | libc::EPROTONOSUPPORT => NetError::AddressFamilyNotSupported,
        libc::ENOBUFS => NetError::NoBufferSpace,
        libc::EMFILE | libc::ENFILE => NetError::InsufficientResources,
        libc::ENOTCONN => NetError::SocketNotConnected,
        _ => return None,
    };
    Some(mapped)
}
