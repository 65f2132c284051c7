//! Per-attempt and terminal errors of a connection race.

use crate::base::errno::errno_name;
use crate::base::neterror::NetError;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single candidate. Recorded and swallowed by the race.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// The socket for the candidate could not be constructed.
    #[error("could not open socket for {address}: {}", describe(.source))]
    Open {
        address: SocketAddr,
        #[source]
        source: io::Error,
    },
    /// The socket was constructed but the connect attempt failed.
    #[error("connect to {address} failed: {}", describe(.source))]
    Connect {
        address: SocketAddr,
        #[source]
        source: io::Error,
    },
}

impl AttemptError {
    pub fn open(address: SocketAddr, source: io::Error) -> Self {
        AttemptError::Open { address, source }
    }

    pub fn connect(address: SocketAddr, source: io::Error) -> Self {
        AttemptError::Connect { address, source }
    }

    /// The candidate address this failure belongs to.
    pub fn address(&self) -> SocketAddr {
        match self {
            AttemptError::Open { address, .. } | AttemptError::Connect { address, .. } => *address,
        }
    }

    /// The underlying OS error.
    pub fn io_error(&self) -> &io::Error {
        match self {
            AttemptError::Open { source, .. } | AttemptError::Connect { source, .. } => source,
        }
    }

    pub fn net_error(&self) -> NetError {
        NetError::from(self.io_error())
    }

    /// Symbolic errno name of the failure, e.g. `"ECONNREFUSED"`.
    pub fn errno_name(&self) -> Option<String> {
        self.io_error().raw_os_error().and_then(errno_name)
    }

    pub fn is_open(&self) -> bool {
        matches!(self, AttemptError::Open { .. })
    }
}

fn describe(err: &io::Error) -> String {
    match err.raw_os_error().and_then(errno_name) {
        Some(name) => format!("{name} ({err})"),
        None => err.to_string(),
    }
}

/// Terminal outcome of a race that produced no socket.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The overall budget ran out while attempts were still pending.
    #[error("connection attempts timed out after {timeout:?}")]
    TimedOut { timeout: Duration },

    /// Every candidate was tried and none connected.
    #[error("failed to connect to target ({} attempts failed)", .errors.len())]
    Exhausted { errors: Vec<AttemptError> },

    /// Name resolution for connect-by-host failed before any attempt.
    #[error("could not resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },

    /// The readiness multiplexer could not be created or polled.
    #[error("readiness selector failed: {0}")]
    Selector(#[source] io::Error),

    /// The winning socket could not be registered with the async runtime.
    #[error("could not hand connected socket to the runtime: {0}")]
    Handoff(#[source] io::Error),

    /// The blocking task running the race was cancelled or panicked.
    #[error("connect task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ConnectError {
    /// Per-attempt failures carried by an aggregate failure, in the order
    /// they occurred. Empty for every other kind.
    pub fn attempts(&self) -> &[AttemptError] {
        match self {
            ConnectError::Exhausted { errors } => errors,
            _ => &[],
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ConnectError::TimedOut { .. })
    }

    /// Collapses the failure into a single symbolic code.
    ///
    /// An aggregate failure reports the last peer-related attempt error, since
    /// a local failure such as an unsupported family says little about why
    /// the host was unreachable.
    pub fn net_error(&self) -> NetError {
        match self {
            ConnectError::TimedOut { .. } => NetError::ConnectionTimedOut,
            ConnectError::Exhausted { errors } => errors
                .iter()
                .rev()
                .map(AttemptError::net_error)
                .find(|code| !code.is_local())
                .or_else(|| errors.last().map(AttemptError::net_error))
                .unwrap_or(NetError::ConnectionFailed),
            ConnectError::Resolve { .. } => NetError::NameNotResolved,
            ConnectError::Selector(_) | ConnectError::Handoff(_) | ConnectError::Join(_) => {
                NetError::ConnectionFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    fn addr(s: &str) -> SocketAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_attempt_error_keeps_address() {
        let err = AttemptError::connect(
            addr("192.0.2.1:80"),
            io::Error::from(ErrorKind::ConnectionRefused),
        );
        assert_eq!(err.address(), addr("192.0.2.1:80"));
        assert_eq!(err.net_error(), NetError::ConnectionRefused);
        assert!(!err.is_open());
        assert!(err.to_string().contains("192.0.2.1:80"));
    }

    #[cfg(unix)]
    #[test]
    fn test_attempt_error_display_uses_errno_name() {
        let err = AttemptError::connect(
            addr("[2001:db8::1]:443"),
            io::Error::from_raw_os_error(libc::ECONNREFUSED),
        );
        assert_eq!(err.errno_name().as_deref(), Some("ECONNREFUSED"));
        assert!(err.to_string().contains("ECONNREFUSED"));
    }

    #[test]
    fn test_exhausted_reports_attempts() {
        let err = ConnectError::Exhausted {
            errors: vec![
                AttemptError::open(addr("[::1]:80"), io::Error::from(ErrorKind::Unsupported)),
                AttemptError::connect(
                    addr("127.0.0.1:80"),
                    io::Error::from(ErrorKind::ConnectionRefused),
                ),
            ],
        };
        assert_eq!(err.attempts().len(), 2);
        assert_eq!(err.attempts()[0].address(), addr("[::1]:80"));
        assert_eq!(err.to_string(), "failed to connect to target (2 attempts failed)");
        assert_eq!(err.net_error(), NetError::ConnectionRefused);
    }

    #[test]
    fn test_timeout_has_no_attempts() {
        let err = ConnectError::TimedOut { timeout: Duration::from_millis(250) };
        assert!(err.is_timeout());
        assert!(err.attempts().is_empty());
        assert_eq!(err.net_error(), NetError::ConnectionTimedOut);
    }

    #[test]
    fn test_handoff_is_not_a_selector_failure() {
        let err = ConnectError::Handoff(io::Error::from(ErrorKind::InvalidInput));
        assert!(err.to_string().starts_with("could not hand connected socket to the runtime"));
        assert!(!err.to_string().contains("selector"));
        assert!(err.attempts().is_empty());
        assert_eq!(err.net_error(), NetError::ConnectionFailed);
    }

    #[test]
    fn test_empty_exhausted_is_generic_failure() {
        let err = ConnectError::Exhausted { errors: Vec::new() };
        assert_eq!(err.net_error(), NetError::ConnectionFailed);
    }
}
