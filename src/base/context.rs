//! Ergonomic error context helpers.
//!
//! Provides extension traits for adding context to `Result` types,
//! converting IO errors into the crate's address-tagged error values.

use crate::base::error::{AttemptError, ConnectError};
use std::io;
use std::net::SocketAddr;

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Tag a socket construction failure with its candidate address.
    fn open_context(self, address: SocketAddr) -> Result<T, AttemptError>;

    /// Tag a connect failure with its candidate address.
    ///
    /// # Example
    /// ```ignore
    /// use eyeballs::base::context::IoResultExt;
    ///
    /// socket.connect(&addr).connect_context(addr)?;
    /// // Error: "connect to 192.0.2.1:443 failed: ECONNREFUSED (...)"
    /// ```
    fn connect_context(self, address: SocketAddr) -> Result<T, AttemptError>;

    /// Add DNS resolution context to an IO error.
    fn dns_context(self, host: &str) -> Result<T, ConnectError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn open_context(self, address: SocketAddr) -> Result<T, AttemptError> {
        self.map_err(|e| AttemptError::open(address, e))
    }

    fn connect_context(self, address: SocketAddr) -> Result<T, AttemptError> {
        self.map_err(|e| AttemptError::connect(address, e))
    }

    fn dns_context(self, host: &str) -> Result<T, ConnectError> {
        self.map_err(|source| ConnectError::Resolve { host: host.to_string(), source })
    }
}
