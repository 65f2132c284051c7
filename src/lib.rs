//! # eyeballs
//!
//! Happy Eyeballs connection establishment for Rust.
//!
//! A host frequently resolves to both IPv6 and IPv4 addresses, and one family
//! may be broken or slow. `eyeballs` interleaves the resolved addresses by
//! family, starts staggered non-blocking connects, and returns the first
//! socket that connects while closing every other attempt.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! let stream = eyeballs::connect_host("example.com", 80)?;
//! println!("Connected to {}", stream.peer_addr()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Timing, resolution hints and socket construction are configured on a
//! [`ConnectJob`](socket::ConnectJob):
//!
//! ```rust,ignore
//! use eyeballs::dns::ResolveHints;
//! use eyeballs::socket::ConnectJob;
//! use std::time::Duration;
//!
//! let job = ConnectJob::new()
//!     .delay(Duration::from_millis(250))
//!     .timeout(Duration::from_secs(5));
//! let socket = job.connect_host("example.com", 443, &ResolveHints::default())?;
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error types and error context
//! - [`dns`] - Candidate addresses, resolvers and family interleaving
//! - [`socket`] - Socket capabilities, readiness multiplexing and the race

pub mod base;
pub mod dns;
pub mod socket;

pub use base::error::{AttemptError, ConnectError};
pub use base::neterror::NetError;
pub use dns::Candidate;

#[cfg(unix)]
use dns::ResolveHints;
#[cfg(unix)]
use socket::ConnectJob;
#[cfg(unix)]
use std::net::{SocketAddr, TcpStream};

/// Connects to `host:port` with the system resolver and default timing.
#[cfg(unix)]
pub fn connect_host(host: &str, port: u16) -> Result<TcpStream, ConnectError> {
    ConnectJob::new().connect_host(host, port, &ResolveHints::default()).map(TcpStream::from)
}

/// Races TCP connects to already-resolved addresses with default timing.
#[cfg(unix)]
pub fn connect_addresses<I>(addrs: I) -> Result<TcpStream, ConnectError>
where
    I: IntoIterator<Item = SocketAddr>,
{
    ConnectJob::new()
        .connect_addresses(addrs.into_iter().map(Candidate::stream))
        .map(TcpStream::from)
}
