//! Socket capabilities the race is written against.
//!
//! The race never touches the OS directly: it opens sockets through a
//! [`SocketFactory`] and drives them through [`RaceSocket`]. Closing a socket
//! is dropping it.

use super::selector::Selector;
use crate::dns::Candidate;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io;
use std::net::SocketAddr;

/// The per-socket operations a connection attempt needs.
pub trait RaceSocket {
    fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()>;

    /// Starts (or completes) a connect. On a non-blocking socket an
    /// in-progress connect is reported as an error; see
    /// [`connect_in_progress`].
    fn connect(&self, address: &SocketAddr) -> io::Result<()>;

    /// Takes the pending `SO_ERROR` of the socket, if any.
    fn take_error(&self) -> io::Result<Option<io::Error>>;
}

/// Constructs sockets for candidates, and the multiplexer able to watch them.
pub trait SocketFactory {
    type Socket: RaceSocket;
    type Selector: Selector<Socket = Self::Socket>;

    /// Opens a socket with the candidate's family, kind and protocol.
    fn open(&self, candidate: &Candidate) -> io::Result<Self::Socket>;

    /// Creates an empty selector for one race.
    fn selector(&self) -> io::Result<Self::Selector>;
}

/// Returns true when a non-blocking connect reported "operation in progress"
/// rather than a failure.
pub fn connect_in_progress(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::WouldBlock {
        return true;
    }
    #[cfg(unix)]
    if err.raw_os_error() == Some(libc::EINPROGRESS) {
        return true;
    }
    false
}

impl RaceSocket for Socket {
    fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()> {
        Socket::set_nonblocking(self, nonblocking)
    }

    fn connect(&self, address: &SocketAddr) -> io::Result<()> {
        Socket::connect(self, &SockAddr::from(*address))
    }

    fn take_error(&self) -> io::Result<Option<io::Error>> {
        Socket::take_error(self)
    }
}

/// Platform sockets (`socket2`) watched by a [`MioSelector`](super::selector::MioSelector).
#[cfg(unix)]
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemSocketFactory;

#[cfg(unix)]
impl SystemSocketFactory {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl SocketFactory for SystemSocketFactory {
    type Socket = Socket;
    type Selector = super::selector::MioSelector;

    fn open(&self, candidate: &Candidate) -> io::Result<Socket> {
        Socket::new(candidate.family(), candidate.kind(), candidate.protocol())
    }

    fn selector(&self) -> io::Result<Self::Selector> {
        super::selector::MioSelector::new()
    }
}

/// Platform sockets built by a caller-supplied constructor.
///
/// Lets callers tune sockets before connect (buffer sizes, marks, bound
/// devices) or inject construction failures, while keeping the system
/// selector.
///
/// ```rust,ignore
/// use eyeballs::socket::factory::FnSocketFactory;
/// use socket2::{Domain, Socket};
///
/// let v4_only = FnSocketFactory::new(|family, kind, protocol| {
///     if family == Domain::IPV6 {
///         return Err(std::io::ErrorKind::Unsupported.into());
///     }
///     Socket::new(family, kind, protocol)
/// });
/// ```
#[cfg(unix)]
#[derive(Clone)]
pub struct FnSocketFactory<F> {
    construct: F,
}

#[cfg(unix)]
impl<F> FnSocketFactory<F>
where
    F: Fn(Domain, Type, Option<Protocol>) -> io::Result<Socket>,
{
    pub fn new(construct: F) -> Self {
        Self { construct }
    }
}

#[cfg(unix)]
impl<F> SocketFactory for FnSocketFactory<F>
where
    F: Fn(Domain, Type, Option<Protocol>) -> io::Result<Socket>,
{
    type Socket = Socket;
    type Selector = super::selector::MioSelector;

    fn open(&self, candidate: &Candidate) -> io::Result<Socket> {
        (self.construct)(candidate.family(), candidate.kind(), candidate.protocol())
    }

    fn selector(&self) -> io::Result<Self::Selector> {
        super::selector::MioSelector::new()
    }
}

#[cfg(unix)]
impl<F> std::fmt::Debug for FnSocketFactory<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSocketFactory").finish_non_exhaustive()
    }
}
