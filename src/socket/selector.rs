//! Readiness multiplexing for pending connects.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

/// Waits on many pending connects at once.
///
/// A selector owns the sockets registered with it. [`select`](Selector::select)
/// hands write-ready sockets back already unregistered; whatever is still
/// registered when the selector is dropped is closed with it.
pub trait Selector {
    type Socket;

    /// Watches `socket` for write readiness, tagged with its target.
    ///
    /// On error the socket is dropped.
    fn register(&mut self, socket: Self::Socket, address: SocketAddr) -> io::Result<()>;

    /// Number of sockets still registered.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Blocks for at most `timeout` and returns the sockets that became
    /// write-ready (connected or failed), in the order the OS reported them.
    fn select(&mut self, timeout: Duration) -> io::Result<Vec<(Self::Socket, SocketAddr)>>;
}

#[cfg(unix)]
pub use self::mio_selector::MioSelector;

#[cfg(unix)]
mod mio_selector {
    use super::Selector;
    use mio::unix::SourceFd;
    use mio::{Events, Interest, Poll, Token};
    use socket2::Socket;
    use std::collections::HashMap;
    use std::io;
    use std::net::SocketAddr;
    use std::os::unix::io::AsRawFd;
    use std::time::Duration;

    const EVENTS_CAPACITY: usize = 64;

    struct Pending {
        socket: Socket,
        address: SocketAddr,
    }

    /// Selector over `socket2` sockets backed by `mio` (epoll/kqueue).
    pub struct MioSelector {
        poll: Poll,
        events: Events,
        pending: HashMap<Token, Pending>,
        next_token: usize,
    }

    impl MioSelector {
        pub fn new() -> io::Result<Self> {
            Ok(Self {
                poll: Poll::new()?,
                events: Events::with_capacity(EVENTS_CAPACITY),
                pending: HashMap::new(),
                next_token: 0,
            })
        }
    }

    impl Selector for MioSelector {
        type Socket = Socket;

        fn register(&mut self, socket: Socket, address: SocketAddr) -> io::Result<()> {
            let token = Token(self.next_token);
            self.next_token += 1;

            let fd = socket.as_raw_fd();
            self.poll.registry().register(&mut SourceFd(&fd), token, Interest::WRITABLE)?;
            self.pending.insert(token, Pending { socket, address });
            Ok(())
        }

        fn len(&self) -> usize {
            self.pending.len()
        }

        fn select(&mut self, timeout: Duration) -> io::Result<Vec<(Socket, SocketAddr)>> {
            match self.poll.poll(&mut self.events, Some(timeout)) {
                Ok(()) => {}
                // A signal cut the wait short; the caller simply polls again.
                Err(e) if e.kind() == io::ErrorKind::Interrupted => return Ok(Vec::new()),
                Err(e) => return Err(e),
            }

            let mut ready = Vec::new();
            for event in self.events.iter() {
                if !(event.is_writable() || event.is_error() || event.is_write_closed()) {
                    continue;
                }
                let Some(Pending { socket, address }) = self.pending.remove(&event.token()) else {
                    continue;
                };
                let fd = socket.as_raw_fd();
                if let Err(e) = self.poll.registry().deregister(&mut SourceFd(&fd)) {
                    tracing::trace!(%address, error = %e, "deregister failed");
                }
                ready.push((socket, address));
            }
            Ok(ready)
        }
    }

    impl std::fmt::Debug for MioSelector {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("MioSelector")
                .field("pending", &self.pending.len())
                .finish_non_exhaustive()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use socket2::{Domain, Protocol, SockAddr, Type};
        use std::net::TcpListener;
        use std::time::Instant;

        fn nonblocking_connect(address: SocketAddr) -> Socket {
            let domain = Domain::for_address(address);
            let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP)).unwrap();
            socket.set_nonblocking(true).unwrap();
            let _ = socket.connect(&SockAddr::from(address));
            socket
        }

        #[test]
        fn test_empty_select_waits_for_timeout() {
            let mut selector = MioSelector::new().unwrap();
            assert!(selector.is_empty());

            let start = Instant::now();
            let ready = selector.select(Duration::from_millis(20)).unwrap();
            assert!(ready.is_empty());
            assert!(start.elapsed() >= Duration::from_millis(15));
        }

        #[test]
        fn test_connected_socket_becomes_ready() {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let address = listener.local_addr().unwrap();

            let mut selector = MioSelector::new().unwrap();
            selector.register(nonblocking_connect(address), address).unwrap();
            assert_eq!(selector.len(), 1);

            let mut ready = Vec::new();
            for _ in 0..50 {
                ready = selector.select(Duration::from_millis(100)).unwrap();
                if !ready.is_empty() {
                    break;
                }
            }

            assert_eq!(ready.len(), 1);
            assert_eq!(ready[0].1, address);
            assert!(ready[0].0.take_error().unwrap().is_none());
            assert!(selector.is_empty());
        }
    }
}
