use crate::base::context::IoResultExt;
use crate::base::error::ConnectError;
use crate::dns::{interleave_family, Candidate, GaiResolver, Name, Resolve, ResolveHints};
use crate::socket::config::RaceConfig;
use crate::socket::factory::SocketFactory;
use crate::socket::race::Racer;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[cfg(unix)]
use crate::socket::factory::SystemSocketFactory;

/// Manages the connection process: resolve -> interleave -> race.
/// Roughly equivalent to net::TransportConnectJob.
#[derive(Clone)]
pub struct ConnectJob<F> {
    resolver: Arc<dyn Resolve>,
    racer: Racer<F>,
}

#[cfg(unix)]
impl ConnectJob<SystemSocketFactory> {
    /// A job with the system resolver, platform sockets and default timing.
    pub fn new() -> Self {
        Self::with_factory(SystemSocketFactory::new())
    }
}

#[cfg(unix)]
impl Default for ConnectJob<SystemSocketFactory> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: SocketFactory> ConnectJob<F> {
    /// A job opening sockets through `factory`.
    pub fn with_factory(factory: F) -> Self {
        Self {
            resolver: Arc::new(GaiResolver::new()),
            racer: Racer::new(factory, RaceConfig::default()),
        }
    }

    /// Replace the resolver used by [`connect_host`](Self::connect_host).
    pub fn resolver(mut self, resolver: Arc<dyn Resolve>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the race timing.
    pub fn config(mut self, config: RaceConfig) -> Self {
        self.racer = self.racer.with_config(config);
        self
    }

    /// Set the stagger delay.
    pub fn delay(self, delay: Duration) -> Self {
        let config = self.racer.config().delay(delay);
        self.config(config)
    }

    /// Set the overall timeout.
    pub fn timeout(self, timeout: Duration) -> Self {
        let config = self.racer.config().timeout(timeout);
        self.config(config)
    }

    pub fn race_config(&self) -> &RaceConfig {
        self.racer.config()
    }

    /// Resolves `host`, interleaves the candidates by family and races them.
    pub fn connect_host(
        &self,
        host: &str,
        port: u16,
        hints: &ResolveHints,
    ) -> Result<F::Socket, ConnectError> {
        let name = Name::new(host);
        let candidates = self.resolver.resolve(&name, port, hints).dns_context(host)?;
        tracing::debug!(host = %name, port, count = candidates.len(), "resolved candidates");
        self.connect_addresses(candidates)
    }

    /// Interleaves already-resolved candidates by family and races them.
    ///
    /// The candidates are fully collected before the race starts. To race a
    /// lazily produced sequence in its own order, use [`Racer::race`].
    pub fn connect_addresses<I>(&self, candidates: I) -> Result<F::Socket, ConnectError>
    where
        I: IntoIterator<Item = Candidate>,
    {
        self.racer.race(interleave_family(candidates))
    }
}

#[cfg(unix)]
impl ConnectJob<SystemSocketFactory> {
    /// Runs [`connect_host`](Self::connect_host) on the blocking thread pool
    /// and hands the winner to the tokio reactor.
    pub async fn connect_host_async(
        &self,
        host: &str,
        port: u16,
        hints: &ResolveHints,
    ) -> Result<tokio::net::TcpStream, ConnectError> {
        let job = self.clone();
        let host = host.to_string();
        let hints = hints.clone();

        let socket =
            tokio::task::spawn_blocking(move || job.connect_host(&host, port, &hints)).await??;

        into_tokio(socket)
    }
}

/// Moves a blocking winner onto the tokio reactor.
#[cfg(unix)]
fn into_tokio(socket: socket2::Socket) -> Result<tokio::net::TcpStream, ConnectError> {
    let stream = std::net::TcpStream::from(socket);
    stream.set_nonblocking(true).map_err(ConnectError::Handoff)?;
    tokio::net::TcpStream::from_std(stream).map_err(ConnectError::Handoff)
}

impl<F> fmt::Debug for ConnectJob<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectJob").finish_non_exhaustive()
    }
}
