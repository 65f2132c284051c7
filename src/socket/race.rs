//! The connection race.
//!
//! One cooperative loop admits candidates one at a time, starts a
//! non-blocking connect for each, and waits on every pending connect through
//! a [`Selector`]. The first socket to connect is returned; every other
//! socket is closed when the selector is dropped, whichever way the race
//! ends.
//!
//! Admission runs once per loop pass: a pending connect admits the next
//! candidate only after one poll of at most `delay`, so a readiness event
//! can shorten the stagger. Candidates whose socket cannot be opened or
//! whose connect fails synchronously are replaced at once, without a poll.

use super::config::RaceConfig;
use super::factory::{connect_in_progress, RaceSocket, SocketFactory};
use super::selector::Selector;
use crate::base::context::IoResultExt;
use crate::base::error::{AttemptError, ConnectError};
use crate::dns::Candidate;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Outcome of admitting one candidate.
enum Admission<S> {
    Connected(S),
    Pending,
    Failed(AttemptError),
}

/// Races candidates from one iterator to a single connected socket.
#[derive(Debug, Clone)]
pub struct Racer<F> {
    factory: F,
    config: RaceConfig,
}

impl<F: SocketFactory> Racer<F> {
    pub fn new(factory: F, config: RaceConfig) -> Self {
        Self { factory, config }
    }

    /// The same racer with different timing.
    pub fn with_config(mut self, config: RaceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Consumes `candidates` in order until one connects.
    ///
    /// The iterator is pulled lazily, one candidate per admission, and never
    /// reordered. On success the socket is returned in blocking mode.
    ///
    /// # Errors
    ///
    /// - [`ConnectError::TimedOut`] when the budget runs out with connects
    ///   still pending, whatever failures were recorded before.
    /// - [`ConnectError::Exhausted`] with every per-attempt failure, in the
    ///   order they occurred, when no candidate is left and none connected.
    /// - [`ConnectError::Selector`] when the multiplexer itself fails.
    pub fn race<I>(&self, candidates: I) -> Result<F::Socket, ConnectError>
    where
        I: IntoIterator<Item = Candidate>,
    {
        let span = tracing::debug_span!(
            "race",
            delay = ?self.config.delay,
            timeout = ?self.config.budget()
        );
        let _enter = span.enter();

        let mut selector = self.factory.selector().map_err(ConnectError::Selector)?;
        let mut errors = Vec::new();

        let outcome = self.run(&mut candidates.into_iter().fuse(), &mut selector, &mut errors);

        let abandoned = selector.len();
        if abandoned > 0 {
            debug!(abandoned, "closing pending attempts");
        }
        drop(selector);

        match outcome? {
            Some(socket) => Ok(socket),
            None => {
                debug!(failures = errors.len(), "all candidates failed");
                Err(ConnectError::Exhausted { errors })
            }
        }
    }

    fn run<I>(
        &self,
        candidates: &mut I,
        selector: &mut F::Selector,
        errors: &mut Vec<AttemptError>,
    ) -> Result<Option<F::Socket>, ConnectError>
    where
        I: Iterator<Item = Candidate>,
    {
        let started = Instant::now();
        let budget = self.config.budget();

        loop {
            let mut drained = true;
            for candidate in candidates.by_ref() {
                match self.admit(&candidate, selector) {
                    Admission::Connected(socket) => {
                        debug!(address = %candidate.address(), "connected synchronously");
                        return Ok(Some(socket));
                    }
                    Admission::Pending => {
                        drained = false;
                        break;
                    }
                    Admission::Failed(error) => {
                        debug!(%error, "attempt failed");
                        errors.push(error);
                    }
                }
            }

            if drained && selector.is_empty() {
                return Ok(None);
            }

            let Some(wait) = poll_wait(self.config.delay, budget, started.elapsed()) else {
                debug!(pending = selector.len(), "race timed out");
                return Err(ConnectError::TimedOut { timeout: budget.unwrap_or_default() });
            };

            trace!(?wait, pending = selector.len(), "waiting for pending attempts");
            let ready = selector.select(wait).map_err(ConnectError::Selector)?;

            for (socket, address) in ready {
                match Self::harvest(socket, address) {
                    Ok(socket) => {
                        debug!(%address, elapsed = ?started.elapsed(), "connection established");
                        return Ok(Some(socket));
                    }
                    Err(error) => {
                        debug!(%error, "attempt failed");
                        errors.push(error);
                    }
                }
            }
        }
    }

    /// Opens a socket for `candidate` and starts its connect.
    fn admit(&self, candidate: &Candidate, selector: &mut F::Selector) -> Admission<F::Socket> {
        let address = candidate.address();
        debug!(%address, family = ?candidate.family(), "admitting candidate");

        let socket = match self.factory.open(candidate).open_context(address) {
            Ok(socket) => socket,
            Err(error) => return Admission::Failed(error),
        };
        if let Err(error) = socket.set_nonblocking(true).connect_context(address) {
            return Admission::Failed(error);
        }

        match socket.connect(&address) {
            Ok(()) => match Self::restore_blocking(socket, address) {
                Ok(socket) => Admission::Connected(socket),
                Err(error) => Admission::Failed(error),
            },
            Err(e) if connect_in_progress(&e) => match selector.register(socket, address) {
                Ok(()) => Admission::Pending,
                Err(e) => Admission::Failed(AttemptError::connect(address, e)),
            },
            Err(e) => Admission::Failed(AttemptError::connect(address, e)),
        }
    }

    /// Inspects a write-ready socket: connected, or failed with `SO_ERROR`.
    fn harvest(socket: F::Socket, address: SocketAddr) -> Result<F::Socket, AttemptError> {
        match socket.take_error() {
            Ok(None) => Self::restore_blocking(socket, address),
            Ok(Some(e)) | Err(e) => Err(AttemptError::connect(address, e)),
        }
    }

    fn restore_blocking(socket: F::Socket, address: SocketAddr) -> Result<F::Socket, AttemptError> {
        socket.set_nonblocking(false).connect_context(address)?;
        Ok(socket)
    }
}

/// Poll wait for one loop pass: the stagger delay clamped to what is left of
/// the budget, or `None` once the budget is spent.
fn poll_wait(delay: Duration, budget: Option<Duration>, elapsed: Duration) -> Option<Duration> {
    match budget {
        None => Some(delay),
        Some(budget) => {
            let remaining = budget.saturating_sub(elapsed);
            (!remaining.is_zero()).then(|| delay.min(remaining))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_wait_unbounded_uses_delay() {
        let delay = Duration::from_millis(300);
        assert_eq!(poll_wait(delay, None, Duration::from_secs(60)), Some(delay));
    }

    #[test]
    fn test_poll_wait_clamps_to_remaining_budget() {
        let wait = poll_wait(
            Duration::from_millis(300),
            Some(Duration::from_millis(500)),
            Duration::from_millis(350),
        );
        assert_eq!(wait, Some(Duration::from_millis(150)));
    }

    #[test]
    fn test_poll_wait_exhausted_budget() {
        let budget = Some(Duration::from_millis(100));
        assert_eq!(poll_wait(Duration::from_millis(300), budget, Duration::from_millis(100)), None);
        assert_eq!(poll_wait(Duration::from_millis(300), budget, Duration::from_millis(180)), None);
    }
}
