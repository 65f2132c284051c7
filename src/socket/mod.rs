//! Socket capabilities and the connection race.
//!
//! - [`factory`]: socket construction and the per-socket operations a race needs
//! - [`selector`]: readiness multiplexing over pending connects
//! - [`race`]: the Happy Eyeballs loop
//! - [`connectjob`]: resolve -> interleave -> race

pub mod config;
pub mod connectjob;
pub mod factory;
pub mod race;
pub mod selector;

pub use config::RaceConfig;
pub use connectjob::ConnectJob;
pub use factory::{RaceSocket, SocketFactory};
pub use race::Racer;
pub use selector::Selector;

#[cfg(unix)]
pub use factory::{FnSocketFactory, SystemSocketFactory};
#[cfg(unix)]
pub use selector::MioSelector;
