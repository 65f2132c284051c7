//! System DNS resolver using getaddrinfo.
//!
//! This resolver uses the operating system's native resolution via
//! `getaddrinfo` (through `std::net::ToSocketAddrs`), so it respects
//! /etc/hosts, /etc/resolv.conf and the system's RFC 6724 address ordering.

use super::{Candidate, Name, Resolve, ResolveHints};
use std::{
    io,
    net::{IpAddr, SocketAddr, ToSocketAddrs},
};

/// System DNS resolver using `getaddrinfo`.
///
/// Blocks the calling thread for the duration of the lookup.
#[derive(Clone, Debug, Default)]
pub struct GaiResolver;

impl GaiResolver {
    /// Creates a new `GaiResolver`.
    pub fn new() -> Self {
        Self
    }
}

impl Resolve for GaiResolver {
    fn resolve(&self, name: &Name, port: u16, hints: &ResolveHints) -> io::Result<Vec<Candidate>> {
        let host = name.as_str();

        let addrs: Vec<SocketAddr> = match parse_ip_literal(host) {
            Some(ip) => vec![SocketAddr::new(ip, port)],
            None if hints.numeric_host => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{host} is not a numeric host address"),
                ));
            }
            None => {
                tracing::debug!(host = %host, "resolving via getaddrinfo");
                (host, port).to_socket_addrs()?.collect()
            }
        };

        let candidates: Vec<_> = addrs
            .into_iter()
            .filter(|address| hints.accepts(address))
            .map(|address| Candidate::from_hints(address, hints, host))
            .collect();

        if candidates.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "No addresses returned by getaddrinfo",
            ));
        }

        tracing::debug!(host = %host, count = candidates.len(), "DNS resolution complete");
        Ok(candidates)
    }
}

/// Parses IPv4 and IPv6 literals, with or without IPv6 brackets.
fn parse_ip_literal(host: &str) -> Option<IpAddr> {
    let unbracketed = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    unbracketed.parse().ok()
}
