//! Resolved candidate addresses and resolution hints.

use socket2::{Domain, Protocol, Type};
use std::net::SocketAddr;

/// One resolved address a connection attempt may target.
///
/// Mirrors a single `getaddrinfo` record: the socket triple needed to open a
/// socket plus the endpoint to connect it to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    family: Domain,
    kind: Type,
    protocol: Option<Protocol>,
    canonical_name: Option<Box<str>>,
    address: SocketAddr,
}

impl Candidate {
    pub fn new(
        family: Domain,
        kind: Type,
        protocol: Option<Protocol>,
        canonical_name: Option<Box<str>>,
        address: SocketAddr,
    ) -> Self {
        Self { family, kind, protocol, canonical_name, address }
    }

    /// A TCP stream candidate for `address`, family derived from the address.
    pub fn stream(address: SocketAddr) -> Self {
        Self::new(Domain::for_address(address), Type::STREAM, Some(Protocol::TCP), None, address)
    }

    /// Builds a candidate for `address` with the socket triple from `hints`.
    pub(crate) fn from_hints(address: SocketAddr, hints: &ResolveHints, host: &str) -> Self {
        let canonical_name = hints.canonical_name.then(|| Box::from(host));
        Self::new(Domain::for_address(address), hints.kind, hints.protocol, canonical_name, address)
    }

    #[inline]
    pub fn family(&self) -> Domain {
        self.family
    }

    #[inline]
    pub fn kind(&self) -> Type {
        self.kind
    }

    #[inline]
    pub fn protocol(&self) -> Option<Protocol> {
        self.protocol
    }

    pub fn canonical_name(&self) -> Option<&str> {
        self.canonical_name.as_deref()
    }

    #[inline]
    pub fn address(&self) -> SocketAddr {
        self.address
    }
}

impl From<SocketAddr> for Candidate {
    fn from(address: SocketAddr) -> Self {
        Candidate::stream(address)
    }
}

/// Hints forwarded to a resolver, the equivalent of `getaddrinfo`'s `hints`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveHints {
    /// Restrict results to one family; `None` accepts every family.
    pub family: Option<Domain>,
    /// Socket kind stamped on every candidate.
    pub kind: Type,
    /// Protocol stamped on every candidate.
    pub protocol: Option<Protocol>,
    /// Refuse hosts that are not IP literals instead of querying DNS.
    pub numeric_host: bool,
    /// Record the queried host as each candidate's canonical name.
    pub canonical_name: bool,
}

impl Default for ResolveHints {
    fn default() -> Self {
        Self {
            family: None,
            kind: Type::STREAM,
            protocol: Some(Protocol::TCP),
            numeric_host: false,
            canonical_name: false,
        }
    }
}

impl ResolveHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a single family.
    pub fn family(mut self, family: Domain) -> Self {
        self.family = Some(family);
        self
    }

    /// Set the socket kind.
    pub fn kind(mut self, kind: Type) -> Self {
        self.kind = kind;
        self
    }

    /// Set the protocol.
    pub fn protocol(mut self, protocol: Option<Protocol>) -> Self {
        self.protocol = protocol;
        self
    }

    /// Only accept IP literals.
    pub fn numeric_host(mut self, enable: bool) -> Self {
        self.numeric_host = enable;
        self
    }

    /// Fill in canonical names.
    pub fn canonical_name(mut self, enable: bool) -> Self {
        self.canonical_name = enable;
        self
    }

    /// Whether `address` passes the family filter.
    pub fn accepts(&self, address: &SocketAddr) -> bool {
        self.family.map_or(true, |family| Domain::for_address(*address) == family)
    }
}
