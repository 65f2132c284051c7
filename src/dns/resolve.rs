//! Core DNS resolution types and traits.
//!
//! This module defines the `Resolve` trait and supporting types that form
//! the foundation of the DNS abstraction layer.

use super::candidate::{Candidate, ResolveHints};
use std::{borrow::Cow, collections::HashMap, fmt, io, net::IpAddr, net::SocketAddr, sync::Arc};

/// A domain name to resolve into IP addresses.
///
/// This is a lightweight wrapper around a hostname string that provides
/// a type-safe way to pass domain names to resolvers.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct Name {
    host: Box<str>,
}

impl Name {
    /// Creates a new [`Name`] from any string-like type.
    #[inline]
    pub fn new(host: impl Into<Box<str>>) -> Self {
        Self { host: host.into() }
    }

    /// View the hostname as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.host
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::new(value)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.host, f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.host, f)
    }
}

/// Trait for name resolution.
///
/// Turns a host/port pair into an ordered list of candidates. The order is
/// significant: the race preserves it within each address family.
///
/// # Design Notes
///
/// - Resolution is synchronous; the race itself is a blocking call.
/// - Uses `&self` so one resolver can serve concurrent races.
/// - An empty list is an error, not a success.
pub trait Resolve: Send + Sync {
    /// Resolves `name` to candidates targeting `port`.
    fn resolve(&self, name: &Name, port: u16, hints: &ResolveHints) -> io::Result<Vec<Candidate>>;
}

/// Blanket implementation for Arc-wrapped resolvers.
impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    fn resolve(&self, name: &Name, port: u16, hints: &ResolveHints) -> io::Result<Vec<Candidate>> {
        (**self).resolve(name, port, hints)
    }
}

/// Resolver wrapper that supports hostname overrides.
///
/// This resolver first checks a map of hostname-to-address overrides before
/// falling back to the underlying resolver. Useful for:
/// - Testing without real DNS
/// - Forcing specific IPs for certain hosts
///
/// Overridden addresses still pass through the family filter in the hints.
///
/// # Example
///
/// ```rust,ignore
/// use eyeballs::dns::{DnsResolverWithOverrides, GaiResolver};
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// let mut overrides = HashMap::new();
/// overrides.insert("api.local".into(), vec!["127.0.0.1".parse().unwrap()]);
///
/// let resolver = DnsResolverWithOverrides::new(Arc::new(GaiResolver::new()), overrides);
/// ```
pub struct DnsResolverWithOverrides {
    inner: Arc<dyn Resolve>,
    overrides: Arc<HashMap<Cow<'static, str>, Vec<IpAddr>>>,
}

impl DnsResolverWithOverrides {
    /// Creates a new resolver with the given overrides.
    ///
    /// # Arguments
    ///
    /// * `inner` - The fallback resolver for non-overridden hostnames.
    /// * `overrides` - Map of hostnames to their addresses, in preference order.
    pub fn new(
        inner: Arc<dyn Resolve>,
        overrides: HashMap<Cow<'static, str>, Vec<IpAddr>>,
    ) -> Self {
        Self { inner, overrides: Arc::new(overrides) }
    }

    /// Returns the number of configured overrides.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

impl Resolve for DnsResolverWithOverrides {
    fn resolve(&self, name: &Name, port: u16, hints: &ResolveHints) -> io::Result<Vec<Candidate>> {
        let Some(ips) = self.overrides.get(name.as_str()) else {
            return self.inner.resolve(name, port, hints);
        };

        let candidates: Vec<_> = ips
            .iter()
            .map(|ip| SocketAddr::new(*ip, port))
            .filter(|address| hints.accepts(address))
            .map(|address| Candidate::from_hints(address, hints, name.as_str()))
            .collect();

        if candidates.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("override for {name} has no address of the requested family"),
            ));
        }
        tracing::debug!(host = %name, count = candidates.len(), "resolved from overrides");
        Ok(candidates)
    }
}

impl fmt::Debug for DnsResolverWithOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsResolverWithOverrides")
            .field("override_count", &self.overrides.len())
            .finish_non_exhaustive()
    }
}
