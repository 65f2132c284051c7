//! DNS Module Tests
//!
//! Covers:
//! - `Name` struct
//! - `DnsResolverWithOverrides` using a MockResolver
//! - `GaiResolver` (Basic System Resolver)
//! - Family interleaving of resolver output

use eyeballs::dns::{
    interleave_family, Candidate, DnsResolverWithOverrides, GaiResolver, Name, Resolve,
    ResolveHints,
};
use socket2::Domain;

use std::borrow::Cow;
use std::collections::HashMap;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

struct MockResolver {
    response: Vec<IpAddr>,
}

impl Resolve for MockResolver {
    fn resolve(&self, _name: &Name, port: u16, hints: &ResolveHints) -> io::Result<Vec<Candidate>> {
        Ok(self
            .response
            .iter()
            .map(|ip| SocketAddr::new(*ip, port))
            .filter(|addr| hints.accepts(addr))
            .map(Candidate::stream)
            .collect())
    }
}

#[test]
fn test_name_api() {
    let name = Name::new("example.com");
    assert_eq!(name.as_str(), "example.com");
    assert_eq!(name.to_string(), "example.com");
}

#[test]
fn test_dns_overrides() {
    let mock = Arc::new(MockResolver { response: vec![IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8))] });

    let mut overrides = HashMap::new();
    overrides.insert(Cow::Borrowed("local.override"), vec![IpAddr::V4(Ipv4Addr::LOCALHOST)]);

    let resolver = DnsResolverWithOverrides::new(mock, overrides);
    let hints = ResolveHints::default();

    // Test override hit
    let candidates = resolver.resolve(&Name::new("local.override"), 80, &hints).unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].address(), "127.0.0.1:80".parse().unwrap());

    // Test passthrough (miss)
    let candidates = resolver.resolve(&Name::new("other.com"), 443, &hints).unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].address(), "8.8.8.8:443".parse().unwrap());
}

#[test]
fn test_resolver_output_interleaves() {
    let mock = Arc::new(MockResolver {
        response: vec![
            "2001:db8::1".parse().unwrap(),
            "2001:db8::2".parse().unwrap(),
            "2001:db8::3".parse().unwrap(),
            "192.0.2.1".parse().unwrap(),
        ],
    });

    let candidates =
        mock.resolve(&Name::new("v6-heavy.test"), 80, &ResolveHints::default()).unwrap();
    let families: Vec<_> = interleave_family(candidates).map(|c| c.family()).collect();

    assert_eq!(families, vec![Domain::IPV6, Domain::IPV4, Domain::IPV6, Domain::IPV6]);
}

#[test]
fn test_gai_resolver_localhost() {
    let resolver = GaiResolver::new();
    // localhost should always resolve, usually to 127.0.0.1 or ::1
    let result = resolver.resolve(&Name::new("localhost"), 8080, &ResolveHints::default());

    // Depending on system config, this might fail in some CI envs,
    // but usually localhost is standard.
    match result {
        Ok(candidates) => {
            assert!(!candidates.is_empty());
            assert!(candidates.iter().all(|c| c.address().port() == 8080));
            assert!(candidates.iter().all(|c| c.address().ip().is_loopback()));
        }
        Err(e) => eprintln!("GaiResolver failed to resolve localhost: {e}"),
    }
}

#[test]
fn test_gai_resolver_literal_skips_lookup() {
    let resolver = GaiResolver::new();
    let hints = ResolveHints::new().numeric_host(true).canonical_name(true);

    let candidates = resolver.resolve(&Name::new("[::1]"), 53, &hints).unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].family(), Domain::IPV6);
    assert_eq!(candidates[0].address(), "[::1]:53".parse().unwrap());
    assert_eq!(candidates[0].canonical_name(), Some("[::1]"));
}
