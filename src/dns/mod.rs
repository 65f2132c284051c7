//! Name Resolution Module
//!
//! Turns a host/port pair into the ordered candidate list a race consumes:
//! - [`Resolve`]: pluggable resolver abstraction
//! - [`GaiResolver`]: system resolver (getaddrinfo)
//! - [`DnsResolverWithOverrides`]: hostname-to-IP override mechanism
//! - [`interleave_family`]: fair round-robin ordering across address families
//!
//! # Example
//!
//! ```rust,ignore
//! use eyeballs::dns::{interleave_family, GaiResolver, Name, Resolve, ResolveHints};
//!
//! let resolver = GaiResolver::new();
//! let candidates = resolver.resolve(&Name::new("example.com"), 443, &ResolveHints::default())?;
//! for candidate in interleave_family(candidates) {
//!     println!("Candidate: {}", candidate.address());
//! }
//! ```

mod candidate;
mod gai;
mod interleave;
mod resolve;

pub use candidate::{Candidate, ResolveHints};
pub use gai::GaiResolver;
pub use interleave::{interleave_by, interleave_family, Interleave};
pub use resolve::{DnsResolverWithOverrides, Name, Resolve};
