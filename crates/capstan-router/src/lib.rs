//! Routed-service table for the Capstan endpoint adapter.
//!
//! This crate is the host-router side of Capstan: it stores one entry per
//! path template and matches incoming request paths against those templates,
//! extracting `{name}` placeholder values along the way.
//!
//! - [`Params`] — placeholder values captured by a match
//! - [`MethodMap<T>`] — per-HTTP-method slots for a single path
//! - [`RouteTable<T>`] — a segment trie mapping path templates to entries
//!
//! The table is generic over its entry type: the Capstan registrar stores
//! fully-built routed services in it, while tests can store plain strings.
//!
//! # Example
//!
//! ```rust
//! use capstan_router::{MethodMap, RouteTable};
//! use http::Method;
//!
//! let mut table = RouteTable::new();
//! table.insert("/users/{id}", MethodMap::new().get("getUser").put("updateUser"));
//!
//! let matched = table.match_path("/users/123").unwrap();
//! assert_eq!(matched.entry.entry(&Method::GET), Some(&"getUser"));
//! assert_eq!(matched.params.get("id"), Some("123"));
//! ```
//!
//! # Matching priority
//!
//! When both a static segment and a placeholder could match, the static
//! segment wins: `/users/me` is matched before `/users/{id}` for the path
//! `/users/me`. Trailing slashes are normalized away.

#![doc(html_root_url = "https://docs.rs/capstan-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod method_map;
mod params;
mod table;

pub use method_map::MethodMap;
pub use params::Params;
pub use table::{PathMatch, RouteTable};
