//! Network layer: the [`Fetcher`] transport seam and its reqwest
//! implementation.
//!
//! Transport failures are typed ([`FetchError`]) so the routing layer can
//! tell "no response arrived" apart from "a response arrived with a bad
//! status"; only the former triggers cache fallback.

pub mod client;
pub mod error;

pub use client::{Fetcher, NetClient};
pub use error::FetchError;
