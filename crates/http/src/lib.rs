//! Bounded-concurrency HTTP liveness checking for extracted URLs.

pub mod checker;

pub use checker::{CheckerConfig, Error, Result, UrlChecker, DEFAULT_USER_AGENT};
