//! Core types, validation, and services for the Census person registry.
//!
//! This crate has no HTTP or database dependencies.
//! Storage backends implement the traits in [`store`]; presentation layers
//! talk to the façades in [`service`].

// Native `async fn` in trait impls; the traits spell out `Send` futures.
#![allow(async_fn_in_trait)]

pub mod country;
pub mod error;
pub mod memory;
pub mod person;
pub mod query;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{Error, Result};
