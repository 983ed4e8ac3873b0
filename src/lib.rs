#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::items_after_statements)]

#[macro_use]
extern crate tracing;
#[macro_use]
extern crate async_trait;

pub mod api;
pub mod auth;
pub mod cfg;
pub mod dashboard;
pub mod envelope;
pub mod error;
pub mod gradebook;
pub mod models;
pub mod state;
pub mod stats;
