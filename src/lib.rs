//! FosterTrack: foster cat records and their daily care logs.
//!
//! The [`db`] module owns storage: a [`db::ConnectionManager`] hands out the
//! shared [`db::Database`] handle, which carries every cat and care log
//! operation. [`api`] exposes those operations over HTTP.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
