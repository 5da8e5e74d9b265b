//! # Shatter Runtime
//!
//! Headless driver for [`shatter_physics`]: builds one of the demo
//! [`scenario`]s and steps it with [`app::run`], logging energy and fracture
//! events as it goes.

pub mod app;
pub mod scenario;
