pub mod archive;
pub mod config;
pub mod error;
pub mod ini;
pub mod installer;
pub mod introspect;
pub mod preflight;
pub mod service;
pub mod stack;
pub mod target;
