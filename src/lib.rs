//! Client side of the HR portal: session, typed backend calls and the
//! punch-in/punch-out attendance state.

pub mod api;
pub mod attendance;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod utils;

pub use config::Config;
pub use error::{PortalError, Result};
