pub mod advisor;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod query;
pub mod regulations;
pub mod service;
pub mod state;
pub mod transport;

pub use crate::advisor::RegulationAdvisor;
pub use crate::config::Config;
pub use crate::error::{CompassError, Result};
pub use crate::models::{Answer, Query, QueryKind};
pub use crate::service::CompassServer;
