pub mod collection;
pub mod config;
pub mod error;
pub mod io;
pub mod logger;
pub mod model;
pub mod organization;
pub mod paths;
pub mod session;
pub mod site;
pub mod transport;
pub mod upstream;
pub mod user;
pub mod workflow;

pub use error::{Result, TerminusError};
