pub mod config;
pub mod credit;
pub mod dates;
pub mod error;
pub mod import;
pub mod remote;
pub mod telemetry;
