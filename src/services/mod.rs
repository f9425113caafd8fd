//! Services module
//!
//! Backend probes and the deployment smoke check

pub mod backends;
pub mod smoke;

pub use backends::{BackendCheck, BackendStatus, PostgresCheck, RedisCheck};
pub use smoke::{run_smoke_check, SmokeReport};
