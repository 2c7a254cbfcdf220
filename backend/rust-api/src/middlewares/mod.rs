pub mod metrics;
pub mod trace;
pub mod wallet;
