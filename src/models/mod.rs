pub mod client;
pub mod conversion;

pub use client::{FunnelStatus, LeadSource};
