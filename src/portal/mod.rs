pub mod bindings;
pub mod client;

pub use bindings::WavePortal;
pub use client::{PendingWave, PortalContract, WaveContract};
