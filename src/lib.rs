//! Gateway to a deployed WavePortal contract: maintains a locally
//! materialized wave list and count, reconciled across a one-time bulk
//! fetch, user-initiated submissions and a live event subscription, and
//! exposes the view over a thin HTTP surface.

pub mod api;
pub mod config;
pub mod error;
pub mod ledger;
pub mod portal;
pub mod session;
pub mod subscriber;
