pub mod state;
pub mod view;

pub use state::{SubmissionState, WaveLedger, WaveRecord};
pub use view::{LedgerView, SharedLedger};
