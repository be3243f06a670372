mod detector_options;
mod filesystem_access;
mod label_table;
mod time_calc;
pub mod send_channels;

pub use detector_options::{DetectorOptions, InputLayout};
pub use filesystem_access::FsAccess;
pub use label_table::LabelTable;
pub use send_channels::{FrameInput, FrameOutcome, FrameReply, FrameRequest};
pub use time_calc::TimeCalc;
