pub mod dtg;
pub mod report;
pub mod unpacker;

pub use dtg::{Dtg, DtgParser};
pub use report::{ExperimentReport, MemberReport, UnpackReport};
pub use unpacker::{UnpackOutcome, Unpacker};
