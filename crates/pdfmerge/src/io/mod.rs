//! Reading selected files and delivering merged output.

pub mod intake;
pub mod writer;

pub use intake::{FileIntake, IntakeBatch, RejectedFile};
pub use writer::{OutputWriter, WriteOptions};
