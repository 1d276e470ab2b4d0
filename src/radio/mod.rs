//! A module to encapsulate all things related to radio operation.
pub mod prelude;

mod rf24;
pub use rf24::{registers, NoIrq, RawRegisters, RF24Link};

mod config;
pub use config::RadioConfig;

mod dump;
pub use dump::RegisterDump;

#[cfg(feature = "std")]
mod shared;
#[cfg(feature = "std")]
pub use shared::SharedLink;
