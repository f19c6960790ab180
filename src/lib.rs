//! Generator of multi-port register files in VHDL.
//!
//! A register file with `NWP` write ports and `NRP` read ports is built from
//! `NWP*NRP` single-write/single-read banks. Each write port owns a slice of
//! the address space selected by the top `log2c(NWP)` address bits; every read
//! port decodes those bits to pick the bank written by the owning port.

mod banner;
pub mod cli;
pub mod config;
pub mod error;
pub mod mode;
pub mod output;
pub mod regfile;
pub mod slice;
pub mod support;
pub mod vhdl;
pub mod width;

pub use config::{Backend, Bank, Config, ConfigError};
pub use error::Error;
pub use mode::TimingMode;
pub use regfile::{generate, RegisterFile};
