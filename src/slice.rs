//! Bit ranges of the packed port vectors.
//!
//! Each slice renders as a VHDL range written in terms of the entity generics,
//! and evaluates to concrete bounds for a given [`Config`].

use std::fmt::Display;

use crate::config::{Bank, Config};

/// Generic expression for the selector width inside the generated VHDL.
pub const SELECTOR_WIDTH: &str = "log2c(NWP)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// `AW` bits per lane.
    Address,
    /// `DW` bits per lane.
    Data,
    /// `log2c(NWP)` bits per lane.
    Selector,
}

impl Field {
    fn stride_expr(self) -> &'static str {
        match self {
            Field::Address => "AW",
            Field::Data => "DW",
            Field::Selector => SELECTOR_WIDTH,
        }
    }

    fn stride(self, config: &Config) -> i64 {
        i64::from(match self {
            Field::Address => config.address_width(),
            Field::Data => config.data_width(),
            Field::Selector => config.selector_width(),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Part {
    Whole,
    /// Everything below the selector bits.
    Low,
    /// Only the selector bits at the top of the lane.
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lane {
    Port(u32),
    Bank(Bank),
}

impl Lane {
    fn index(self, config: &Config) -> i64 {
        match self {
            Lane::Port(port) => i64::from(port),
            Lane::Bank(bank) => i64::from(bank.index(config)),
        }
    }
}

impl Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lane::Port(port) => write!(f, "{port}"),
            Lane::Bank(bank) => write!(f, "({}*NRP+{})", bank.write, bank.read),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slice {
    pub field: Field,
    pub part: Part,
    pub lane: Lane,
}

impl Slice {
    /// Inclusive `(high, low)` bounds. A null range has `high < low`.
    pub fn bounds(&self, config: &Config) -> (i64, i64) {
        let stride = self.field.stride(config);
        let selector = i64::from(config.selector_width());
        let index = self.lane.index(config);
        let top = stride * (index + 1) - 1;
        let bottom = stride * index;
        match self.part {
            Part::Whole => (top, bottom),
            Part::Low => (top - selector, bottom),
            Part::High => (top, top + 1 - selector),
        }
    }

    pub fn width(&self, config: &Config) -> i64 {
        let (high, low) = self.bounds(config);
        (high - low + 1).max(0)
    }

    /// `vector(<range>)`
    pub fn of(&self, vector: &str) -> String {
        format!("{vector}({self})")
    }
}

impl Display for Slice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stride = self.field.stride_expr();
        let lane = self.lane;
        match self.part {
            Part::Whole => write!(f, "{stride}*({lane}+1)-1 downto {stride}*{lane}"),
            Part::Low => write!(f, "{stride}*({lane}+1)-{SELECTOR_WIDTH}-1 downto {stride}*{lane}"),
            Part::High => write!(f, "{stride}*({lane}+1)-1 downto {stride}*({lane}+1)-{SELECTOR_WIDTH}"),
        }
    }
}

/// Bank address bits of write port `port` within `waddr_v`.
pub fn write_address_slice(port: u32) -> Slice {
    Slice { field: Field::Address, part: Part::Low, lane: Lane::Port(port) }
}

/// Bank address bits of read port `port` within `raddr_v`.
pub fn read_address_slice(port: u32) -> Slice {
    Slice { field: Field::Address, part: Part::Low, lane: Lane::Port(port) }
}

/// Selector bits of read port `port` within `raddr_v`.
pub fn read_selector_bits(port: u32) -> Slice {
    Slice { field: Field::Address, part: Part::High, lane: Lane::Port(port) }
}

/// Decoded selector of read port `port` within `banksel_v`.
pub fn selector_slice(port: u32) -> Slice {
    Slice { field: Field::Selector, part: Part::Whole, lane: Lane::Port(port) }
}

pub fn write_data_slice(port: u32) -> Slice {
    Slice { field: Field::Data, part: Part::Whole, lane: Lane::Port(port) }
}

pub fn read_data_slice(port: u32) -> Slice {
    Slice { field: Field::Data, part: Part::Whole, lane: Lane::Port(port) }
}

/// Output of `bank` within the intermediate bus `ram_output_i`.
pub fn output_slice(bank: Bank) -> Slice {
    Slice { field: Field::Data, part: Part::Whole, lane: Lane::Bank(bank) }
}
