use std::{error::Error, fmt::Display, str::FromStr};

use log::debug;
use strum_macros::Display;

use crate::{mode::TimingMode, width::log2c};

#[derive(Display, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum Backend {
    /// Generic storage a synthesis tool can map onto block RAM.
    Inferred,
    /// Explicit `RAMB16_S36_S36` instances.
    Instantiated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NonPositive(&'static str, i64),
    OutOfRange(&'static str, i64),
    UnknownTimingMode(String),
    UnsupportedTimingMode { backend: Backend, mode: TimingMode },
    TooManyWritePorts { write_ports: u32, depth: u32 },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NonPositive(name, value) => write!(f, "{name} must be positive, got {value}"),
            ConfigError::OutOfRange(name, value) => write!(f, "{name} is too large: {value}"),
            ConfigError::UnknownTimingMode(name) => write!(f, "unknown read mode {name:?}"),
            ConfigError::UnsupportedTimingMode { backend, mode } => {
                write!(f, "read mode {mode} is not supported by the {backend} backend")
            }
            ConfigError::TooManyWritePorts { write_ports, depth } => {
                write!(f, "{write_ports} write ports cannot partition a {depth}-word address space")
            }
        }
    }
}

impl Error for ConfigError {}

/// Validated register file parameters. Every emitter is a pure function of
/// this value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    write_ports: u32,
    read_ports: u32,
    data_width: u32,
    depth: u32,
    backend: Backend,
    timing_mode: TimingMode,
}

fn positive(name: &'static str, value: i64) -> Result<u32, ConfigError> {
    if value <= 0 {
        return Err(ConfigError::NonPositive(name, value));
    }
    u32::try_from(value).map_err(|_| ConfigError::OutOfRange(name, value))
}

impl Config {
    pub fn new(
        write_ports: i64,
        read_ports: i64,
        data_width: i64,
        depth: i64,
        backend: Backend,
        timing_mode: TimingMode,
    ) -> Result<Config, ConfigError> {
        let config = Config {
            write_ports: positive("number of write ports", write_ports)?,
            read_ports: positive("number of read ports", read_ports)?,
            data_width: positive("data width", data_width)?,
            depth: positive("number of registers", depth)?,
            backend,
            timing_mode,
        };
        config.validate()?;
        debug!(
            "config: {} write / {} read ports, AW={} SW={} DW={}",
            config.write_ports,
            config.read_ports,
            config.address_width(),
            config.selector_width(),
            config.data_width
        );
        Ok(config)
    }

    /// Like [`Config::new`], with the timing mode given by name.
    pub fn with_mode_name(
        write_ports: i64,
        read_ports: i64,
        data_width: i64,
        depth: i64,
        backend: Backend,
        timing_mode: &str,
    ) -> Result<Config, ConfigError> {
        let timing_mode = TimingMode::from_str(timing_mode)
            .map_err(|_| ConfigError::UnknownTimingMode(timing_mode.to_string()))?;
        Config::new(write_ports, read_ports, data_width, depth, backend, timing_mode)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.timing_mode.supported_by(self.backend) {
            return Err(ConfigError::UnsupportedTimingMode {
                backend: self.backend,
                mode: self.timing_mode,
            });
        }
        if self.selector_width() > self.address_width() {
            return Err(ConfigError::TooManyWritePorts {
                write_ports: self.write_ports,
                depth: self.depth,
            });
        }
        Ok(())
    }

    pub fn write_ports(&self) -> u32 {
        self.write_ports
    }

    pub fn read_ports(&self) -> u32 {
        self.read_ports
    }

    pub fn data_width(&self) -> u32 {
        self.data_width
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn timing_mode(&self) -> TimingMode {
        self.timing_mode
    }

    pub fn address_width(&self) -> u32 {
        log2c(self.depth)
    }

    /// Number of high address bits naming the write port that owns an address.
    pub fn selector_width(&self) -> u32 {
        log2c(self.write_ports)
    }

    /// Address bits that actually reach a bank.
    pub fn bank_address_width(&self) -> u32 {
        self.address_width() - self.selector_width()
    }

    pub fn needs_selection(&self) -> bool {
        self.write_ports > 1
    }

    pub fn bank_count(&self) -> u32 {
        self.write_ports * self.read_ports
    }

    /// Every (write port, read port) pair in bank index order.
    pub fn banks(&self) -> impl Iterator<Item = Bank> + '_ {
        (0..self.write_ports)
            .flat_map(move |write| (0..self.read_ports).map(move |read| Bank { write, read }))
    }
}

/// The memory serving write port `write` and read port `read`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bank {
    pub write: u32,
    pub read: u32,
}

impl Bank {
    /// Position of this bank on the flat intermediate output bus.
    pub fn index(&self, config: &Config) -> u32 {
        self.write * config.read_ports() + self.read
    }
}
