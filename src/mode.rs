use std::fmt::Display;

use strum_macros::{EnumIter, EnumString};

use crate::{config::Backend, error::Error};

/// Behaviour of a read that hits the address being written in the same cycle.
#[derive(EnumString, EnumIter, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[strum(ascii_case_insensitive)]
pub enum TimingMode {
    /// Combinational read, no clock dependency.
    #[strum(serialize = "read-async", serialize = "read_async")]
    ReadAsync,
    /// Registered read returning the value from before the write.
    #[strum(serialize = "read-first", serialize = "read_first")]
    ReadFirst,
    /// Registered read forwarding the newly written value.
    #[strum(serialize = "write-first", serialize = "write_first")]
    WriteFirst,
    /// Registered read address, one cycle of latency.
    #[strum(serialize = "read-through", serialize = "read_through")]
    ReadThrough,
}

impl TimingMode {
    /// Identifier used in the generated VHDL: the `regfile_core` architecture
    /// name for inferred banks, the `WRITE_MODE_*` generic for block RAMs.
    pub fn as_vhdl(self) -> &'static str {
        match self {
            TimingMode::ReadAsync => "READ_ASYNC",
            TimingMode::ReadFirst => "READ_FIRST",
            TimingMode::WriteFirst => "WRITE_FIRST",
            TimingMode::ReadThrough => "READ_THROUGH",
        }
    }

    pub fn supported_by(self, backend: Backend) -> bool {
        match backend {
            Backend::Inferred => true,
            Backend::Instantiated => matches!(self, TimingMode::ReadFirst | TimingMode::WriteFirst),
        }
    }

    /// Resolves the mode string for `backend`. Configuration validation already
    /// rejects unsupported pairs, so a failure here is a generator defect.
    pub fn resolve(self, backend: Backend) -> Result<&'static str, Error> {
        if self.supported_by(backend) {
            Ok(self.as_vhdl())
        } else {
            Err(Error::internal(format!("{backend} backend reached with unsupported mode {self}")))
        }
    }
}

impl Display for TimingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_vhdl())
    }
}

#[cfg(test)]
mod test {
    use super::TimingMode;
    use crate::config::Backend;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_command_line_spellings() {
        assert_eq!(TimingMode::from_str("read-async"), Ok(TimingMode::ReadAsync));
        assert_eq!(TimingMode::from_str("read-first"), Ok(TimingMode::ReadFirst));
        assert_eq!(TimingMode::from_str("WRITE_FIRST"), Ok(TimingMode::WriteFirst));
        assert_eq!(TimingMode::from_str("Read-Through"), Ok(TimingMode::ReadThrough));
        assert!(TimingMode::from_str("read-sometimes").is_err());
    }

    #[test]
    fn inferred_backend_accepts_every_mode() {
        for mode in TimingMode::iter() {
            assert_eq!(mode.resolve(Backend::Inferred).unwrap(), mode.as_vhdl());
        }
    }

    #[test]
    fn block_ram_supports_two_modes() {
        assert_eq!(TimingMode::ReadFirst.resolve(Backend::Instantiated).unwrap(), "READ_FIRST");
        assert_eq!(TimingMode::WriteFirst.resolve(Backend::Instantiated).unwrap(), "WRITE_FIRST");
        let error = TimingMode::ReadAsync.resolve(Backend::Instantiated).unwrap_err();
        assert_eq!(error.exit_code(), 3);
        assert!(TimingMode::ReadThrough.resolve(Backend::Instantiated).is_err());
    }
}
