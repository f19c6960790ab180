use std::{ffi::OsString, path::PathBuf};

use clap::Parser;

use crate::config::{Backend, Config, ConfigError};

const EXAMPLE: &str = "Example: mprfgen -infer -read-first -nwp 2 -nrp 3 file.vhd";

#[derive(Parser, Debug)]
#[clap(
    name = "mprfgen",
    version,
    about = "Multi-port register file generator for block RAM based FPGAs",
    after_help = EXAMPLE,
    disable_help_flag = true,
    args_override_self = true
)]
pub struct Args {
    /// Print this help
    #[clap(short = 'h', long = "help", action)]
    pub usage: bool,
    /// Use generic RAM storage that can be inferred as block RAM(s)
    #[clap(long, action)]
    pub infer: bool,
    /// Read mode: read-async, read-first, write-first or read-through;
    /// read-async and read-through need -infer
    #[clap(long = "read-mode", value_name = "MODE", value_parser, default_value = "read-async")]
    pub read_mode: String,
    /// Number of write ports
    #[clap(long, value_parser, allow_hyphen_values = true, default_value_t = 1)]
    pub nwp: i64,
    /// Number of read ports
    #[clap(long, value_parser, allow_hyphen_values = true, default_value_t = 2)]
    pub nrp: i64,
    /// Bit width of each memory entry
    #[clap(long, value_parser, allow_hyphen_values = true, default_value_t = 16)]
    pub bw: i64,
    /// Number of registers
    #[clap(long, value_parser, allow_hyphen_values = true, default_value_t = 1024)]
    pub nregs: i64,
    /// Also write util_functions_pkg.vhd and regfile_core.vhd into DIR
    #[clap(long = "emit-support", value_name = "DIR", value_parser)]
    pub support_dir: Option<PathBuf>,
    /// Output file; standard output when omitted
    #[clap(value_parser)]
    pub output: Option<PathBuf>,
}

impl Args {
    pub fn backend(&self) -> Backend {
        if self.infer {
            Backend::Inferred
        } else {
            Backend::Instantiated
        }
    }

    pub fn to_config(&self) -> Result<Config, ConfigError> {
        Config::with_mode_name(self.nwp, self.nrp, self.bw, self.nregs, self.backend(), &self.read_mode)
    }
}

const VALUE_FLAGS: &[&str] = &["nwp", "nrp", "bw", "nregs"];
const MODE_FLAGS: &[&str] = &["read-async", "read-first", "write-first", "read-through"];

/// Rewrites the traditional single-dash spellings (`-nwp 2`, `-infer`,
/// `-read-first`) into the long options `Args` declares. Anything else,
/// including negative numbers, passes through untouched.
pub fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let Some(text) = arg.to_str() else { return arg };
            let name = text.strip_prefix("--").or_else(|| text.strip_prefix('-')).unwrap_or(text);
            if name.len() == text.len() {
                return arg;
            }
            if MODE_FLAGS.contains(&name) {
                OsString::from(format!("--read-mode={name}"))
            } else if name == "infer" || VALUE_FLAGS.contains(&name) {
                OsString::from(format!("--{name}"))
            } else {
                arg
            }
        })
        .collect()
}

pub fn parse<I>(args: I) -> Result<Args, clap::Error>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    Args::try_parse_from(normalize_legacy_flags(args))
}
