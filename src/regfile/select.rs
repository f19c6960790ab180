use super::RegisterFile;
use crate::{
    slice::{read_selector_bits, selector_slice, SELECTOR_WIDTH},
    vhdl::{Decl, Stmt, Ty},
};

/// Decoded selector of every read port, `NRP*log2c(NWP)` bits.
pub const SELECTOR_BUS: &str = "banksel_v";

impl<'a> RegisterFile<'a> {
    pub fn create_selection_decls(&self) -> Vec<Decl> {
        if !self.config.needs_selection() {
            return vec![];
        }
        vec![Decl::new_signal(SELECTOR_BUS, Ty::vector(format!("NRP*{SELECTOR_WIDTH}")))]
    }

    /// Routes the high address bits of each read port to its selector. With a
    /// single write port there is nothing to select and the block is empty.
    pub fn create_selection(&self) -> Vec<Stmt> {
        if !self.config.needs_selection() {
            return vec![];
        }
        (0..self.config.read_ports())
            .map(|port| Stmt::new_assign(selector_slice(port).of(SELECTOR_BUS), read_selector_bits(port).of("raddr_v")))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use crate::{
        config::{Backend, Config},
        mode::TimingMode,
        regfile::RegisterFile,
        vhdl::Stmt,
    };

    #[test]
    fn single_write_port_needs_no_selection() {
        let config = Config::new(1, 3, 16, 1024, Backend::Inferred, TimingMode::ReadAsync).unwrap();
        let regfile = RegisterFile::new(&config);
        assert!(regfile.create_selection().is_empty());
        assert!(regfile.create_selection_decls().is_empty());
    }

    #[test]
    fn one_selector_per_read_port() {
        let config = Config::new(3, 2, 16, 1024, Backend::Inferred, TimingMode::ReadAsync).unwrap();
        let regfile = RegisterFile::new(&config);
        let stmts = regfile.create_selection();
        assert_eq!(
            stmts,
            vec![
                Stmt::new_assign(
                    "banksel_v(log2c(NWP)*(0+1)-1 downto log2c(NWP)*0)",
                    "raddr_v(AW*(0+1)-1 downto AW*(0+1)-log2c(NWP))"
                ),
                Stmt::new_assign(
                    "banksel_v(log2c(NWP)*(1+1)-1 downto log2c(NWP)*1)",
                    "raddr_v(AW*(1+1)-1 downto AW*(1+1)-log2c(NWP))"
                ),
            ]
        );
        assert_eq!(
            regfile.create_selection_decls()[0].to_string(),
            "signal banksel_v    : std_logic_vector(NRP*log2c(NWP)-1 downto 0);"
        );
    }
}
