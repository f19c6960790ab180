use log::debug;

use super::{RegisterFile, BANK_BUS};
use crate::{
    config::{Backend, Bank, Config},
    error::Error,
    slice::{output_slice, read_address_slice, write_address_slice, write_data_slice},
    vhdl::{Decl, Instance, Process, Sequential, Stmt, Ty},
};

/// Realizes one single-write/single-read bank.
pub trait BankStrategy {
    /// Vendor library and package the instances need, if any.
    fn library(&self) -> Option<(&'static str, &'static str)> {
        None
    }

    /// Architecture declarations shared by all banks.
    fn declarations(&self, _config: &Config) -> Vec<Decl> {
        vec![]
    }

    /// Statements realizing `bank`; they drive the bank's slice of the
    /// intermediate bus.
    fn emit(&self, bank: Bank, config: &Config) -> Result<Vec<Stmt>, Error>;
}

pub fn strategy(backend: Backend) -> &'static dyn BankStrategy {
    match backend {
        Backend::Inferred => &Inferred,
        Backend::Instantiated => &Instantiated,
    }
}

pub fn instance_label(bank: Bank, config: &Config) -> String {
    format!("nwp_nrp_bram_instance_{}", bank.index(config))
}

/// `regfile_core` entity instances; the timing mode picks the architecture.
pub struct Inferred;

impl BankStrategy for Inferred {
    fn emit(&self, bank: Bank, config: &Config) -> Result<Vec<Stmt>, Error> {
        let mode = config.timing_mode().resolve(Backend::Inferred)?;
        let mut instance = Instance::new_entity(&instance_label(bank, config), "WORK", "regfile_core", Some(mode));
        instance.add_generic("AW", "AW-log2c(NWP)");
        instance.add_generic("DW", "DW");
        instance.connect("clock", "clock");
        instance.connect("reset", "reset");
        instance.connect("enable", "enable");
        instance.connect("we", format!("we_v({})", bank.write));
        instance.connect("re", format!("re_v({})", bank.read));
        instance.connect("waddr", write_address_slice(bank.write).of("waddr_v"));
        instance.connect("raddr", read_address_slice(bank.read).of("raddr_v"));
        instance.connect("input_data", write_data_slice(bank.write).of("input_data_v"));
        instance.connect("ram_output", output_slice(bank).of(BANK_BUS));
        Ok(vec![Stmt::Instance(instance)])
    }
}

const BRAM_PRIMITIVE: &str = "RAMB16_S36_S36";
/// Address width of the primitive ports (512 words).
const BRAM_ADDRESS_WIDTH: u32 = 9;
/// Data width of the primitive ports, parity bits excluded.
const BRAM_DATA_WIDTH: u32 = 32;
const BRAM_INIT_WORDS: u32 = 0x40;
const BRAM_INITP_WORDS: u32 = 0x08;
const BRAM_ZERO_INIT: &str = "X\"0000000000000000000000000000000000000000000000000000000000000000\"";

fn bits(width: u32) -> Ty {
    Ty::Named(format!("std_logic_vector({} downto 0)", width - 1))
}

/// Primitives realizing one bank: `columns` side by side cover the data
/// width, `rows` stacked cover the bank address space. The row is named by
/// the address bits above the primitive's own 9.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BramGrid {
    pub rows: u32,
    pub columns: u32,
    pub row_bits: u32,
}

impl BramGrid {
    pub fn new(config: &Config) -> BramGrid {
        let row_bits = config.bank_address_width().saturating_sub(BRAM_ADDRESS_WIDTH);
        BramGrid { rows: 1 << row_bits, columns: config.data_width().div_ceil(BRAM_DATA_WIDTH), row_bits }
    }

    pub fn address_width(&self) -> u32 {
        BRAM_ADDRESS_WIDTH + self.row_bits
    }

    pub fn data_width(&self) -> u32 {
        self.columns * BRAM_DATA_WIDTH
    }

    fn is_single(&self) -> bool {
        self.rows == 1 && self.columns == 1
    }

    fn column_bits(&self, column: u32) -> String {
        if self.columns == 1 {
            String::new()
        } else {
            format!("({} downto {})", BRAM_DATA_WIDTH * (column + 1) - 1, BRAM_DATA_WIDTH * column)
        }
    }

    /// Row number bits of a per-bank address signal.
    fn row_of(&self, signal: &str, index: u32) -> String {
        format!("{signal}({index})({} downto {BRAM_ADDRESS_WIDTH})", self.address_width() - 1)
    }
}

/// Dual-port `RAMB16_S36_S36` instances: port A writes, port B reads.
///
/// Bank addresses and data are zero-extended through per-bank signals, so
/// every port association matches in width. A bank wider than 32 bits or
/// deeper than 512 words is tiled from a grid of primitives; the write
/// enable is decoded per row and the read row is registered alongside the
/// primitive output.
pub struct Instantiated;

impl Instantiated {
    fn primitive(&self, bank: Bank, config: &Config, mode: &str, row: u32, column: u32) -> Instance {
        let grid = BramGrid::new(config);
        let index = bank.index(config);
        let label = if grid.is_single() {
            instance_label(bank, config)
        } else {
            format!("{}_{row}_{column}", instance_label(bank, config))
        };
        let port_address = |signal: &str| {
            if grid.row_bits == 0 {
                format!("{signal}({index})")
            } else {
                format!("{signal}({index})({} downto 0)", BRAM_ADDRESS_WIDTH - 1)
            }
        };
        let write_enable = if grid.rows == 1 {
            format!("we_v({})", bank.write)
        } else {
            format!("bram_wea({index})({row})")
        };
        let data = grid.column_bits(column);

        let mut instance = Instance::new_component(&label, BRAM_PRIMITIVE);
        instance.add_generic("WRITE_MODE_A", format!("\"{mode}\""));
        instance.add_generic("WRITE_MODE_B", format!("\"{mode}\""));
        for word in 0..BRAM_INIT_WORDS {
            instance.add_generic(&format!("INIT_{word:02X}"), BRAM_ZERO_INIT);
        }
        for word in 0..BRAM_INITP_WORDS {
            instance.add_generic(&format!("INITP_{word:02X}"), BRAM_ZERO_INIT);
        }
        instance.connect("DIA", format!("bram_dia({index}){data}"));
        instance.connect("DIPA", "(others => '0')");
        instance.connect("ADDRA", port_address("bram_addra"));
        instance.connect("ENA", "enable");
        instance.connect("WEA", write_enable);
        instance.connect("SSRA", "reset");
        instance.connect("CLKA", "clock");
        instance.connect("DOA", "open");
        instance.connect("DOPA", "open");
        instance.connect("DIB", "(others => '0')");
        instance.connect("DIPB", "(others => '0')");
        instance.connect("ADDRB", port_address("bram_addrb"));
        instance.connect("ENB", "enable");
        instance.connect("WEB", "'0'");
        instance.connect("SSRB", "reset");
        instance.connect("CLKB", "clock");
        instance.connect("DOB", format!("bram_dob({}){data}", index * grid.rows + row));
        instance.connect("DOPB", "open");
        instance
    }
}

impl BankStrategy for Instantiated {
    fn library(&self) -> Option<(&'static str, &'static str)> {
        Some(("UNISIM", "vcomponents"))
    }

    fn declarations(&self, config: &Config) -> Vec<Decl> {
        let grid = BramGrid::new(config);
        let address_array = Ty::Named("bram_addr_type".to_string());
        let data_array = Ty::Named("bram_data_type".to_string());
        let mut types = vec![
            Decl::new_array_type("bram_addr_type", "0 to NWP*NRP-1", bits(grid.address_width())),
            Decl::new_array_type("bram_data_type", "0 to NWP*NRP-1", bits(grid.data_width())),
        ];
        let mut signals = vec![
            Decl::new_signal("bram_addra", address_array.clone()),
            Decl::new_signal("bram_addrb", address_array),
            Decl::new_signal("bram_dia", data_array.clone()),
        ];
        if grid.rows == 1 {
            signals.push(Decl::new_signal("bram_dob", data_array));
        } else {
            let outputs = format!("0 to NWP*NRP*{}-1", grid.rows);
            types.push(Decl::new_array_type("bram_dob_type", &outputs, bits(grid.data_width())));
            types.push(Decl::new_array_type("bram_we_type", "0 to NWP*NRP-1", bits(grid.rows)));
            types.push(Decl::new_array_type("bram_row_type", "0 to NWP*NRP-1", bits(grid.row_bits)));
            signals.push(Decl::new_signal("bram_dob", Ty::Named("bram_dob_type".to_string())));
            signals.push(Decl::new_signal("bram_wea", Ty::Named("bram_we_type".to_string())));
            signals.push(Decl::new_signal("bram_rowb", Ty::Named("bram_row_type".to_string())));
        }
        types.extend(signals);
        types
    }

    fn emit(&self, bank: Bank, config: &Config) -> Result<Vec<Stmt>, Error> {
        let mode = config.timing_mode().resolve(Backend::Instantiated)?;
        let grid = BramGrid::new(config);
        let index = bank.index(config);
        let resize = |source: String, width: u32| format!("std_logic_vector(resize(unsigned({source}), {width}))");

        let mut stmts = vec![
            Stmt::new_assign(
                format!("bram_addra({index})"),
                resize(write_address_slice(bank.write).of("waddr_v"), grid.address_width()),
            ),
            Stmt::new_assign(
                format!("bram_addrb({index})"),
                resize(read_address_slice(bank.read).of("raddr_v"), grid.address_width()),
            ),
            Stmt::new_assign(
                format!("bram_dia({index})"),
                resize(write_data_slice(bank.write).of("input_data_v"), grid.data_width()),
            ),
        ];
        if grid.rows > 1 {
            let write_row = grid.row_of("bram_addra", index);
            for row in 0..grid.rows {
                stmts.push(Stmt::new_assign(
                    format!("bram_wea({index})({row})"),
                    format!("we_v({}) when unsigned({write_row}) = {row} else '0'", bank.write),
                ));
            }
            let mut register = Process::new(&["clock"]);
            register.add_seq(Sequential::new_if(
                "rising_edge(clock)",
                vec![Sequential::new_if(
                    "enable = '1'",
                    vec![Sequential::new_if_else(
                        "reset = '1'",
                        vec![Sequential::new_assign(format!("bram_rowb({index})"), "(others => '0')")],
                        vec![Sequential::new_assign(format!("bram_rowb({index})"), grid.row_of("bram_addrb", index))],
                    )],
                )],
            ));
            stmts.push(Stmt::Process(register));
        }
        for row in 0..grid.rows {
            for column in 0..grid.columns {
                stmts.push(Stmt::Instance(self.primitive(bank, config, mode, row, column)));
            }
        }

        let output = |row: u32| format!("bram_dob({})(DW-1 downto 0)", index * grid.rows + row);
        let mut selected: Vec<String> = (0..grid.rows - 1)
            .map(|row| format!("{} when unsigned(bram_rowb({index})) = {row} else", output(row)))
            .collect();
        selected.push(output(grid.rows - 1));
        stmts.push(Stmt::new_assign(output_slice(bank).of(BANK_BUS), selected.join(" ")));
        Ok(stmts)
    }
}

impl<'a> RegisterFile<'a> {
    /// One statement block per bank, in bank index order.
    pub fn create_banks(&self) -> Result<Vec<Vec<Stmt>>, Error> {
        let strategy = self.strategy();
        self.config
            .banks()
            .map(|bank| {
                debug!("bank {} <- write port {}, read port {}", bank.index(self.config), bank.write, bank.read);
                strategy.emit(bank, self.config)
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mode::TimingMode;

    fn instances(blocks: &[Vec<Stmt>]) -> Vec<&Instance> {
        blocks
            .iter()
            .flatten()
            .filter_map(|stmt| match stmt {
                Stmt::Instance(instance) => Some(instance),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn one_bank_per_port_pair() {
        for (write_ports, read_ports) in [(1, 1), (1, 2), (2, 3), (4, 1), (3, 5)] {
            for backend in [Backend::Inferred, Backend::Instantiated] {
                let config = Config::new(write_ports, read_ports, 16, 256, backend, TimingMode::ReadFirst).unwrap();
                let blocks = RegisterFile::new(&config).create_banks().unwrap();
                assert_eq!(blocks.len() as i64, write_ports * read_ports);
                assert_eq!(instances(&blocks).len() as i64, write_ports * read_ports);
            }
        }
    }

    #[test]
    fn grid_covers_bank() {
        let grid = |write_ports, data_width, depth| {
            let config = Config::new(write_ports, 1, data_width, depth, Backend::Instantiated, TimingMode::ReadFirst);
            BramGrid::new(&config.unwrap())
        };
        assert_eq!(grid(1, 16, 512), BramGrid { rows: 1, columns: 1, row_bits: 0 });
        assert_eq!(grid(1, 16, 1024), BramGrid { rows: 2, columns: 1, row_bits: 1 });
        assert_eq!(grid(2, 64, 1024), BramGrid { rows: 1, columns: 2, row_bits: 0 });
        assert_eq!(grid(1, 33, 4096), BramGrid { rows: 8, columns: 2, row_bits: 3 });
        assert_eq!(grid(1, 33, 4096).address_width(), 12);
        assert_eq!(grid(1, 33, 4096).data_width(), 64);
    }

    #[test]
    fn wide_bank_splits_data_over_columns() {
        let config = Config::new(2, 1, 64, 1024, Backend::Instantiated, TimingMode::WriteFirst).unwrap();
        let stmts = Instantiated.emit(Bank { write: 1, read: 0 }, &config).unwrap();
        let blocks = [stmts.clone()];
        let primitives = instances(&blocks);
        let labels: Vec<&str> = primitives.iter().map(|instance| instance.label.as_str()).collect();
        assert_eq!(labels, ["nwp_nrp_bram_instance_1_0_0", "nwp_nrp_bram_instance_1_0_1"]);
        assert_eq!(primitives[1].get_connection("DIA"), Some("bram_dia(1)(63 downto 32)"));
        assert_eq!(primitives[1].get_connection("DOB"), Some("bram_dob(1)(63 downto 32)"));
        assert_eq!(primitives[0].get_connection("WEA"), Some("we_v(1)"));
        assert_eq!(
            stmts[2],
            Stmt::new_assign(
                "bram_dia(1)",
                "std_logic_vector(resize(unsigned(input_data_v(DW*(1+1)-1 downto DW*1)), 64))"
            )
        );
        let output = output_slice(Bank { write: 1, read: 0 }).of(BANK_BUS);
        assert_eq!(stmts.last(), Some(&Stmt::new_assign(output, "bram_dob(1)(DW-1 downto 0)")));
    }

    #[test]
    fn deep_bank_stacks_rows() {
        let config = Config::new(1, 2, 16, 1024, Backend::Instantiated, TimingMode::ReadFirst).unwrap();
        let stmts = Instantiated.emit(Bank { write: 0, read: 1 }, &config).unwrap();
        assert_eq!(
            stmts[3],
            Stmt::new_assign("bram_wea(1)(0)", "we_v(0) when unsigned(bram_addra(1)(9 downto 9)) = 0 else '0'")
        );
        assert_eq!(
            stmts[4],
            Stmt::new_assign("bram_wea(1)(1)", "we_v(0) when unsigned(bram_addra(1)(9 downto 9)) = 1 else '0'")
        );
        assert!(matches!(stmts[5], Stmt::Process(_)));
        let blocks = [stmts.clone()];
        let primitives = instances(&blocks);
        assert_eq!(primitives.len(), 2);
        assert_eq!(primitives[1].label, "nwp_nrp_bram_instance_1_1_0");
        assert_eq!(primitives[1].get_connection("ADDRA"), Some("bram_addra(1)(8 downto 0)"));
        assert_eq!(primitives[1].get_connection("WEA"), Some("bram_wea(1)(1)"));
        assert_eq!(primitives[1].get_connection("DOB"), Some("bram_dob(3)"));
        assert_eq!(
            stmts.last(),
            Some(&Stmt::new_assign(
                "ram_output_i(DW*((0*NRP+1)+1)-1 downto DW*(0*NRP+1))",
                "bram_dob(2)(DW-1 downto 0) when unsigned(bram_rowb(1)) = 0 else bram_dob(3)(DW-1 downto 0)"
            ))
        );
    }

    #[test]
    fn deep_bank_declarations() {
        let config = Config::new(1, 2, 16, 1024, Backend::Instantiated, TimingMode::ReadFirst).unwrap();
        let text: Vec<String> = Instantiated.declarations(&config).iter().map(ToString::to_string).collect();
        let declared = |line: &str| text.iter().any(|decl| decl == line);
        assert!(declared("type bram_addr_type is array (0 to NWP*NRP-1) of std_logic_vector(9 downto 0);"));
        assert!(declared("type bram_dob_type is array (0 to NWP*NRP*2-1) of std_logic_vector(31 downto 0);"));
        assert!(declared("type bram_row_type is array (0 to NWP*NRP-1) of std_logic_vector(0 downto 0);"));
        assert!(declared("signal bram_rowb    : bram_row_type;"));
    }

    #[test]
    fn inferred_bank_wiring() {
        let config = Config::new(2, 3, 16, 1024, Backend::Inferred, TimingMode::ReadThrough).unwrap();
        let stmts = Inferred.emit(Bank { write: 1, read: 2 }, &config).unwrap();
        let [Stmt::Instance(instance)] = stmts.as_slice() else { panic!("expected a single instance") };
        assert_eq!(instance.label, "nwp_nrp_bram_instance_5");
        assert_eq!(instance.unit.to_string(), "entity WORK.regfile_core(READ_THROUGH)");
        assert_eq!(instance.get_connection("we"), Some("we_v(1)"));
        assert_eq!(instance.get_connection("re"), Some("re_v(2)"));
        assert_eq!(instance.get_connection("waddr"), Some("waddr_v(AW*(1+1)-log2c(NWP)-1 downto AW*1)"));
        assert_eq!(instance.get_connection("raddr"), Some("raddr_v(AW*(2+1)-log2c(NWP)-1 downto AW*2)"));
        assert_eq!(instance.get_connection("input_data"), Some("input_data_v(DW*(1+1)-1 downto DW*1)"));
        assert_eq!(
            instance.get_connection("ram_output"),
            Some("ram_output_i(DW*((1*NRP+2)+1)-1 downto DW*(1*NRP+2))")
        );
    }

    #[test]
    fn block_ram_bank_wiring() {
        let config = Config::new(2, 1, 16, 1024, Backend::Instantiated, TimingMode::WriteFirst).unwrap();
        let stmts = Instantiated.emit(Bank { write: 1, read: 0 }, &config).unwrap();
        let instance = instances(&[stmts.clone()])[0].clone();
        assert_eq!(instance.unit.to_string(), "RAMB16_S36_S36");
        assert_eq!(instance.generic_map[0].actual, "\"WRITE_FIRST\"");
        assert_eq!(instance.generic_map[1].actual, "\"WRITE_FIRST\"");
        assert_eq!(instance.generic_map.len(), 2 + 64 + 8);
        assert_eq!(instance.generic_map.last().map(|assoc| assoc.formal.as_str()), Some("INITP_07"));
        assert!(instance.generic_map[2..].iter().all(|assoc| assoc.actual == BRAM_ZERO_INIT));
        assert_eq!(instance.get_connection("WEA"), Some("we_v(1)"));
        assert_eq!(instance.get_connection("WEB"), Some("'0'"));
        assert_eq!(instance.get_connection("DOB"), Some("bram_dob(1)"));
        assert_eq!(
            stmts[0],
            Stmt::new_assign(
                "bram_addra(1)",
                "std_logic_vector(resize(unsigned(waddr_v(AW*(1+1)-log2c(NWP)-1 downto AW*1)), 9))"
            )
        );
        assert_eq!(
            stmts[4],
            Stmt::new_assign("ram_output_i(DW*((1*NRP+0)+1)-1 downto DW*(1*NRP+0))", "bram_dob(1)(DW-1 downto 0)")
        );
    }

    #[test]
    fn block_ram_rejects_unsupported_mode_out_of_band() {
        let config = Config::new(2, 1, 16, 1024, Backend::Inferred, TimingMode::ReadAsync).unwrap();
        let error = Instantiated.emit(Bank { write: 0, read: 0 }, &config).unwrap_err();
        assert_eq!(error.exit_code(), 3);
    }
}
