use super::{select::SELECTOR_BUS, RegisterFile, BANK_BUS};
use crate::{
    config::Bank,
    slice::{output_slice, read_data_slice, selector_slice, SELECTOR_WIDTH},
    vhdl::{Choice, Process, Sequential, Stmt, Ty},
};

const SELECTOR_VARIABLE: &str = "ia_sel_part";

impl<'a> RegisterFile<'a> {
    /// Output multiplexers, one block per read port when a selection is
    /// needed, otherwise a single block of direct connections.
    pub fn create_output_muxes(&self) -> Vec<Vec<Stmt>> {
        let read_ports = 0..self.config.read_ports();
        if !self.config.needs_selection() {
            let wires = read_ports
                .map(|port| {
                    let bank = Bank { write: 0, read: port };
                    Stmt::new_assign(read_data_slice(port).of("ram_output_v"), output_slice(bank).of(BANK_BUS))
                })
                .collect();
            return vec![wires];
        }
        read_ports.map(|port| vec![Stmt::Process(self.create_output_mux(port))]).collect()
    }

    fn create_output_mux(&self, port: u32) -> Process {
        let output = read_data_slice(port).of("ram_output_v");
        let mut process = Process::new(&[BANK_BUS, SELECTOR_BUS]);
        process.add_variable(
            SELECTOR_VARIABLE,
            Ty::IntegerRange("0".to_string(), format!("2**{SELECTOR_WIDTH}-1")),
        );
        process.add_seq(Sequential::new_var_assign(
            SELECTOR_VARIABLE,
            format!("to_integer(unsigned({}))", selector_slice(port).of(SELECTOR_BUS)),
        ));
        let mut case = Sequential::new_case(SELECTOR_VARIABLE);
        for write in 0..self.config.write_ports() {
            let bank = Bank { write, read: port };
            case.add_arm(Choice::Value(write), vec![Sequential::new_assign(&output, output_slice(bank).of(BANK_BUS))]);
        }
        case.add_arm(Choice::Others, vec![Sequential::new_assign(&output, "(others => '0')")]);
        process.add_seq(case);
        process
    }
}
