//! Companion design units referenced by every generated register file:
//! `util_functions_pkg` (for `log2c`) and the `regfile_core` bank used by the
//! inferred backend.

use strum::IntoEnumIterator;

use crate::{
    mode::TimingMode,
    vhdl::{
        Architecture, Decl, DesignFile, DesignUnit, Entity, Function, Package, Process, Sequential, Stmt, Ty,
        Variable,
    },
};

pub const UTIL_PACKAGE: &str = "util_functions_pkg";
pub const CORE_ENTITY: &str = "regfile_core";

fn header(unit: &str) -> Vec<String> {
    vec![format!(
        "{unit}: support unit generated by \"{}\" {}.",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )]
}

fn ieee_file(unit: &str) -> DesignFile {
    let mut design = DesignFile { header: header(unit), ..Default::default() };
    design.add_library("IEEE", &["std_logic_1164", "numeric_std"]);
    design
}

pub fn create_util_package() -> DesignFile {
    let log2c = Function {
        name: "log2c".to_string(),
        params: vec![("n".to_string(), Ty::Integer)],
        returns: Ty::Integer,
        variables: vec![
            Variable { name: "m".to_string(), ty: Ty::Integer },
            Variable { name: "p".to_string(), ty: Ty::Integer },
        ],
        body: vec![
            Sequential::new_var_assign("m", "0"),
            Sequential::new_var_assign("p", "1"),
            Sequential::While {
                condition: "p < n".to_string(),
                body: vec![Sequential::new_var_assign("m", "m + 1"), Sequential::new_var_assign("p", "p * 2")],
            },
            Sequential::Return("m".to_string()),
        ],
    };
    let mut design = ieee_file(UTIL_PACKAGE);
    design.add_unit(DesignUnit::Package(Package { name: UTIL_PACKAGE.to_string(), functions: vec![log2c] }));
    design
}

fn create_core_entity() -> Entity {
    let mut entity = Entity::new(CORE_ENTITY);
    entity.add_generic_int("AW", 5);
    entity.add_generic_int("DW", 32);
    entity.add_input("clock");
    entity.add_input("reset");
    entity.add_input("enable");
    entity.add_input("we");
    entity.add_input("re");
    entity.add_input_vector("waddr", "AW");
    entity.add_input_vector("raddr", "AW");
    entity.add_input_vector("input_data", "DW");
    entity.add_output_vector("ram_output", "DW");
    entity
}

fn read(address: &str) -> String {
    format!("mem(to_integer(unsigned({address})))")
}

fn write_port() -> Sequential {
    Sequential::new_if("we = '1'", vec![Sequential::new_assign(read("waddr"), "input_data")])
}

/// Clocked process: `body` runs on rising edges while enabled and out of reset.
fn clocked(reset: Vec<Sequential>, body: Vec<Sequential>) -> Process {
    let mut process = Process::new(&["clock"]);
    let enabled = Sequential::new_if("enable = '1'", body);
    let edge = if reset.is_empty() {
        enabled
    } else {
        Sequential::new_if_else("reset = '1'", reset, vec![enabled])
    };
    process.add_seq(Sequential::new_if("rising_edge(clock)", vec![edge]));
    process
}

fn create_core_architecture(mode: TimingMode) -> Architecture {
    let mut architecture = Architecture::new(mode.as_vhdl(), CORE_ENTITY);
    architecture.add_decl(Decl::new_array_type("mem_type", "0 to 2**AW-1", Ty::vector("DW")));
    architecture.add_decl(Decl::new_signal_init(
        "mem",
        Ty::Named("mem_type".to_string()),
        "(others => (others => '0'))",
    ));
    let clear_output = vec![Sequential::new_assign("ram_output", "(others => '0')")];
    match mode {
        TimingMode::ReadAsync => {
            architecture.add_block(vec![Stmt::Process(clocked(vec![], vec![write_port()]))]);
            architecture.add_block(vec![Stmt::new_assign("ram_output", read("raddr"))]);
        }
        TimingMode::ReadFirst => {
            let registered = Sequential::new_if("re = '1'", vec![Sequential::new_assign("ram_output", read("raddr"))]);
            architecture.add_block(vec![Stmt::Process(clocked(clear_output, vec![write_port(), registered]))]);
        }
        TimingMode::WriteFirst => {
            let forwarded = Sequential::new_if_else(
                "we = '1' and waddr = raddr",
                vec![Sequential::new_assign("ram_output", "input_data")],
                vec![Sequential::new_assign("ram_output", read("raddr"))],
            );
            let registered = Sequential::new_if("re = '1'", vec![forwarded]);
            architecture.add_block(vec![Stmt::Process(clocked(clear_output, vec![write_port(), registered]))]);
        }
        TimingMode::ReadThrough => {
            architecture.add_decl(Decl::new_signal_init("raddr_r", Ty::vector("AW"), "(others => '0')"));
            let latch = Sequential::new_if("re = '1'", vec![Sequential::new_assign("raddr_r", "raddr")]);
            let clear_address = vec![Sequential::new_assign("raddr_r", "(others => '0')")];
            architecture.add_block(vec![Stmt::Process(clocked(clear_address, vec![write_port(), latch]))]);
            architecture.add_block(vec![Stmt::new_assign("ram_output", read("raddr_r"))]);
        }
    }
    architecture
}

/// `regfile_core` with one architecture per timing mode, named after it.
pub fn create_core() -> DesignFile {
    let mut design = ieee_file(CORE_ENTITY);
    design.add_unit(DesignUnit::Entity(create_core_entity()));
    for mode in TimingMode::iter() {
        design.add_unit(DesignUnit::Architecture(create_core_architecture(mode)));
    }
    design
}

/// File name and contents of every support unit.
pub fn files() -> Vec<(String, String)> {
    vec![
        (format!("{UTIL_PACKAGE}.vhd"), create_util_package().to_string()),
        (format!("{CORE_ENTITY}.vhd"), create_core().to_string()),
    ]
}
