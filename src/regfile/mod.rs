mod bank;
mod interface;
mod mux;
mod select;

pub use bank::{instance_label, BankStrategy, Inferred, Instantiated};
pub use interface::ENTITY_NAME;

use log::debug;

use crate::{
    banner,
    config::Config,
    error::Error,
    vhdl::{Architecture, Decl, DesignFile, DesignUnit, Ty},
};

pub const ARCHITECTURE_NAME: &str = "rtl";
/// Flat bus holding the output of every bank, `NWP*NRP*DW` bits.
pub const BANK_BUS: &str = "ram_output_i";

/// Generator for one register file. Each `create_*` method is a pure
/// function of the configuration.
pub struct RegisterFile<'a> {
    config: &'a Config,
}

impl<'a> RegisterFile<'a> {
    pub fn new(config: &'a Config) -> RegisterFile<'a> {
        RegisterFile { config }
    }

    pub fn strategy(&self) -> &'static dyn BankStrategy {
        bank::strategy(self.config.backend())
    }

    pub fn create_declarations(&self) -> Vec<Decl> {
        let mut decls = vec![Decl::new_constant("NREGS", Ty::Integer, "2**AW")];
        decls.extend(self.create_selection_decls());
        decls.extend(self.strategy().declarations(self.config));
        decls.push(Decl::new_signal(BANK_BUS, Ty::vector("NWP*NRP*DW")));
        decls
    }

    pub fn create_architecture(&self) -> Result<Architecture, Error> {
        let mut architecture = Architecture::new(ARCHITECTURE_NAME, ENTITY_NAME);
        for decl in self.create_declarations() {
            architecture.add_decl(decl);
        }
        for block in self.create_banks()? {
            architecture.add_block(block);
        }
        architecture.add_block(self.create_selection());
        for block in self.create_output_muxes() {
            architecture.add_block(block);
        }
        Ok(architecture)
    }

    /// The complete design file; `file_name` only appears in the banner.
    pub fn create_design(&self, file_name: &str) -> Result<DesignFile, Error> {
        let mut design = DesignFile { header: banner::lines(self.config, file_name), ..Default::default() };
        design.add_library("IEEE", &["std_logic_1164", "numeric_std"]);
        design.add_library("WORK", &["util_functions_pkg"]);
        if let Some((library, package)) = self.strategy().library() {
            design.add_library(library, &[package]);
        }
        design.add_unit(DesignUnit::Entity(self.create_entity()));
        design.add_unit(DesignUnit::Architecture(self.create_architecture()?));
        debug!("{} bank instances, selection {}", self.config.bank_count(), self.config.needs_selection());
        Ok(design)
    }
}

/// Renders the register file described by `config` as VHDL text.
pub fn generate(config: &Config, file_name: &str) -> Result<String, Error> {
    Ok(RegisterFile::new(config).create_design(file_name)?.to_string())
}
