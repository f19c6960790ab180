use super::RegisterFile;
use crate::vhdl::Entity;

pub const ENTITY_NAME: &str = "regfile";

impl<'a> RegisterFile<'a> {
    /// Entity declaration. Vector widths are written in terms of the generics
    /// only; the configuration just supplies the generic defaults.
    pub fn create_entity(&self) -> Entity {
        let mut entity = Entity::new(ENTITY_NAME);
        entity.add_generic_int("NWP", self.config.write_ports());
        entity.add_generic_int("NRP", self.config.read_ports());
        entity.add_generic_int("AW", self.config.address_width());
        entity.add_generic_int("DW", self.config.data_width());

        entity.add_input("clock");
        entity.add_input("reset");
        entity.add_input("enable");
        entity.add_input_vector("we_v", "NWP");
        entity.add_input_vector("re_v", "NRP");
        entity.add_input_vector("waddr_v", "NWP*AW");
        entity.add_input_vector("raddr_v", "NRP*AW");
        entity.add_input_vector("input_data_v", "NWP*DW");
        entity.add_output_vector("ram_output_v", "NRP*DW");
        entity
    }
}
