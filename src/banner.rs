use crate::config::Config;

/// Comment lines heading every generated file. No wall-clock time is included
/// so that identical configurations produce identical files.
pub fn lines(config: &Config, file_name: &str) -> Vec<String> {
    vec![
        format!("File automatically generated by \"{}\" {}.", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        format!("Filename: {file_name}"),
        String::new(),
        format!("Write ports: {}", config.write_ports()),
        format!("Read ports: {}", config.read_ports()),
        format!("Data width: {}", config.data_width()),
        format!("Registers: {}", config.depth()),
        format!("Backend: {}", config.backend()),
        format!("Read mode: {}", config.timing_mode()),
    ]
}

#[cfg(test)]
mod test {
    use super::lines;
    use crate::{
        config::{Backend, Config},
        mode::TimingMode,
    };

    #[test]
    fn describes_configuration() {
        let config = Config::new(2, 3, 16, 512, Backend::Instantiated, TimingMode::ReadFirst).unwrap();
        let lines = lines(&config, "rf.vhd");
        assert!(lines[0].starts_with("File automatically generated by \"mprfgen\""));
        assert_eq!(lines[1], "Filename: rf.vhd");
        assert!(lines.contains(&"Backend: instantiated".to_string()));
        assert!(lines.contains(&"Read mode: READ_FIRST".to_string()));
    }
}
