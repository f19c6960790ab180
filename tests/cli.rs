use std::process::Command;

fn mprfgen() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mprfgen"))
}

#[test]
fn no_arguments_prints_usage() {
    let output = mprfgen().output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("-nwp 2 -nrp 3"));
}

#[test]
fn help_exits_with_failure() {
    let output = mprfgen().arg("-h").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--nregs"));
}

#[test]
fn writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rf.vhd");
    let status = mprfgen()
        .args(["-infer", "-read-first", "-nwp", "2", "-nrp", "3"])
        .arg(&path)
        .status()
        .unwrap();
    assert!(status.success());
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.matches(": entity WORK.regfile_core(READ_FIRST)").count(), 6);
    assert!(text.contains(&format!("-- Filename: {}\n", path.display())));
}

#[test]
fn invalid_configuration_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rf.vhd");
    let output = mprfgen().args(["-nwp", "3", "-nrp", "2", "-read-async"]).arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not supported by the instantiated backend"));
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn unwritable_path_has_distinct_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no").join("such").join("rf.vhd");
    let output = mprfgen().args(["-infer"]).arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(!path.exists());
}

#[test]
fn prints_to_stdout_without_path() {
    let output = mprfgen().args(["-write-first", "-nwp", "2", "-nrp", "1", "-nregs", "512"]).output().unwrap();
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.contains("-- Filename: <stdout>\n"));
    assert_eq!(text.matches(": RAMB16_S36_S36\n").count(), 2);
}

#[test]
fn emits_support_units() {
    let dir = tempfile::tempdir().unwrap();
    let output = mprfgen()
        .args(["-infer", "--emit-support"])
        .arg(dir.path())
        .arg(dir.path().join("rf.vhd"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let core = std::fs::read_to_string(dir.path().join("regfile_core.vhd")).unwrap();
    assert!(core.contains("architecture WRITE_FIRST of regfile_core is"));
    let package = std::fs::read_to_string(dir.path().join("util_functions_pkg.vhd")).unwrap();
    assert!(package.contains("function log2c(n : integer) return integer;"));
}

#[test]
fn rejected_command_lines_are_configuration_errors() {
    let dir = tempfile::tempdir().unwrap();
    let output =
        mprfgen().args(["-infer", "--read-mode", "read-never"]).arg(dir.path().join("a.vhd")).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown read mode \"read-never\""));
    let output = mprfgen().args(["-infer", "-nwp", "two"]).arg(dir.path().join("b.vhd")).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn default_block_ram_configuration_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    for (mode, extra) in [("-read-first", "16"), ("-write-first", "64")] {
        let path = dir.path().join(format!("rf{mode}.vhd"));
        let status = mprfgen().args([mode, "-nwp", "2", "-bw", extra]).arg(&path).status().unwrap();
        assert!(status.success());
        assert!(std::fs::read_to_string(&path).unwrap().contains(": RAMB16_S36_S36\n"));
    }
    let path = dir.path().join("defaults.vhd");
    assert!(mprfgen().arg("-read-first").arg(&path).status().unwrap().success());
}

#[test]
fn failed_support_write_leaves_no_register_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rf.vhd");
    let output = mprfgen()
        .args(["-infer", "--emit-support"])
        .arg(dir.path().join("missing").join("support"))
        .arg(&path)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(!path.exists());
}
