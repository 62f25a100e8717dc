use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::Result;
use tempfile::{tempdir, TempDir};
use wordvm::assembler::RecordEntry;
use wordvm::error::{Error, ErrorKind};
use wordvm::pipeline::{assemble_file, execute_file};

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(program: &str) -> Result<Self> {
        let dir = tempdir()?;
        fs::write(dir.path().join("program.asm"), program)?;
        Ok(Self { dir })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn assemble(&self) -> Result<()> {
        assemble_file(&self.path("program.asm"), &self.path("program.bin"), &self.path("log.yaml"))?;
        Ok(())
    }

    fn execute(&self, range: (usize, usize)) -> Result<String> {
        execute_file(&self.path("program.bin"), &self.path("result.txt"), range)?;
        Ok(fs::read_to_string(self.path("result.txt"))?)
    }
}

fn kind_of(report: &color_eyre::Report) -> Option<&ErrorKind> {
    report.downcast_ref::<Error>().map(Error::kind)
}

fn sample_program() -> Result<String> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("programs/multiply.asm");
    Ok(fs::read_to_string(path)?)
}

#[test]
fn sample_program_end_to_end() -> Result<()> {
    let ws = Workspace::new(&sample_program()?)?;
    ws.assemble()?;

    let binary = fs::read_to_string(ws.path("program.bin"))?;
    assert_eq!(binary.lines().count(), 8);
    assert!(binary.starts_with("0x20 0x00 0x10 0x00 0x00 0x00\n"));

    // mem[0] = 1, mem[1] = 1 * 5, mem[2] = mem[r2 = 1]
    let result = ws.execute((0, 4))?;
    assert_eq!(
        result,
        "memory_cell_0: 1\nmemory_cell_1: 101\nmemory_cell_2: 101\nmemory_cell_3: 0\n"
    );

    Ok(())
}

#[test]
fn decode_record_is_written() -> Result<()> {
    let ws = Workspace::new("CONST_LOAD 1 0 1\nMEMORY_WRITE 2 0 0\nCONST_LOAD 1 4 5\nMUL 3 0 4 0\nMEMORY_READ 7 2 0")?;
    ws.assemble()?;

    let log: BTreeMap<String, RecordEntry> =
        serde_yaml::from_str(&fs::read_to_string(ws.path("log.yaml"))?)?;

    assert_eq!(log.len(), 5);
    assert_eq!(log["instruction_0"], RecordEntry { a: 1, b: 0, c: 1, d: None });
    assert_eq!(log["instruction_3"], RecordEntry { a: 3, b: 0, c: 4, d: Some(0) });
    assert_eq!(log["instruction_4"], RecordEntry { a: 7, b: 2, c: 0, d: None });

    Ok(())
}

#[test]
fn unknown_mnemonic_writes_nothing() -> Result<()> {
    let ws = Workspace::new("CONST_LOAD 1 0 1\nFOO 9 1 2 3\n")?;
    let err = ws.assemble().unwrap_err();

    assert_eq!(
        kind_of(&err),
        Some(&ErrorKind::UnrecognizedCommand { command: "FOO".into() })
    );
    assert!(format!("{:#}", err).contains("FOO"));
    assert!(!ws.path("program.bin").exists());
    assert!(!ws.path("log.yaml").exists());

    Ok(())
}

#[test]
fn decode_record_survives_failed_binary_write() -> Result<()> {
    let ws = Workspace::new("CONST_LOAD 1 0 1\nMUL 3 1 0 0\n")?;
    fs::create_dir(ws.path("program.bin"))?;

    assert!(ws.assemble().is_err());

    let log: BTreeMap<String, RecordEntry> =
        serde_yaml::from_str(&fs::read_to_string(ws.path("log.yaml"))?)?;
    assert_eq!(log.len(), 2);
    assert_eq!(log["instruction_0"], RecordEntry { a: 1, b: 0, c: 1, d: None });
    assert_eq!(log["instruction_1"], RecordEntry { a: 3, b: 1, c: 0, d: Some(0) });

    Ok(())
}

#[test]
fn oversized_operand_writes_nothing() -> Result<()> {
    let ws = Workspace::new("CONST_LOAD 1 0 4096\n")?;
    let err = ws.assemble().unwrap_err();

    assert_eq!(kind_of(&err), Some(&ErrorKind::Range));
    assert!(!ws.path("program.bin").exists());
    assert!(!ws.path("log.yaml").exists());

    Ok(())
}

#[test]
fn dump_out_of_range() -> Result<()> {
    let ws = Workspace::new("CONST_LOAD 1 0 1\n")?;
    ws.assemble()?;

    let err = ws.execute((500, 2000)).unwrap_err();
    assert_eq!(kind_of(&err), Some(&ErrorKind::Range));
    assert!(!ws.path("result.txt").exists());

    Ok(())
}

#[test]
fn write_outside_memory_aborts() -> Result<()> {
    let ws = Workspace::new("CONST_LOAD 1 0 1\nMEMORY_WRITE 2 1024 0\n")?;
    ws.assemble()?;

    let err = ws.execute((0, 4)).unwrap_err();
    assert_eq!(kind_of(&err), Some(&ErrorKind::Range));
    assert!(!ws.path("result.txt").exists());

    Ok(())
}

#[test]
fn unrecognized_opcode_aborts() -> Result<()> {
    let ws = Workspace::new("")?;
    fs::write(ws.path("program.bin"), "0x20 0x00 0x10 0x00 0x00 0x00\n0xA0 0x00 0x00 0x00 0x00 0x00\n")?;

    let err = ws.execute((0, 4)).unwrap_err();
    assert_eq!(kind_of(&err), Some(&ErrorKind::UnrecognizedOpcode { opcode: 5 }));
    assert!(!ws.path("result.txt").exists());

    Ok(())
}

#[test]
fn malformed_hex_aborts() -> Result<()> {
    let ws = Workspace::new("")?;
    fs::write(ws.path("program.bin"), "0x20 0x00 0xZZ 0x00 0x00 0x00\n")?;

    let err = ws.execute((0, 4)).unwrap_err();
    assert_eq!(kind_of(&err), Some(&ErrorKind::MalformedEncoding));
    assert!(!ws.path("result.txt").exists());

    Ok(())
}

#[test]
fn lowercase_hex_is_accepted() -> Result<()> {
    let ws = Workspace::new("")?;
    // CONST_LOAD r0 10, MEMORY_WRITE [2] r0
    fs::write(
        ws.path("program.bin"),
        "0x20 0x00 0xa0 0x00 0x00 0x00\n0X40 00 00 00 0x40 0x00\n",
    )?;

    let result = ws.execute((0, 3))?;
    assert_eq!(result, "memory_cell_0: 0\nmemory_cell_1: 0\nmemory_cell_2: 1010\n");

    Ok(())
}
