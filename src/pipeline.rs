//! File level glue around the assembler and the processor.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use log::*;

use crate::assembler::{self, Program};
use crate::bits::BitStream;
use crate::config::Config;
use crate::memory::{self, StdMem};
use crate::processor::Processor;

/// Assembles the program at `input`, writing the decode record to `log` and
/// the binary artifact to `binary`.
///
/// Nothing is written unless every line parses and encodes.
pub fn assemble_file(input: &Path, binary: &Path, log: &Path) -> Result<Program> {
    let source = fs::read_to_string(input)
        .wrap_err_with(|| format!("Failed to read program {}", input.display()))?;

    let program = assembler::assemble(&source)
        .wrap_err_with(|| format!("Failed to assemble {}", input.display()))?;
    let words = program
        .to_binary()
        .wrap_err_with(|| format!("Failed to encode {}", input.display()))?;
    let record = program
        .record()
        .to_yaml()
        .wrap_err("Failed to serialize the decode record")?;

    fs::write(log, record)
        .wrap_err_with(|| format!("Failed to write decode record {}", log.display()))?;
    fs::write(binary, words)
        .wrap_err_with(|| format!("Failed to write binary {}", binary.display()))?;

    info!(
        "Assembled {} instructions into {}",
        program.instructions.len(),
        binary.display()
    );

    Ok(program)
}

/// Runs the binary artifact at `binary` on a fresh machine and writes the
/// memory cells `start..end` to `output`.
///
/// Nothing is written if decoding or execution fails.
pub fn execute_file(binary: &Path, output: &Path, (start, end): (usize, usize)) -> Result<StdMem> {
    let text = fs::read_to_string(binary)
        .wrap_err_with(|| format!("Failed to read binary {}", binary.display()))?;
    let stream = BitStream::from_hex(&text)
        .wrap_err_with(|| format!("Failed to decode {}", binary.display()))?;

    let mut mem = StdMem::default();
    let mut cpu = Processor::new();
    cpu.execute_until_end(&stream, &mut mem)
        .wrap_err_with(|| format!("Execution of {} failed at bit {}", binary.display(), cpu.cursor))?;

    let cells = mem.dump(start, end)?;
    fs::write(output, memory::render_dump(cells))
        .wrap_err_with(|| format!("Failed to write result {}", output.display()))?;

    info!("Dumped memory cells {}..{} to {}", start, end, output.display());

    Ok(mem)
}

/// Assembles, then executes, as configured
pub fn run(config: &Config) -> Result<()> {
    assemble_file(&config.input, &config.binary, &config.log)?;
    execute_file(&config.binary, &config.output, config.memory_range())?;

    Ok(())
}
