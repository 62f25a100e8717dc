use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

/// Assembles a program and runs it on a fresh machine
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "wordvm", about = "Assembler and virtual machine for 48 bit instruction words")]
pub struct Config {
    /// Path to the input program
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path of the binary artifact to write
    #[arg(short, long)]
    pub binary: PathBuf,

    /// Path of the memory dump to write
    #[arg(short, long)]
    pub output: PathBuf,

    /// First memory cell of the dump
    #[arg(short, long)]
    pub start: usize,

    /// End of the dump (exclusive)
    #[arg(short, long)]
    pub end: usize,

    /// Path of the decode record to write
    #[arg(short, long)]
    pub log: PathBuf,

    /// Verbosity of the console log
    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
}

impl Config {
    pub fn memory_range(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}
