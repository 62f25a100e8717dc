use clap::Parser;
use color_eyre::eyre::Result;
use simple_logger::SimpleLogger;
use wordvm::config::Config;
use wordvm::pipeline;

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling

    let config = Config::parse();
    SimpleLogger::new().with_level(config.log_level).init()?; // logging

    if let Err(err) = pipeline::run(&config) {
        log::error!("{:#}", err);
        return Err(err);
    }

    Ok(())
}
