//! Read samples from an MCP3221 over Linux i2c-dev.

#[cfg(target_os = "linux")]
mod cli {
    use anyhow::{Context, Result};
    use clap::Parser;
    use std::path::PathBuf;
    use std::time::Duration;

    use mcp3221_driver::config::{parse_address, Mcp3221Config};
    use mcp3221_driver::iio::{self, IioDevice};
    use mcp3221_driver::peripheral::mcp3221::{raw_to_microvolts, Mcp3221};
    use mcp3221_driver::tracing::prelude::*;
    use mcp3221_driver::transport::LinuxI2c;

    /// Sample an MCP3221 ADC and print its attributes
    #[derive(Parser, Debug)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// i2c-dev node (overrides MCP3221_I2C_BUS)
        #[arg(short = 'b', long)]
        bus: Option<PathBuf>,

        /// 7-bit device address, hex or decimal (overrides MCP3221_ADDRESS)
        #[arg(short = 'a', long, value_parser = parse_address)]
        address: Option<u8>,

        /// Number of samples to take (0 = until interrupted)
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u64,

        /// Delay between samples in milliseconds
        #[arg(short = 'i', long, default_value_t = 100)]
        interval_ms: u64,

        /// Print every channel attribute before sampling
        #[arg(short = 'l', long)]
        list: bool,

        /// Enable debug logging
        #[arg(short = 'd', long)]
        debug: bool,
    }

    pub async fn run() -> Result<()> {
        let args = Args::parse();

        if args.debug {
            mcp3221_driver::tracing::init_stdout(tracing::Level::DEBUG);
        } else {
            mcp3221_driver::tracing::init_journald_or_stdout();
        }

        let mut config = Mcp3221Config::from_env().context("Invalid MCP3221 environment")?;
        if let Some(bus) = args.bus {
            config.bus = bus;
        }
        if let Some(address) = args.address {
            config.address = address;
        }

        let i2c = LinuxI2c::open(&config.bus)
            .with_context(|| format!("Failed to open I2C bus: {:?}", config.bus))?;
        let adc = Mcp3221::probe(i2c, config.address, config.name.clone())
            .with_context(|| format!("Failed to bind MCP3221 at {:#04x}", config.address))?;

        if args.list {
            list_attributes(&adc).await?;
        }

        let interval = Duration::from_millis(args.interval_ms);
        let mut taken = 0u64;
        loop {
            let raw = adc.read_raw().await.context("Sample read failed")?;
            println!("{}\t{} uV", raw, raw_to_microvolts(raw));

            taken += 1;
            if args.count != 0 && taken >= args.count {
                break;
            }
            tokio::time::sleep(interval).await;
        }

        debug!(samples = taken, "Done");
        Ok(())
    }

    async fn list_attributes(adc: &Mcp3221<LinuxI2c>) -> Result<()> {
        println!("name = {}", IioDevice::name(adc));
        for (attr, chan, info) in iio::attributes(adc.channels()) {
            let value = adc
                .read_info(chan, info)
                .await
                .with_context(|| format!("Failed to read {}", attr))?;
            println!("{} = {}", attr, value);
        }
        for (attr, value) in adc.extra_attributes() {
            println!("{} = {}", attr, value);
        }
        Ok(())
    }
}

#[cfg(target_os = "linux")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::run().await
}

#[cfg(not(target_os = "linux"))]
fn main() -> anyhow::Result<()> {
    anyhow::bail!("mcp3221-read needs Linux i2c-dev")
}
