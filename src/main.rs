use anyhow::{Context, Result, bail};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::fs::File;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use gp5_lib::checksum::sysex_checksum;
use gp5_lib::message::{PresetResponse, Request};
use gp5_lib::sysex::{message_offset, verify_sysex};

mod simulate;

/// Encode, check and decode Valeton GP5 SysEx packets, and replay switch input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Optional path to a file to write logs to, in addition to the console.
    #[arg(short, long, global = true)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the "current preset" request packet.
    Request,
    /// Build a packet for an arbitrary operation.
    Build {
        /// Operation byte, decimal or 0x-prefixed hex.
        #[arg(short, long, value_parser = parse_byte)]
        op: u8,
        /// Payload as hex, spaces allowed.
        #[arg(default_value = "")]
        payload: String,
    },
    /// Compute the checksum of a window starting at the SysEx start byte.
    Checksum {
        /// Bytes from 0xF0 through 0xF7 as hex.
        window: String,
    },
    /// Check structure and checksum of an outbound packet.
    Verify {
        /// Packet as hex, transport framing optional.
        packet: String,
    },
    /// Decode operation and preset number from a response.
    Decode {
        /// Received buffer as hex.
        buffer: String,
    },
    /// Replay scripted pin levels through the switch debouncer.
    Simulate(simulate::SimulateArgs),
}

fn setup_logging(log_file_path: Option<PathBuf>, verbosity: &Verbosity<InfoLevel>) -> Result<Option<WorkerGuard>> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .without_time();

    let (file_layer, guard) = if let Some(ref path) = log_file_path {
        let log_file =
            File::create(path).with_context(|| format!("Failed to create log file at: {:?}", path))?;
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(log_file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_writer)
            .with_ansi(false)
            .with_target(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    // INFO by default, -v for DEBUG, -vv for TRACE; RUST_LOG still wins
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.tracing_level_filter().into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some(path) = log_file_path {
        info!("Logging to file: {:?}", path);
    }

    Ok(guard)
}

/// Parse `0x1f`, `1f` style hex dumps, whitespace ignored
fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let cleaned = cleaned.strip_prefix("0x").unwrap_or(&cleaned);
    hex::decode(cleaned).with_context(|| format!("Invalid hex input: {:?}", input))
}

fn parse_byte(input: &str) -> Result<u8, String> {
    let parsed = match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(digits) => u8::from_str_radix(digits, 16),
        None => input.parse::<u8>(),
    };
    parsed.map_err(|e| format!("{input:?} is not a byte value: {e}"))
}

fn format_packet(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect::<Vec<_>>().join(" ")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(cli.log_file, &cli.verbose)?;

    if let Err(e) = run(cli.command).await {
        error!("Command failed: {:?}", e);
        process::exit(1);
    }

    Ok(())
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Request => {
            let packet = Request::CurrentPreset.to_bytes()?;
            println!("{}", format_packet(&packet));
        }
        Command::Build { op, payload } => {
            let payload = parse_hex(&payload)?;
            let request = Request::Raw {
                op,
                payload: Bytes::from(payload),
            };
            let packet = request
                .to_bytes()
                .with_context(|| format!("Failed to build packet for op {:#04x}", op))?;
            info!(op, len = packet.len(), "Packet built");
            println!("{}", format_packet(&packet));
        }
        Command::Checksum { window } => {
            let window = parse_hex(&window)?;
            let start = message_offset(&window).context("No SysEx start byte in input")?;
            let crc = sysex_checksum(&window[start..])?;
            println!("{crc:#04x} ({:02X} {:02X})", crc >> 4, crc & 0x0F);
        }
        Command::Verify { packet } => {
            let packet = parse_hex(&packet)?;
            let frame = verify_sysex(&packet).context("Packet failed verification")?;
            println!(
                "ok: op {:#04x}, checksum {:#04x}, payload [{}]",
                frame.header.op,
                frame.header.checksum(),
                format_packet(frame.payload)
            );
            match Request::from(frame) {
                Request::CurrentPreset => println!("current preset request"),
                Request::Raw { .. } => {}
            }
        }
        Command::Decode { buffer } => {
            let buffer = parse_hex(&buffer)?;
            if buffer.is_empty() {
                bail!("Empty buffer");
            }
            let response = PresetResponse::try_from(buffer.as_slice())?;
            println!("{response}");
        }
        Command::Simulate(args) => simulate::run(args).await?,
    }
    Ok(())
}
