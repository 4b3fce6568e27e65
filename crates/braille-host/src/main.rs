//! Braille host: entry point.
//!
//! A command-line front end over `braille_core` and the host's device
//! manager.  It is mostly useful for trying tables and vendor codecs without
//! hardware, and for running a line-driven session that turns raw input
//! reports into `braille.input` envelopes.
//!
//! # Usage
//!
//! ```text
//! braille-host [--config <PATH>] <COMMAND>
//!
//! Commands:
//!   translate       Text to cells (JSON payload plus Unicode Braille)
//!   back-translate  Dot lists such as `1,3,4` back to text
//!   decode          Decode a hex input report with a driver
//!   encode          Translate text and print the driver's output frame as hex
//!   run             Attach configured devices and process stdin lines
//! ```
//!
//! # `run` input lines
//!
//! ```text
//! <device-id> <hex-bytes>      raw report from the device, e.g. `sim:0 0268 69`
//! > <device-id> <text>         show `text` on the device
//! ```
//!
//! Each decoded event is printed as one JSON envelope per line.  The session
//! ends on EOF or Ctrl+C.
//!
//! # Environment variable overrides
//!
//! | Variable             | Description                               |
//! |----------------------|-------------------------------------------|
//! | `RUST_LOG`           | Log filter; overrides `host.log_level`    |
//! | `BRAILLE_HOST_CONFIG`| Config file path; same as `--config`      |

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use braille_core::{
    BrailleCell, CellMatrix, DeviceInfo, Driver, OutputWriter, Transport, Translator,
};
use braille_host::application::device_manager::DeviceManager;
use braille_host::application::driver_registry::DriverRegistry;
use braille_host::application::envelopes::EnvelopeSource;
use braille_host::infrastructure::output::{FrameDispatcher, TraceWriter};
use braille_host::infrastructure::storage::config::{self, HostConfig};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Device attached by `run` when the config lists none.
const DEFAULT_SIM_DEVICE: &str = "sim:0";

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Braille display host.
#[derive(Debug, Parser)]
#[command(
    name = "braille-host",
    about = "Braille translation and display protocol host",
    version
)]
struct Cli {
    /// Configuration file to use instead of the platform default.
    #[arg(long, global = true, env = "BRAILLE_HOST_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Translate text into Braille cells.
    Translate {
        /// Table name; defaults to `translation.default_table`.
        #[arg(long)]
        table: Option<String>,
        /// Text to translate.  Multiple words are joined with spaces.
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Translate cells back into text.
    BackTranslate {
        #[arg(long)]
        table: Option<String>,
        /// One argument per cell: comma-separated dot numbers, or `0` for blank.
        #[arg(required = true)]
        cells: Vec<String>,
    },

    /// Decode one raw input report.
    Decode {
        /// Driver key, e.g. `focus-generic`.
        #[arg(long, default_value = "generic-hid")]
        driver: String,
        /// Report bytes as hex, e.g. `010d`.
        hex: String,
    },

    /// Translate text and encode it into a driver output frame.
    Encode {
        #[arg(long, default_value = "focus-generic")]
        driver: String,
        #[arg(long)]
        table: Option<String>,
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Attach the configured devices and process input lines from stdin.
    Run,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => config::load_config().unwrap_or_else(|e| {
            eprintln!("braille-host: {e}; using default configuration");
            HostConfig::default()
        }),
    };

    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // `RUST_LOG` wins; otherwise the config's `log_level`; otherwise `info`.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.host.log_level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Command::Translate { table, text } => {
            let translator = translator_for(&config, table.as_deref());
            let payload = translator.translate(&text.join(" "));
            println!("{}", serde_json::to_string(&payload)?);
            let matrix = payload
                .to_matrix(translator.width())
                .context("translated payload did not rebuild")?;
            println!("{}", matrix.to_unicode());
        }
        Command::BackTranslate { table, cells } => {
            let translator = translator_for(&config, table.as_deref());
            let matrix = parse_cells(&translator, &cells)?;
            println!("{}", translator.cells_to_text(&matrix));
        }
        Command::Decode { driver, hex } => {
            let mut driver = create_driver(&driver)?;
            driver.open(DeviceInfo::new("cli", Transport::Sim));
            let packet = parse_hex(&hex)?;
            for event in driver.decode(&packet) {
                println!("{}", serde_json::to_string(&event)?);
            }
        }
        Command::Encode {
            driver,
            table,
            text,
        } => {
            let mut driver = create_driver(&driver)?;
            let translator = translator_for(&config, table.as_deref());
            let matrix = translator.text_to_cells(&text.join(" "));
            match driver.encode(&matrix) {
                Some(frame) => println!("{}", hex::encode(frame)),
                None => bail!("driver '{}' produces no output frames", driver.kind()),
            }
        }
        Command::Run => run(&config).await?,
    }

    Ok(())
}

// ── Commands ──────────────────────────────────────────────────────────────────

async fn run(config: &HostConfig) -> anyhow::Result<()> {
    let manager = DeviceManager::new(DriverRegistry::with_builtin());
    let translator = translator_for(config, None);
    let source = config.envelope_source();

    let mut devices: Vec<DeviceInfo> = config
        .devices
        .iter()
        .map(config::DeviceEntry::to_device_info)
        .collect();
    if devices.is_empty() {
        info!("no devices configured; attaching simulated device {DEFAULT_SIM_DEVICE}");
        devices.push(
            DeviceInfo::new(DEFAULT_SIM_DEVICE, Transport::Sim)
                .with_capability(braille_core::domain::device::DRIVER_KEY_CAPABILITY, "sim"),
        );
    }

    let mut dispatchers = Vec::with_capacity(devices.len());
    for device in devices {
        let sink: Arc<dyn OutputWriter> = Arc::new(TraceWriter::new(device.id.clone()));
        let dispatcher = Arc::new(
            FrameDispatcher::spawn(sink, config.output.workers, config.output.queue_capacity)
                .context("failed to start frame dispatcher")?,
        );
        manager.attach_with_writer(device, dispatcher.clone());
        dispatchers.push(dispatcher);
    }

    for summary in manager.devices() {
        println!(
            "{}",
            source.caps_envelope(&summary.device, &summary.driver_key)
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("failed to read stdin")? {
                    Some(line) => handle_line(&manager, &translator, &source, &line),
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("ctrl-c received, shutting down");
                break;
            }
        }
    }

    manager.shutdown();
    for dispatcher in &dispatchers {
        dispatcher.shutdown().await;
    }
    Ok(())
}

/// One line of the `run` session.
#[derive(Debug, PartialEq, Eq)]
enum InputLine<'a> {
    Report { device_id: &'a str, packet: Vec<u8> },
    Display { device_id: &'a str, text: &'a str },
    Blank,
}

fn parse_line(line: &str) -> anyhow::Result<InputLine<'_>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(InputLine::Blank);
    }
    if let Some(rest) = line.strip_prefix('>') {
        let rest = rest.trim_start();
        let (device_id, text) = rest.split_once(' ').unwrap_or((rest, ""));
        return Ok(InputLine::Display { device_id, text });
    }
    let (device_id, hex) = line
        .split_once(char::is_whitespace)
        .context("expected `<device-id> <hex-bytes>`")?;
    Ok(InputLine::Report {
        device_id,
        packet: parse_hex(hex)?,
    })
}

fn handle_line(
    manager: &DeviceManager,
    translator: &Translator,
    source: &EnvelopeSource,
    line: &str,
) {
    match parse_line(line) {
        Ok(InputLine::Report { device_id, packet }) => {
            if manager.driver_key(device_id).is_none() {
                warn!(device_id, "report for unknown device ignored");
                return;
            }
            for event in manager.decode(device_id, &packet) {
                println!("{}", source.input_envelope(&event));
            }
        }
        Ok(InputLine::Display { device_id, text }) => {
            let matrix = translator.text_to_cells(text);
            if manager.encode(device_id, &matrix).is_none() {
                info!(device_id, "no output frame for device");
            }
        }
        Ok(InputLine::Blank) => {}
        Err(e) => warn!("skipping input line: {e:#}"),
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn translator_for(config: &HostConfig, table: Option<&str>) -> Translator {
    let name = table.unwrap_or(&config.translation.default_table);
    Translator::from_loader(&config.table_loader(), name)
}

fn create_driver(key: &str) -> anyhow::Result<Driver> {
    let registry = DriverRegistry::with_builtin();
    match registry.create(key) {
        Some(driver) => Ok(driver),
        None => bail!(
            "unknown driver '{key}' (known: {})",
            registry.keys().join(", ")
        ),
    }
}

/// Hex with optional whitespace between bytes: `01 0d` and `010d` are equal.
fn parse_hex(text: &str) -> anyhow::Result<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&compact).with_context(|| format!("invalid hex bytes '{text}'"))
}

fn parse_cells(translator: &Translator, cells: &[String]) -> anyhow::Result<CellMatrix> {
    let width = translator.width();
    let cells = cells
        .iter()
        .map(|arg| {
            let dots = arg
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty() && *d != "0")
                .map(str::parse::<u8>)
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("invalid dot list '{arg}'"))?;
            BrailleCell::from_dot_numbers(width, &dots)
                .with_context(|| format!("invalid cell '{arg}'"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    CellMatrix::new(cells, None).context("invalid cell matrix")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
