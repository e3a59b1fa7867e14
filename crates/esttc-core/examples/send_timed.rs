//! Timed ESTTC Command Sender
//!
//! Frames an ESTTC command and sends it over UDP to the modulator flowgraph
//! for a fixed time at a fixed rate.
//!
//! Usage:
//!   cargo run --example send_timed -- [OPTIONS] COMMAND
//!
//! Commands:
//!   read-scw, enable-beacons, disable-beacons, set-beacon-period,
//!   read-uptime, read-received-packet-count, quit
//!
//! Options:
//!   --config PATH     Config file (default: ~/.config/esttc-uplink/config.json)
//!   --host HOST       Destination host (default from config: 127.0.0.1)
//!   --port PORT       Destination port (default from config: 52001)
//!   --baud RATE       Radio baud rate: 600, 1200, 2400, 4800, 9600, 19200
//!   --multiple N      Interval as N times the minimum (1-10)
//!   --duration SECS   Total transmit time in seconds (0-300)
//!   --dry-run         Log frames as hex instead of sending them
//!   --list            Show commands and interval choices, then exit
//!
//! Set RUST_LOG=esttc_core=trace to see every packet.

use anyhow::{anyhow, bail, Context, Result};
use esttc_core::config::TransmitterConfig;
use esttc_core::prelude::*;
use esttc_core::transmit::{DryRunSink, PacketSink};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut host: Option<String> = None;
    let mut port: Option<u16> = None;
    let mut baud: Option<u32> = None;
    let mut multiple: Option<u8> = None;
    let mut duration: Option<u32> = None;
    let mut dry_run = false;
    let mut list = false;
    let mut selection: Option<Selection> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => config_path = Some(PathBuf::from(value(&args, &mut i)?)),
            "--host" => host = Some(value(&args, &mut i)?.to_string()),
            "--port" | "-p" => port = Some(value(&args, &mut i)?.parse().context("--port")?),
            "--baud" | "-b" => baud = Some(value(&args, &mut i)?.parse().context("--baud")?),
            "--multiple" | "-m" => {
                multiple = Some(value(&args, &mut i)?.parse().context("--multiple")?)
            }
            "--duration" | "-d" => {
                duration = Some(value(&args, &mut i)?.parse().context("--duration")?)
            }
            "--dry-run" => dry_run = true,
            "--list" => list = true,
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            arg if !arg.starts_with('-') => selection = Some(arg.parse()?),
            other => bail!("Unknown option: {}", other),
        }
        i += 1;
    }

    let config_path = match config_path {
        Some(p) => p,
        None => TransmitterConfig::default_path()?,
    };
    let mut config = TransmitterConfig::load_or_default(&config_path)
        .with_context(|| format!("Loading {}", config_path.display()))?;

    if let Some(host) = host {
        config.destination.host = host;
    }
    if let Some(port) = port {
        config.destination.port = port;
    }
    if let Some(baud) = baud {
        config.baud_rate = BaudRate::try_from(baud)?;
    }
    if let Some(multiple) = multiple {
        config.interval_multiple = multiple;
    }
    if let Some(duration) = duration {
        config.duration_secs = duration;
    }

    let policy = config.timing_policy();

    if list {
        print_menu(&policy);
        return Ok(());
    }

    let selection = selection.ok_or_else(|| anyhow!("No command given (try --list)"))?;
    let interval_ms = policy.interval_for_multiple(config.interval_multiple)?;

    println!("Configuration:");
    println!("  Destination:  {}:{}", config.destination.host, config.destination.port);
    println!("  Baud rate:    {}", policy.baud_rate());
    println!("  Min interval: {}ms", policy.min_interval_ms());
    println!("  Interval:     {}ms", interval_ms);
    println!("  Duration:     {}s", config.duration_secs);
    println!("  Dry run:      {}", dry_run);
    println!();

    let mut sink: Box<dyn PacketSink> = if dry_run {
        Box::new(DryRunSink::new())
    } else {
        Box::new(UdpSink::new(config.destination_addr()?)?)
    };

    let mut scheduler = Scheduler::new();
    let outcome = transmit_selection(
        selection,
        config.duration_secs,
        &policy,
        interval_ms,
        &mut scheduler,
        &mut sink,
    )?;

    match outcome {
        Some(report) => {
            println!("Sent {} packets", report.packets_sent);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        None => println!("No command will be sent"),
    }

    Ok(())
}

/// Take the value following an option
fn value<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str> {
    let option = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} needs a value", option))
}

fn print_menu(policy: &TimingPolicy) {
    println!("Commands:");
    for cmd in Command::ALL {
        println!("  {:<28} {}", cmd.name(), cmd.menu_label());
    }
    println!("  {:<28} Send nothing", "quit");
    println!();
    println!("Intervals at {} baud:", policy.baud_rate());
    for (i, ms) in policy.interval_choices().iter().enumerate() {
        println!("  {:>2}x  {}ms", i + 1, ms);
    }
}

fn print_help() {
    println!("Usage: send_timed [OPTIONS] COMMAND");
    println!();
    println!("Options:");
    println!("  --config PATH     Config file");
    println!("  --host HOST       Destination host");
    println!("  --port PORT       Destination port");
    println!("  --baud RATE       600, 1200, 2400, 4800, 9600, 19200");
    println!("  --multiple N      Interval multiple (1-10)");
    println!("  --duration SECS   Transmit time (0-300)");
    println!("  --dry-run         Log frames instead of sending");
    println!("  --list            Show commands and intervals");
}
