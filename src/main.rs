mod cli;
mod error;
mod midi;
mod output;

use clap::Parser;
use env_logger::Env;

use crate::cli::Args;
use crate::error::Error;
use crate::output::{DryRun, MessageSink, Port};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(error) = run(Args::parse()) {
        eprintln!("{error}");
        std::process::exit(1);
    }
}

/// Primary entry point of the program.
fn run(args: Args) -> Result<(), Error> {
    if args.list {
        let names = output::list_ports()?;
        if names.is_empty() {
            println!("(no output ports)");
        }
        for (index, name) in names.iter().enumerate() {
            println!("{index}: {name}");
        }
        return Ok(());
    }

    if args.dry_run {
        execute(&args, &mut DryRun::new(std::io::stdout().lock()))?;
        return Ok(());
    }

    // The port is opened before anything is checked, so a missing device is
    // reported even when no messages would be sent.
    let mut port = Port::open(args.port.as_deref())?;
    let sent = execute(&args, &mut port)?;
    log::info!("sent {sent} message(s) to {}", port.name());
    Ok(())
}

/// Sends every command the arguments ask for to `sink`.
fn execute(args: &Args, sink: &mut impl MessageSink) -> Result<usize, Error> {
    let commands = midi::plan(args);
    if commands.is_empty() {
        log::warn!("nothing to send");
    }
    output::send_all(sink, &commands)
}
