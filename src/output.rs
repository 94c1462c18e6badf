use std::io::Write;

use anyhow::Context;
use midir::{MidiOutput, MidiOutputConnection, MidiOutputPort};

use crate::error::Error;
use crate::midi::{Command, NoteOn};

/// Name under which the tool registers itself with the MIDI system.
const CLIENT_NAME: &str = "pedaltest";

/// Something that note_on messages can be delivered to.
pub trait MessageSink {
    fn send(&mut self, message: &NoteOn) -> Result<(), Error>;
}

/// An open connection to a MIDI output port.
pub struct Port {
    name: String,
    connection: MidiOutputConnection,
}

impl Port {
    /// Opens the output port picked by `selector`, or the first one if none is given.
    pub fn open(selector: Option<&str>) -> Result<Self, Error> {
        let output = MidiOutput::new(CLIENT_NAME).context("failed to initialize MIDI output")?;
        let ports = output.ports();
        let names = port_names(&output, &ports)?;
        let index = select_port(&names, selector)?;
        let name = names[index].clone();

        log::info!("opening output port {index}: {name}");
        let connection = output
            .connect(&ports[index], CLIENT_NAME)
            .map_err(|error| Error::general(&format!("failed to connect to '{name}': {error}")))?;

        Ok(Self { name, connection })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl MessageSink for Port {
    fn send(&mut self, message: &NoteOn) -> Result<(), Error> {
        self.connection
            .send(&message.to_bytes())
            .with_context(|| format!("failed to send {message} to '{}'", self.name))?;
        Ok(())
    }
}

/// Writes each message as a line of hex bytes instead of sending it to a device.
pub struct DryRun<W> {
    writer: W,
}

impl<W: Write> DryRun<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MessageSink for DryRun<W> {
    fn send(&mut self, message: &NoteOn) -> Result<(), Error> {
        writeln!(self.writer, "{message}").context("failed to write message")?;
        Ok(())
    }
}

/// Builds and delivers the commands to `sink` one at a time, in order.
///
/// Stops at the first command that cannot be built or sent; everything before
/// it has already been delivered. Returns the number of messages sent.
pub fn send_all(sink: &mut impl MessageSink, commands: &[Command]) -> Result<usize, Error> {
    for (sent, command) in commands.iter().enumerate() {
        log::info!("{command}");
        let message = command.message().map_err(|error| {
            log::warn!("stopping after {sent} message(s)");
            error
        })?;
        log::debug!("sending {message}");
        sink.send(&message)?;
    }
    Ok(commands.len())
}

/// Returns the names of all output ports currently known to the system.
pub fn list_ports() -> Result<Vec<String>, Error> {
    let output = MidiOutput::new(CLIENT_NAME).context("failed to initialize MIDI output")?;
    port_names(&output, &output.ports())
}

fn port_names(output: &MidiOutput, ports: &[MidiOutputPort]) -> Result<Vec<String>, Error> {
    ports
        .iter()
        .map(|port| {
            output
                .port_name(port)
                .context("failed to read port name")
                .map_err(Into::into)
        })
        .collect()
}

/// Picks a port from `names`. A selector is tried as an index first, then as a
/// case-insensitive part of a port name.
fn select_port(names: &[String], selector: Option<&str>) -> Result<usize, Error> {
    if names.is_empty() {
        return Err(Error::NoOutputPort);
    }

    let Some(selector) = selector else {
        return Ok(0);
    };

    if let Ok(index) = selector.parse::<usize>() {
        if index < names.len() {
            return Ok(index);
        }
    }

    let needle = selector.to_lowercase();
    names
        .iter()
        .position(|name| name.to_lowercase().contains(&needle))
        .ok_or_else(|| Error::PortNotFound(selector.to_string()))
}
