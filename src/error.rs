use anyhow::anyhow;

/// Custom error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A generically presented error.
    #[error("Error: {0:#}")]
    General(#[from] anyhow::Error),
    /// The system has no MIDI output ports at all.
    #[error("Error: no MIDI output port available")]
    NoOutputPort,
    /// The `--port` selector matched none of the available ports.
    #[error("Error: no MIDI output port matches '{0}'")]
    PortNotFound(String),
    /// A computed MIDI data value does not fit its field.
    #[error("Error: {field} value {value} is outside 0..={max}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        max: u8,
    },
}

impl Error {
    /// Constructs a new instance of `Error::General` with the given message.
    pub fn general(message: &str) -> Self {
        Self::General(anyhow!("{}", message))
    }
}
