use clap::Parser;

/// Sends note_on test messages to an expression pedal controller.
///
/// Settings go out on channel 1 (wire channel 0), LED commands on channel 15
/// (wire channel 14).
#[derive(Parser, Debug, Default)]
#[command(name = "pedaltest")]
#[command(version)]
pub struct Args {
    /// Expression input channel, 1-based.
    #[arg(short, long)]
    pub channel: Option<i64>,

    /// Expression input type.
    #[arg(short = 't', long = "type")]
    pub r#type: Option<i64>,

    /// Expression input controller address.
    #[arg(short, long)]
    pub address: Option<i64>,

    /// Expression input response curve.
    #[arg(short = 'u', long)]
    pub curve: Option<i64>,

    /// Blink the given LED. May be repeated.
    #[arg(short, long, value_name = "LED")]
    pub blink: Vec<i64>,

    /// Pulse the given LED. May be repeated.
    #[arg(short, long, value_name = "LED")]
    pub pulse: Vec<i64>,

    /// Switch the given LED off. May be repeated.
    #[arg(short = '0', long, value_name = "LED")]
    pub off: Vec<i64>,

    /// Switch the given LED on. May be repeated.
    #[arg(short = '1', long, value_name = "LED")]
    pub on: Vec<i64>,

    /// Output port to use, by index or by part of its name.
    /// Defaults to the first available port.
    #[arg(short = 'P', long, value_name = "INDEX|NAME")]
    pub port: Option<String>,

    /// List the available output ports and exit.
    #[arg(short, long)]
    pub list: bool,

    /// Print the messages instead of sending them.
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}
