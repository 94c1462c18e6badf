use std::fmt;

use strum::IntoEnumIterator;

use crate::cli::Args;
use crate::error::Error;

/// Status nibble of a note_on message.
const NOTE_ON_STATUS: u8 = 0x90;

/// Largest value of a 7-bit MIDI data byte.
const DATA_MAX: u8 = 0x7F;

/// Largest MIDI channel number on the wire.
const CHANNEL_MAX: u8 = 0x0F;

/// Wire channel carrying the expression input settings.
pub const SETTINGS_CHANNEL: u8 = 0;

/// Wire channel carrying the LED commands.
pub const LED_CHANNEL: u8 = 14;

/// Note number of LED 0; LED `n` is addressed by note `LED_NOTE_BASE + n`.
pub const LED_NOTE_BASE: i64 = 12;

/// A single note_on message, already checked to fit the MIDI data domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteOn {
    channel: u8,
    note: u8,
    velocity: u8,
}

impl NoteOn {
    /// Builds a note_on message, rejecting any field outside its MIDI range.
    pub fn new(channel: i64, note: i64, velocity: i64) -> Result<Self, Error> {
        Ok(Self {
            channel: data_byte("channel", channel, CHANNEL_MAX)?,
            note: data_byte("note", note, DATA_MAX)?,
            velocity: data_byte("velocity", velocity, DATA_MAX)?,
        })
    }

    /// Returns the three bytes of the message as sent on the wire.
    pub fn to_bytes(&self) -> [u8; 3] {
        [NOTE_ON_STATUS | self.channel, self.note, self.velocity]
    }
}

impl fmt::Display for NoteOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [status, note, velocity] = self.to_bytes();
        write!(f, "{status:02X} {note:02X} {velocity:02X}")
    }
}

fn data_byte(field: &'static str, value: i64, max: u8) -> Result<u8, Error> {
    u8::try_from(value)
        .ok()
        .filter(|byte| *byte <= max)
        .ok_or(Error::OutOfRange { field, value, max })
}

/// Expression input settings of the controller, each bound to one note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Setting {
    Type,
    Channel,
    Address,
    Curve,
}

impl Setting {
    /// Note number addressing this setting on the settings channel.
    pub fn note(self) -> i64 {
        match self {
            Self::Type => 0,
            Self::Channel => 1,
            Self::Address => 2,
            Self::Curve => 3,
        }
    }

    /// Maps the user-facing value to the velocity sent. Channels are given
    /// 1-based but the controller expects them 0-based.
    pub fn velocity(self, value: i64) -> i64 {
        match self {
            Self::Channel => value.saturating_sub(1),
            _ => value,
        }
    }

    fn value(self, args: &Args) -> Option<i64> {
        match self {
            Self::Type => args.r#type,
            Self::Channel => args.channel,
            Self::Address => args.address,
            Self::Curve => args.curve,
        }
    }
}

/// LED behaviours, in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum LedMode {
    Blink,
    Pulse,
    On,
    Off,
}

impl LedMode {
    /// Velocity selecting this behaviour on the LED channel.
    pub fn velocity(self) -> i64 {
        match self {
            Self::Blink => 1,
            Self::Off => 3,
            Self::Pulse => 4,
            Self::On => 5,
        }
    }

    fn leds(self, args: &Args) -> &[i64] {
        match self {
            Self::Blink => &args.blink,
            Self::Pulse => &args.pulse,
            Self::On => &args.on,
            Self::Off => &args.off,
        }
    }
}

/// One entry of the send plan: a setting change or an LED command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Set(Setting, i64),
    Led(i64, LedMode),
}

impl Command {
    /// Builds the note_on message for this command. Values are range checked
    /// here, so a bad command only fails once it is its turn to be sent.
    pub fn message(self) -> Result<NoteOn, Error> {
        match self {
            Self::Set(setting, value) => NoteOn::new(
                SETTINGS_CHANNEL.into(),
                setting.note(),
                setting.velocity(value),
            ),
            Self::Led(led, mode) => NoteOn::new(
                LED_CHANNEL.into(),
                LED_NOTE_BASE.saturating_add(led),
                mode.velocity(),
            ),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set(setting, value) => write!(f, "{setting} = {value}"),
            Self::Led(led, mode) => write!(f, "LED {led} -> {mode}"),
        }
    }
}

/// Translates the parsed arguments into the ordered list of commands to send.
///
/// Settings come first (type, channel, address, curve), followed by the LED
/// lists (blink, pulse, on, off) in command line order.
pub fn plan(args: &Args) -> Vec<Command> {
    let settings = Setting::iter()
        .filter_map(|setting| setting.value(args).map(|value| Command::Set(setting, value)));
    let leds = LedMode::iter()
        .flat_map(|mode| mode.leds(args).iter().map(move |&led| Command::Led(led, mode)));

    settings.chain(leds).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(args: &Args) -> Vec<NoteOn> {
        plan(args)
            .into_iter()
            .map(|command| command.message().unwrap())
            .collect()
    }

    fn note_on(channel: i64, note: i64, velocity: i64) -> NoteOn {
        NoteOn::new(channel, note, velocity).unwrap()
    }

    #[test]
    fn no_flags_sends_nothing() {
        assert!(plan(&Args::default()).is_empty());
    }

    #[test]
    fn type_sends_note_zero() {
        let args = Args {
            r#type: Some(2),
            ..Default::default()
        };
        assert_eq!(notes(&args), vec![note_on(0, 0, 2)]);
    }

    #[test]
    fn channel_is_sent_zero_based() {
        let args = Args {
            channel: Some(5),
            ..Default::default()
        };
        assert_eq!(notes(&args), vec![note_on(0, 1, 4)]);
    }

    #[test]
    fn channel_zero_is_out_of_range() {
        let args = Args {
            channel: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            plan(&args)[0].message(),
            Err(Error::OutOfRange {
                field: "velocity",
                value: -1,
                max: 127
            })
        ));
    }

    #[test]
    fn address_and_curve() {
        let args = Args {
            address: Some(64),
            curve: Some(3),
            ..Default::default()
        };
        assert_eq!(notes(&args), vec![note_on(0, 2, 64), note_on(0, 3, 3)]);
    }

    #[test]
    fn each_led_mode_uses_its_velocity() {
        for (mode, velocity) in [
            (LedMode::Blink, 1),
            (LedMode::Pulse, 4),
            (LedMode::On, 5),
            (LedMode::Off, 3),
        ] {
            let mut args = Args::default();
            match mode {
                LedMode::Blink => args.blink = vec![2],
                LedMode::Pulse => args.pulse = vec![2],
                LedMode::On => args.on = vec![2],
                LedMode::Off => args.off = vec![2],
            }
            assert_eq!(notes(&args), vec![note_on(14, 14, velocity)], "{mode}");
        }
    }

    #[test]
    fn leds_keep_command_line_order() {
        let args = Args {
            blink: vec![5, 0, 3],
            ..Default::default()
        };
        assert_eq!(
            notes(&args),
            vec![note_on(14, 17, 1), note_on(14, 12, 1), note_on(14, 15, 1)]
        );
    }

    #[test]
    fn combined_flags_follow_fixed_order() {
        let args = Args {
            off: vec![1],
            on: vec![2],
            pulse: vec![3],
            blink: vec![4],
            curve: Some(1),
            address: Some(9),
            channel: Some(16),
            r#type: Some(0),
            ..Default::default()
        };
        assert_eq!(
            notes(&args),
            vec![
                note_on(0, 0, 0),
                note_on(0, 1, 15),
                note_on(0, 2, 9),
                note_on(0, 3, 1),
                note_on(14, 16, 1),
                note_on(14, 15, 4),
                note_on(14, 14, 5),
                note_on(14, 13, 3),
            ]
        );
    }

    #[test]
    fn led_beyond_note_range_fails_only_its_own_message() {
        let args = Args {
            r#type: Some(1),
            on: vec![116],
            ..Default::default()
        };
        let commands = plan(&args);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].message().unwrap(), note_on(0, 0, 1));
        assert!(matches!(
            commands[1].message(),
            Err(Error::OutOfRange {
                field: "note",
                value: 128,
                ..
            })
        ));
    }

    #[test]
    fn velocity_above_seven_bits_fails() {
        let args = Args {
            curve: Some(128),
            ..Default::default()
        };
        assert!(plan(&args)[0].message().is_err());
    }

    #[test]
    fn commands_describe_messages() {
        let args = Args {
            address: Some(7),
            pulse: vec![3],
            ..Default::default()
        };
        let described: Vec<String> = plan(&args)
            .iter()
            .map(|command| command.to_string())
            .collect();
        assert_eq!(described, vec!["address = 7", "LED 3 -> pulse"]);
    }

    #[test]
    fn wire_encoding() {
        let message = note_on(14, 12, 5);
        assert_eq!(message.to_bytes(), [0x9E, 0x0C, 0x05]);
        assert_eq!(message.to_string(), "9E 0C 05");
    }

    #[test]
    fn channel_above_fifteen_is_rejected() {
        assert!(matches!(
            NoteOn::new(16, 0, 0),
            Err(Error::OutOfRange {
                field: "channel",
                max: 15,
                ..
            })
        ));
    }
}
