//! ESTTC commands
//!
//! The fixed set of ESTTC requests this crate can transmit. Each payload is a
//! complete vendor command string, including its own checksum and terminator.
//! The framer treats it as an opaque blob.
//!
//! Only the status control word read ends in a carriage return. The other five
//! end in the two bytes `0x00 0x44` (NUL, `D`), which is what the ground
//! station has always put on air for them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownCommand;

/// ESTTC commands supported by the uplink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    /// Read the Status Control Word (SCW)
    #[serde(rename = "read-scw")]
    ReadStatusControlWord,

    /// Set the beacon bit in the SCW and write it back
    EnableBeacons,

    /// Clear the beacon bit in the SCW and write it back
    DisableBeacons,

    /// Set the beacon period (fixed at 5 seconds)
    SetBeaconPeriod,

    /// Read the radio uptime
    ReadUptime,

    /// Read the number of packets the radio has received
    ReadReceivedPacketCount,
}

impl Command {
    /// Every command, in menu order
    pub const ALL: [Command; 6] = [
        Command::ReadStatusControlWord,
        Command::EnableBeacons,
        Command::DisableBeacons,
        Command::SetBeaconPeriod,
        Command::ReadUptime,
        Command::ReadReceivedPacketCount,
    ];

    /// Get the raw ESTTC payload bytes
    pub fn payload(&self) -> &'static [u8] {
        match self {
            Command::ReadStatusControlWord => b"ES+R2200 BD888E1F\r",
            Command::EnableBeacons => b"ES+W22003440 9287EF3A\x00D",
            Command::DisableBeacons => b"ES+W22003400 F6EB2A3E\x00D",
            Command::SetBeaconPeriod => b"ES+W220700000005 AE2A4F6E\x00D",
            Command::ReadUptime => b"ES+R2202 5386EF33\x00D",
            Command::ReadReceivedPacketCount => b"ES+R2204 BAE54A06\x00D",
        }
    }

    /// Short label as shown in a selection menu
    pub fn menu_label(&self) -> &'static str {
        match self {
            Command::ReadStatusControlWord => "Read Status Control Word (SCW)",
            Command::EnableBeacons => "Enable beacons",
            Command::DisableBeacons => "Disable beacons",
            Command::SetBeaconPeriod => "Set beacon period",
            Command::ReadUptime => "Get radio uptime",
            Command::ReadReceivedPacketCount => "Get radio received packets",
        }
    }

    /// Longer description of what the command does on the radio
    pub fn description(&self) -> &'static str {
        match self {
            Command::ReadStatusControlWord => "Read Status Control Word",
            Command::EnableBeacons => {
                "Enable beacons bit in ESTTC Status Control Word and write SCW"
            }
            Command::DisableBeacons => {
                "Disable beacons bit in ESTTC Status Control Word and write SCW"
            }
            Command::SetBeaconPeriod => "Set beacon period, hard-coded to 5 seconds",
            Command::ReadUptime => "Read radio uptime",
            Command::ReadReceivedPacketCount => "Read radio number of received packets",
        }
    }

    /// Command-line name (`read-scw`, `enable-beacons`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            Command::ReadStatusControlWord => "read-scw",
            Command::EnableBeacons => "enable-beacons",
            Command::DisableBeacons => "disable-beacons",
            Command::SetBeaconPeriod => "set-beacon-period",
            Command::ReadUptime => "read-uptime",
            Command::ReadReceivedPacketCount => "read-received-packet-count",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Command::ALL
            .into_iter()
            .find(|cmd| cmd.name() == wanted)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

/// What the operator picked from the command menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Selection {
    /// Transmit this command
    Command(Command),
    /// Send nothing
    Quit,
}

impl Selection {
    /// Payload to frame, or `None` when the operator quit
    pub fn payload(&self) -> Option<&'static [u8]> {
        match self {
            Selection::Command(cmd) => Some(cmd.payload()),
            Selection::Quit => None,
        }
    }

    /// The selected command, if any
    pub fn command(&self) -> Option<Command> {
        match self {
            Selection::Command(cmd) => Some(*cmd),
            Selection::Quit => None,
        }
    }
}

impl From<Command> for Selection {
    fn from(cmd: Command) -> Self {
        Selection::Command(cmd)
    }
}

impl FromStr for Selection {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("quit") {
            return Ok(Selection::Quit);
        }
        s.parse().map(Selection::Command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payloads_are_vendor_commands() {
        for cmd in Command::ALL {
            let payload = cmd.payload();
            assert!(payload.is_ascii(), "{cmd} payload is not ASCII");
            assert!(payload.starts_with(b"ES+"));
        }
    }

    #[test]
    fn test_payload_terminators() {
        assert!(Command::ReadStatusControlWord.payload().ends_with(b"\r"));
        for cmd in &Command::ALL[1..] {
            assert!(cmd.payload().ends_with(&[0x00, 0x44]), "{cmd}");
        }
    }

    #[test]
    fn test_names_round_trip() {
        for cmd in Command::ALL {
            assert_eq!(cmd.name().parse::<Command>(), Ok(cmd));
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = "reboot".parse::<Command>().unwrap_err();
        assert_eq!(err, UnknownCommand("reboot".to_string()));
        assert_eq!(err.to_string(), "Unknown command: reboot");
    }

    #[test]
    fn test_quit_has_no_payload() {
        assert_eq!(Selection::Quit.payload(), None);
        assert_eq!("QUIT".parse::<Selection>(), Ok(Selection::Quit));
        assert_eq!(
            Selection::from(Command::ReadUptime).payload(),
            Some(&b"ES+R2202 5386EF33\x00D"[..])
        );
    }

    #[test]
    fn test_serde_names_match_cli_names() {
        for cmd in Command::ALL {
            let json = serde_json::to_string(&cmd).unwrap();
            assert_eq!(json, format!("\"{}\"", cmd.name()));
        }
    }
}
