//! Errors emitted by the link driver.
//!
//! There are 3 classes of errors:
//! - bus errors ([`Nrf24Error::Spi`] and [`Nrf24Error::Gpo`]) are hardware
//!   faults reported by the injected transport. They end the current call and
//!   are never retried.
//! - [`ConfigError`]s are caller mistakes. They are reported before anything
//!   is written to the radio.
//! - [`SendError`]s are expected operational outcomes of the transmit engine.
//!   Callers branch on them to decide their own retry policy.

use core::fmt::{Display, Formatter, Result};

/// The setting that failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigField {
    /// RF channel, valid range is [0, 125].
    Channel,
    /// Address width, valid range is [3, 5].
    AddressWidth,
    /// Fixed payload size, valid range is [1, 32].
    PayloadSize,
    /// Auto-retransmit delay, valid range is [0, 15].
    RetransmitDelay,
    /// Auto-retransmit count, valid range is [0, 15].
    RetransmitCount,
    /// CRC cannot be disabled while auto-ack is enabled.
    CrcLength,
    /// Dynamic payloads need auto-ack enabled.
    AutoAck,
    /// Pipe number, valid range is [0, 5].
    PipeId,
    /// Register address, valid range is [0x00, 0x1D].
    RegisterAddress,
}

impl Display for ConfigField {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let name = match self {
            ConfigField::Channel => "channel",
            ConfigField::AddressWidth => "address width",
            ConfigField::PayloadSize => "payload size",
            ConfigField::RetransmitDelay => "retransmit delay",
            ConfigField::RetransmitCount => "retransmit count",
            ConfigField::CrcLength => "CRC length",
            ConfigField::AutoAck => "auto-ack setting",
            ConfigField::PipeId => "pipe number",
            ConfigField::RegisterAddress => "register address",
        };
        f.write_str(name)
    }
}

/// A rejected configuration request. Nothing was written to the radio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A value outside its hardware-documented range.
    InvalidParameter(ConfigField),
    /// An address (or address width) that disagrees with the width shared by all pipes.
    AddressWidthMismatch { expected: u8, actual: usize },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ConfigError::InvalidParameter(field) => write!(f, "invalid {field}"),
            ConfigError::AddressWidthMismatch { expected, actual } => write!(
                f,
                "address width mismatch: expected {expected} bytes, got {actual}"
            ),
        }
    }
}

/// A transmission that did not complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendError {
    /// Another payload is already in flight.
    Busy,
    /// Neither TX_DS nor MAX_RT was observed within the given timeout.
    Timeout,
    /// The hardware exhausted its auto-retransmits without an ACK.
    /// The payload was flushed from the TX FIFO.
    MaxRetransmitsExceeded,
    /// The TX FIFO had no free slot.
    FifoFull,
    /// The payload length is not acceptable for the configured payload mode.
    InvalidPayloadLength(usize),
    /// The radio is in RX mode; call `stop_listening()` first.
    Listening,
    /// There is no payload in flight to poll.
    NotTransmitting,
}

impl Display for SendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            SendError::Busy => f.write_str("a transmission is already in flight"),
            SendError::Timeout => f.write_str("timed out waiting for the transmission"),
            SendError::MaxRetransmitsExceeded => f.write_str("maximum retransmits exceeded"),
            SendError::FifoFull => f.write_str("TX FIFO is full"),
            SendError::InvalidPayloadLength(len) => write!(f, "invalid payload length {len}"),
            SendError::Listening => f.write_str("radio is in RX mode"),
            SendError::NotTransmitting => f.write_str("no transmission in flight"),
        }
    }
}

/// An collection of error types emitted by [`RF24Link`](crate::radio::RF24Link).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Nrf24Error<SPI, DO> {
    /// Represents a SPI transaction error.
    Spi(SPI),
    /// Represents a DigitalOutput error (the CE pin).
    Gpo(DO),
    /// Represents a corruption of binary data (as it was transferred over the SPI bus' MISO)
    BinaryCorruption,
    /// See [`ConfigError`].
    Config(ConfigError),
    /// See [`SendError`].
    Send(SendError),
}

impl<SPI, DO> Nrf24Error<SPI, DO> {
    /// Is this a transport-level fault?
    pub fn is_bus_error(&self) -> bool {
        matches!(self, Nrf24Error::Spi(_) | Nrf24Error::Gpo(_))
    }
}

impl<SPI, DO> From<ConfigError> for Nrf24Error<SPI, DO> {
    fn from(value: ConfigError) -> Self {
        Nrf24Error::Config(value)
    }
}

impl<SPI, DO> From<SendError> for Nrf24Error<SPI, DO> {
    fn from(value: SendError) -> Self {
        Nrf24Error::Send(value)
    }
}

impl<SPI: core::fmt::Debug, DO: core::fmt::Debug> Display for Nrf24Error<SPI, DO> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Nrf24Error::Spi(e) => write!(f, "SPI error: {e:?}"),
            Nrf24Error::Gpo(e) => write!(f, "CE pin error: {e:?}"),
            Nrf24Error::BinaryCorruption => f.write_str("corrupted data on MISO"),
            Nrf24Error::Config(e) => write!(f, "{e}"),
            Nrf24Error::Send(e) => write!(f, "{e}"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ConfigError::InvalidParameter(field) => {
                defmt::write!(fmt, "InvalidParameter({=u8})", *field as u8)
            }
            ConfigError::AddressWidthMismatch { expected, actual } => defmt::write!(
                fmt,
                "AddressWidthMismatch(expected {=u8}, got {=usize})",
                expected,
                actual
            ),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SendError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            SendError::Busy => defmt::write!(fmt, "Busy"),
            SendError::Timeout => defmt::write!(fmt, "Timeout"),
            SendError::MaxRetransmitsExceeded => defmt::write!(fmt, "MaxRetransmitsExceeded"),
            SendError::FifoFull => defmt::write!(fmt, "FifoFull"),
            SendError::InvalidPayloadLength(len) => {
                defmt::write!(fmt, "InvalidPayloadLength({=usize})", len)
            }
            SendError::Listening => defmt::write!(fmt, "Listening"),
            SendError::NotTransmitting => defmt::write!(fmt, "NotTransmitting"),
        }
    }
}

#[cfg(test)]
mod test {
    extern crate std;
    use super::{ConfigError, ConfigField, Nrf24Error, SendError};
    use std::{format, string::String};

    type Error = Nrf24Error<u8, u8>;

    #[test]
    fn conversions() {
        let err: Error = ConfigError::InvalidParameter(ConfigField::Channel).into();
        assert_eq!(
            err,
            Nrf24Error::Config(ConfigError::InvalidParameter(ConfigField::Channel))
        );
        let err: Error = SendError::Busy.into();
        assert_eq!(err, Nrf24Error::Send(SendError::Busy));
        assert!(!err.is_bus_error());
        assert!(Error::Spi(1).is_bus_error());
        assert!(Error::Gpo(1).is_bus_error());
    }

    #[test]
    fn display() {
        let err: Error = ConfigError::AddressWidthMismatch {
            expected: 5,
            actual: 4,
        }
        .into();
        assert_eq!(
            format!("{err}"),
            String::from("address width mismatch: expected 5 bytes, got 4")
        );
        assert_eq!(
            format!("{}", ConfigError::InvalidParameter(ConfigField::PipeId)),
            String::from("invalid pipe number")
        );
        assert_eq!(
            format!("{}", Error::Send(SendError::MaxRetransmitsExceeded)),
            String::from("maximum retransmits exceeded")
        );
    }
}
