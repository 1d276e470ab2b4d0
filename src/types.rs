//! This module defines types shared by the driver's configuration, telemetry
//! and transmit APIs.

use core::{
    fmt::{Display, Formatter, Result},
    write,
};

use bitfield_struct::bitfield;

/// Power Amplifier level. The units dBm (decibel-milliwatts or dB<sub>mW</sub>)
/// represents a logarithmic signal loss.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaLevel {
    /// -18 dBm
    Min,
    /// -12 dBm
    Low,
    /// -6 dBm
    High,
    /// 0 dBm
    Max,
}

impl PaLevel {
    /// Encode as the 2-bit `RF_PWR` field of the RF_SETUP register.
    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            PaLevel::Min => 0,
            PaLevel::Low => 1,
            PaLevel::High => 2,
            PaLevel::Max => 3,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value & 3 {
            0 => PaLevel::Min,
            1 => PaLevel::Low,
            2 => PaLevel::High,
            _ => PaLevel::Max,
        }
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for PaLevel {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PaLevel::Min => defmt::write!(fmt, "Min"),
            PaLevel::Low => defmt::write!(fmt, "Low"),
            PaLevel::High => defmt::write!(fmt, "High"),
            PaLevel::Max => defmt::write!(fmt, "Max"),
        }
    }
}

impl Display for PaLevel {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            PaLevel::Min => write!(f, "Min"),
            PaLevel::Low => write!(f, "Low"),
            PaLevel::High => write!(f, "High"),
            PaLevel::Max => write!(f, "Max"),
        }
    }
}

/// How fast data moves through the air. Units are in bits per second (bps).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataRate {
    /// represents 1 Mbps
    Mbps1,
    /// represents 2 Mbps
    Mbps2,
    /// represents 250 Kbps
    Kbps250,
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for DataRate {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DataRate::Mbps1 => defmt::write!(fmt, "1 Mbps"),
            DataRate::Mbps2 => defmt::write!(fmt, "2 Mbps"),
            DataRate::Kbps250 => defmt::write!(fmt, "250 Kbps"),
        }
    }
}

impl Display for DataRate {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            DataRate::Mbps1 => write!(f, "1 Mbps"),
            DataRate::Mbps2 => write!(f, "2 Mbps"),
            DataRate::Kbps250 => write!(f, "250 Kbps"),
        }
    }
}

/// The length of a CRC checksum that is used (if any).
///
/// The hardware forces CRC on whenever auto-ack is enabled for any pipe,
/// so [`CrcLength::Disabled`] is only accepted together with auto-ack disabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrcLength {
    /// represents no CRC checksum is used
    Disabled,
    /// represents CRC 8 bit checksum is used
    Bit8,
    /// represents CRC 16 bit checksum is used
    Bit16,
}

impl CrcLength {
    /// Encode as the 2-bit `EN_CRC | CRCO` field of the CONFIG register.
    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            CrcLength::Disabled => 0,
            CrcLength::Bit8 => 2,
            CrcLength::Bit16 => 3,
        }
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match value & 3 {
            0 | 1 => CrcLength::Disabled,
            2 => CrcLength::Bit8,
            _ => CrcLength::Bit16,
        }
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for CrcLength {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CrcLength::Disabled => defmt::write!(fmt, "disabled"),
            CrcLength::Bit8 => defmt::write!(fmt, "8 bit"),
            CrcLength::Bit16 => defmt::write!(fmt, "16 bit"),
        }
    }
}

impl Display for CrcLength {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            CrcLength::Disabled => write!(f, "disabled"),
            CrcLength::Bit8 => write!(f, "8 bit"),
            CrcLength::Bit16 => write!(f, "16 bit"),
        }
    }
}

/// How payload lengths are negotiated between both ends of the link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadMode {
    /// Every payload occupies exactly this many bytes (1 - 32).
    /// Shorter payloads are padded with zeros.
    Fixed(u8),
    /// Each payload carries its own length (1 - 32 bytes).
    Dynamic,
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for PayloadMode {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PayloadMode::Fixed(size) => defmt::write!(fmt, "fixed ({=u8} bytes)", size),
            PayloadMode::Dynamic => defmt::write!(fmt, "dynamic"),
        }
    }
}

impl Display for PayloadMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            PayloadMode::Fixed(size) => write!(f, "fixed ({size} bytes)"),
            PayloadMode::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// The possible states of a FIFO.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FifoState {
    /// Represent the state of a FIFO when it is full.
    Full,
    /// Represent the state of a FIFO when it is empty.
    Empty,
    /// Represent the state of a FIFO when it is not full but not empty either.
    Occupied,
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for FifoState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            FifoState::Empty => defmt::write!(fmt, "Empty"),
            FifoState::Full => defmt::write!(fmt, "Full"),
            FifoState::Occupied => defmt::write!(fmt, "Occupied"),
        }
    }
}

impl Display for FifoState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            FifoState::Empty => write!(f, "Empty"),
            FifoState::Full => write!(f, "Full"),
            FifoState::Occupied => write!(f, "Occupied"),
        }
    }
}

/// A view of the radio's STATUS register.
///
/// The STATUS byte is clocked out by the radio during the first byte of every
/// SPI transaction, so the driver always holds the value observed by its
/// latest bus exchange.
///
/// Use [`StatusFlags::default`] to instantiate all flags set to false.
/// Use [`StatusFlags::new`] to instantiate all IRQ flags set to true.
#[bitfield(u8, new = false, order = Msb)]
#[derive(PartialEq, Eq)]
pub struct StatusFlags {
    #[bits(1)]
    _padding: u8,

    /// RX Data Ready: a payload waits in the RX FIFO.
    pub rx_dr: bool,

    /// TX Data Sent: a payload left the TX FIFO (and was acknowledged,
    /// if auto-ack is enabled).
    pub tx_ds: bool,

    /// MAX_RT: the configured retransmit count was reached without an ACK.
    pub max_rt: bool,

    /// Pipe number of the payload at the head of the RX FIFO
    /// (`7` when the RX FIFO is empty).
    #[bits(3)]
    pub rx_pipe: u8,

    /// The TX FIFO has no free slot.
    pub tx_full: bool,
}

impl StatusFlags {
    /// A mask to isolate only the IRQ flags. Useful for STATUS and CONFIG registers.
    pub(crate) const IRQ_MASK: u8 = 0x70;

    /// A convenience constructor similar to [`StatusFlags::default`] except
    /// all IRQ flags are set to `true`.
    pub fn new() -> Self {
        Self::from_bits(Self::IRQ_MASK)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "StatusFlags rx_dr: {}, tx_ds: {}, max_rt: {}",
            self.rx_dr(),
            self.tx_ds(),
            self.max_rt()
        )
    }
}

impl Display for StatusFlags {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "StatusFlags rx_dr: {}, tx_ds: {}, max_rt: {}",
            self.rx_dr(),
            self.tx_ds(),
            self.max_rt()
        )
    }
}

/// Loss and retransmission counters plus the FIFO flags last seen on the bus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkStatus {
    /// Packets that reached MAX_RT since the RF channel was last written.
    ///
    /// The hardware saturates this counter at 15.
    pub packets_lost: u8,
    /// Retransmissions spent on the most recent payload.
    pub retransmits_for_last_packet: u8,
    /// The TX FIFO had no free slot.
    pub tx_fifo_full: bool,
    /// A received payload was waiting.
    pub rx_data_ready: bool,
}

/// The result of an acknowledged (or, without auto-ack, completed) transmission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SendOutcome {
    /// How many on-air retransmissions the hardware needed.
    pub retransmits_used: u8,
}

/// The transmit engine's state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkState {
    /// No payload is in flight.
    Idle,
    /// A payload was handed to the radio and no outcome was observed yet.
    Transmitting,
}
