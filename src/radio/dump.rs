use core::fmt::{Display, Formatter, Result};

use super::{
    rf24::{
        bit_fields::{Config, Feature, RfSetup, SetupRetry},
        registers,
    },
    RadioConfig,
};
use crate::{FifoState, PayloadMode, StatusFlags};

/// A snapshot of every documented register, as returned by
/// [`EsbTelemetry::dump_registers()`](fn@crate::radio::prelude::EsbTelemetry::dump_registers).
///
/// Single byte registers are addressed by their register offset.
/// The multi-byte address registers (TX_ADDR, RX_ADDR_P0 and RX_ADDR_P1) are
/// kept in full, at the address width configured when the snapshot was taken.
///
/// A snapshot decodes back into the [`RadioConfig`] the radio is running with:
/// ```
/// use rf24link::radio::RadioConfig;
/// # use rf24link::radio::RegisterDump;
/// # fn check(dump: &RegisterDump, config: &RadioConfig) {
/// assert_eq!(&dump.radio_config(), config);
/// # }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisterDump {
    values: [u8; registers::DOCUMENTED.len()],
    tx_address: [u8; 5],
    rx_address_p0: [u8; 5],
    rx_address_p1: [u8; 5],
}

impl RegisterDump {
    pub(crate) fn new(
        values: [u8; registers::DOCUMENTED.len()],
        tx_address: [u8; 5],
        rx_address_p0: [u8; 5],
        rx_address_p1: [u8; 5],
    ) -> Self {
        Self {
            values,
            tx_address,
            rx_address_p0,
            rx_address_p1,
        }
    }

    /// The value of a single byte register.
    ///
    /// For the multi-byte address registers, this is the first (least significant) byte.
    /// Returns [`None`] for reserved or out of range addresses.
    pub fn get(&self, addr: u8) -> Option<u8> {
        registers::DOCUMENTED
            .iter()
            .position(|documented| *documented == addr)
            .map(|index| self.values[index])
    }

    /// Iterate over `(address, value)` pairs in ascending register order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        registers::DOCUMENTED
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    fn value(&self, addr: u8) -> u8 {
        self.get(addr).unwrap_or_default()
    }

    /// The address width in bytes, decoded from SETUP_AW.
    pub fn address_width(&self) -> u8 {
        (self.value(registers::SETUP_AW) & 3) + 2
    }

    /// The TX address (LSByte first).
    pub fn tx_address(&self) -> &[u8] {
        &self.tx_address[..self.address_width() as usize]
    }

    /// Copy the effective address of an RX `pipe` into `address`.
    ///
    /// Pipes 2 - 5 share the upper bytes of pipe 1's address, so their result is
    /// pipe 1's address with the first byte replaced.
    /// This does nothing if the given `pipe` is greater than `5`.
    pub fn rx_address(&self, pipe: u8, address: &mut [u8]) {
        let full = match pipe {
            0 => self.rx_address_p0,
            1 => self.rx_address_p1,
            2..=5 => {
                let mut full = self.rx_address_p1;
                full[0] = self.value(registers::RX_ADDR_P0 + pipe);
                full
            }
            _ => return,
        };
        let len = address.len().min(self.address_width() as usize);
        address[..len].copy_from_slice(&full[..len]);
    }

    /// The STATUS register at the time of the snapshot.
    pub fn status(&self) -> StatusFlags {
        StatusFlags::from_bits(self.value(registers::STATUS))
    }

    /// The state of the TX FIFO (`about_tx` is `true`) or the RX FIFO.
    pub fn fifo_state(&self, about_tx: bool) -> FifoState {
        let fifo = self.value(registers::FIFO_STATUS);
        let bits = if about_tx { (fifo >> 4) & 3 } else { fifo & 3 };
        match bits {
            1 => FifoState::Empty,
            2 => FifoState::Full,
            _ => FifoState::Occupied,
        }
    }

    /// Lost packets and retransmissions of the last payload, from OBSERVE_TX.
    pub fn observe_tx(&self) -> (u8, u8) {
        let observed = self.value(registers::OBSERVE_TX);
        (observed >> 4, observed & 0xF)
    }

    /// Decode the snapshot into the settings a [`RadioConfig`] can express.
    ///
    /// Channel bit 7 is reserved and ignored. Auto-ack counts as enabled if any pipe
    /// has it enabled, and dynamic payloads if EN_DPL is set for any pipe.
    pub fn radio_config(&self) -> RadioConfig {
        let rf_setup = RfSetup::from_bits(self.value(registers::RF_SETUP));
        let retries = SetupRetry::from_bits(self.value(registers::SETUP_RETR));
        let config = Config::from_bits(self.value(registers::CONFIG));
        let feature = Feature::from_bits(self.value(registers::FEATURE));
        let payload_mode = if feature.dynamic_payloads() && self.value(registers::DYNPD) != 0 {
            PayloadMode::Dynamic
        } else {
            PayloadMode::Fixed(self.value(registers::RX_PW_P0) & 0x3F)
        };
        RadioConfig::default()
            .with_channel(self.value(registers::RF_CH) & 0x7F)
            .with_data_rate(rf_setup.data_rate())
            .with_pa_level(rf_setup.pa_level())
            .with_lna_enable(rf_setup.lna_enable())
            .with_crc_length(config.crc_length())
            .with_address_width(self.address_width())
            .with_payload_mode(payload_mode)
            .with_auto_ack(self.value(registers::EN_AA) & 0x3F != 0)
            .with_auto_retries(retries.ard(), retries.arc())
    }
}

impl Display for RegisterDump {
    /// One `0xNN = 0xNN` line per register, followed by the full addresses.
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for (addr, value) in self.iter() {
            writeln!(f, "{addr:#04X} = {value:#04X}")?;
        }
        let width = self.address_width() as usize;
        for (name, address) in [
            ("TX_ADDR", &self.tx_address),
            ("RX_ADDR_P0", &self.rx_address_p0),
            ("RX_ADDR_P1", &self.rx_address_p1),
        ] {
            write!(f, "{name:<10} =")?;
            // MSByte first, the way addresses are usually written
            for byte in address[..width].iter().rev() {
                write!(f, " {byte:02X}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
