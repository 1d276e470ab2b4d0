use bitfield_struct::bitfield;

use crate::{CrcLength, DataRate, PaLevel};

/// The CONFIG register.
///
/// The `mask_*` bits disable the corresponding event on the IRQ pin.
#[bitfield(u8, order = Msb)]
#[derive(PartialEq, Eq)]
pub(crate) struct Config {
    #[bits(1)]
    _padding: u8,

    pub mask_rx_dr: bool,

    pub mask_tx_ds: bool,

    pub mask_max_rt: bool,

    /// `EN_CRC | CRCO`
    #[bits(2, default = 3)]
    crc: u8,

    pub power: bool,

    pub is_rx: bool,
}

impl Config {
    pub fn crc_length(&self) -> CrcLength {
        CrcLength::from_bits(self.crc())
    }

    pub fn with_crc_length(self, length: CrcLength) -> Self {
        self.with_crc(length.into_bits())
    }
}

#[bitfield(u8, order = Msb)]
pub(crate) struct SetupRetry {
    /// The auto-retry feature's `delay`.
    #[bits(4, default = 5)]
    pub ard: u8,

    /// The auto-retry feature's `count`.
    #[bits(4, default = 15)]
    pub arc: u8,
}

/// The RF_SETUP register.
#[bitfield(u8, order = Msb)]
pub(crate) struct RfSetup {
    pub cont_wave: bool,

    #[bits(1)]
    _reserved: u8,

    pub dr_low: bool,

    pub pll_lock: bool,

    pub dr_high: bool,

    #[bits(2, default = 3)]
    pa: u8,

    #[bits(1, default = true)]
    pub lna_enable: bool,
}

impl RfSetup {
    pub fn data_rate(&self) -> DataRate {
        match (self.dr_low(), self.dr_high()) {
            (true, _) => DataRate::Kbps250,
            (false, true) => DataRate::Mbps2,
            (false, false) => DataRate::Mbps1,
        }
    }

    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        self.with_dr_low(data_rate == DataRate::Kbps250)
            .with_dr_high(data_rate == DataRate::Mbps2)
    }

    pub fn pa_level(&self) -> PaLevel {
        PaLevel::from_bits(self.pa())
    }

    pub fn with_pa_level(self, level: PaLevel) -> Self {
        self.with_pa(level.into_bits())
    }
}

#[bitfield(u8, order = Msb)]
pub(crate) struct Feature {
    #[bits(5)]
    _padding: u8,

    /// `EN_DPL`
    pub dynamic_payloads: bool,

    /// `EN_ACK_PAY`
    pub ack_payloads: bool,

    /// `EN_DYN_ACK`
    pub ask_no_ack: bool,
}

/// The OBSERVE_TX register (read only).
#[bitfield(u8, order = Msb)]
pub(crate) struct ObserveTx {
    /// Lost packets, saturates at 15. Reset by writing RF_CH.
    #[bits(4)]
    pub plos_cnt: u8,

    /// Retransmissions of the current (or last) payload.
    #[bits(4)]
    pub arc_cnt: u8,
}
