/// Register offsets for the nRF24L01.
pub mod registers {
    pub const CONFIG: u8 = 0x00;
    pub const EN_AA: u8 = 0x01;
    pub const EN_RXADDR: u8 = 0x02;
    pub const SETUP_AW: u8 = 0x03;
    pub const SETUP_RETR: u8 = 0x04;
    pub const RF_CH: u8 = 0x05;
    pub const RF_SETUP: u8 = 0x06;
    pub const STATUS: u8 = 0x07;
    pub const OBSERVE_TX: u8 = 0x08;
    pub const RPD: u8 = 0x09;
    pub const RX_ADDR_P0: u8 = 0x0A;
    pub const RX_ADDR_P1: u8 = 0x0B;
    pub const TX_ADDR: u8 = 0x10;
    pub const RX_PW_P0: u8 = 0x11;
    pub const FIFO_STATUS: u8 = 0x17;
    pub const DYNPD: u8 = 0x1C;
    pub const FEATURE: u8 = 0x1D;

    /// The highest register address.
    pub const LAST: u8 = FEATURE;

    /// Registers documented by the datasheet (0x18 - 0x1B are reserved).
    pub const DOCUMENTED: [u8; 26] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E,
        0x0F, 0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x1C, 0x1D,
    ];
}

/// A private module encapsulating SPI commands for the nRF24L01.
pub mod commands {
    pub const W_REGISTER: u8 = 0x20;
    pub const R_RX_PL_WID: u8 = 0x60;
    pub const R_RX_PAYLOAD: u8 = 0x61;
    pub const W_TX_PAYLOAD: u8 = 0xA0;
    pub const FLUSH_TX: u8 = 0xE1;
    pub const FLUSH_RX: u8 = 0xE2;
    pub const NOP: u8 = 0xFF;
}

/// A private module to encapsulate bit mnemonics
pub mod mnemonics {
    pub const MASK_RX_DR: u8 = 1 << 6;
    pub const MASK_TX_DS: u8 = 1 << 5;
    pub const MASK_MAX_RT: u8 = 1 << 4;
    /// RX_EMPTY in FIFO_STATUS
    pub const RX_EMPTY: u8 = 1;
    /// All 6 pipes, as used by EN_AA, EN_RXADDR and DYNPD.
    pub const ALL_PIPES: u8 = 0x3F;
}

/// Timing constraints taken from the nRF24L01+ datasheet (in microseconds).
pub mod timing {
    /// Worst case power down to standby transition (Tpd2stby), rounded up.
    pub const POWER_UP_SETTLE_US: u32 = 5000;
    /// Minimum CE high time to start a transmission.
    pub const CE_PULSE_US: u32 = 10;
    /// Interval between STATUS polls while waiting on a transmission.
    pub const POLL_INTERVAL_US: u32 = 10;
}
