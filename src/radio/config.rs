use crate::{ConfigError, ConfigField, CrcLength, DataRate, PaLevel, PayloadMode};

/// An object to configure the radio.
///
/// This struct follows a builder pattern. Users should
/// start with the [`RadioConfig::default`] constructor, then mutate the object accordingly.
/// ```
/// use rf24link::{radio::RadioConfig, DataRate, PaLevel, PayloadMode};
///
/// let config = RadioConfig::default()
///     .with_channel(52)
///     .with_data_rate(DataRate::Mbps2)
///     .with_pa_level(PaLevel::Max)
///     .with_payload_mode(PayloadMode::Dynamic)
///     .with_auto_retries(15, 15);
/// assert!(config.validate().is_ok());
/// ```
///
/// Unlike the radio's registers, the builder never clamps a value.
/// Out-of-range values are kept as given and reported by [`RadioConfig::validate()`]
/// (which [`EsbConfigure::configure()`](fn@crate::radio::prelude::EsbConfigure::configure)
/// calls before writing anything).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioConfig {
    channel: u8,
    data_rate: DataRate,
    pa_level: PaLevel,
    lna_enable: bool,
    crc_length: CrcLength,
    address_width: u8,
    payload_mode: PayloadMode,
    auto_ack: bool,
    retransmit_delay: u8,
    retransmit_count: u8,
}

impl Default for RadioConfig {
    /// Instantiate a [`RadioConfig`] object with library defaults.
    ///
    /// | feature | default value |
    /// |--------:|:--------------|
    /// | [`RadioConfig::channel()`] | `76` |
    /// | [`RadioConfig::data_rate()`] | [`DataRate::Mbps1`] |
    /// | [`RadioConfig::pa_level()`] | [`PaLevel::Max`] |
    /// | [`RadioConfig::lna_enable()`] | `true` |
    /// | [`RadioConfig::crc_length()`] | [`CrcLength::Bit16`] |
    /// | [`RadioConfig::address_width()`] | `5` |
    /// | [`RadioConfig::payload_mode()`] | [`PayloadMode::Fixed`]`(32)` |
    /// | [`RadioConfig::auto_ack()`] | `true` |
    /// | [`RadioConfig::retransmit_delay()`] | `5` (1500 microseconds) |
    /// | [`RadioConfig::retransmit_count()`] | `15` |
    fn default() -> Self {
        Self {
            channel: 76,
            data_rate: DataRate::Mbps1,
            pa_level: PaLevel::Max,
            lna_enable: true,
            crc_length: CrcLength::Bit16,
            address_width: 5,
            payload_mode: PayloadMode::Fixed(32),
            auto_ack: true,
            retransmit_delay: 5,
            retransmit_count: 15,
        }
    }
}

impl RadioConfig {
    /// The highest RF channel supported by the nRF24L01.
    pub const MAX_CHANNEL: u8 = 125;
    /// The largest payload the radio's FIFOs can hold.
    pub const MAX_PAYLOAD_SIZE: u8 = 32;

    /// Check every field against the radio's documented ranges.
    ///
    /// Returns the first offending field as [`ConfigError::InvalidParameter`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel > Self::MAX_CHANNEL {
            return Err(ConfigError::InvalidParameter(ConfigField::Channel));
        }
        if !(3..=5).contains(&self.address_width) {
            return Err(ConfigError::InvalidParameter(ConfigField::AddressWidth));
        }
        if let PayloadMode::Fixed(size) = self.payload_mode {
            if size == 0 || size > Self::MAX_PAYLOAD_SIZE {
                return Err(ConfigError::InvalidParameter(ConfigField::PayloadSize));
            }
        }
        if self.retransmit_delay > 15 {
            return Err(ConfigError::InvalidParameter(ConfigField::RetransmitDelay));
        }
        if self.retransmit_count > 15 {
            return Err(ConfigError::InvalidParameter(ConfigField::RetransmitCount));
        }
        if self.auto_ack && self.crc_length == CrcLength::Disabled {
            return Err(ConfigError::InvalidParameter(ConfigField::CrcLength));
        }
        // DYNPD only takes effect on pipes with ENAA_Px set
        if !self.auto_ack && self.payload_mode == PayloadMode::Dynamic {
            return Err(ConfigError::InvalidParameter(ConfigField::AutoAck));
        }
        Ok(())
    }

    /// Returns the value set by [`RadioConfig::with_channel()`].
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// The RF channel, as an offset in MHz from 2400 MHz.
    ///
    /// Valid range is [0, 125].
    pub fn with_channel(self, channel: u8) -> Self {
        Self { channel, ..self }
    }

    /// Returns the value set by [`RadioConfig::with_data_rate()`].
    pub const fn data_rate(&self) -> DataRate {
        self.data_rate
    }

    /// The Data Rate (over the air).
    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        Self { data_rate, ..self }
    }

    /// Returns the value set by [`RadioConfig::with_pa_level()`].
    pub const fn pa_level(&self) -> PaLevel {
        self.pa_level
    }

    /// The Power Amplitude (PA) level.
    pub fn with_pa_level(self, pa_level: PaLevel) -> Self {
        Self { pa_level, ..self }
    }

    /// Returns the value set by [`RadioConfig::with_lna_enable()`].
    pub const fn lna_enable(&self) -> bool {
        self.lna_enable
    }

    /// Enable or disable the chip's Low Noise Amplifier (LNA) feature.
    ///
    /// This has no effect on nRF24L01+ modules; the bit is kept for older
    /// variants and clones (Si24R1).
    pub fn with_lna_enable(self, lna_enable: bool) -> Self {
        Self { lna_enable, ..self }
    }

    /// Returns the value set by [`RadioConfig::with_crc_length()`].
    pub const fn crc_length(&self) -> CrcLength {
        self.crc_length
    }

    /// The Cyclical Redundancy Checksum (CRC) length.
    pub fn with_crc_length(self, crc_length: CrcLength) -> Self {
        Self { crc_length, ..self }
    }

    /// Returns the value set by [`RadioConfig::with_address_width()`].
    pub const fn address_width(&self) -> u8 {
        self.address_width
    }

    /// The address width shared by every pipe.
    ///
    /// Valid range is [3, 5].
    pub fn with_address_width(self, address_width: u8) -> Self {
        Self {
            address_width,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_payload_mode()`].
    pub const fn payload_mode(&self) -> PayloadMode {
        self.payload_mode
    }

    /// Fixed or dynamic payload lengths.
    ///
    /// The dynamic payload feature uses 2 coupled registers (FEATURE and DYNPD)
    /// which are always written together. Dynamic payloads require auto-ack.
    pub fn with_payload_mode(self, payload_mode: PayloadMode) -> Self {
        Self {
            payload_mode,
            ..self
        }
    }

    /// Returns the value set by [`RadioConfig::with_auto_ack()`].
    pub const fn auto_ack(&self) -> bool {
        self.auto_ack
    }

    /// Enable or disable the auto-ack feature for all pipes.
    pub fn with_auto_ack(self, auto_ack: bool) -> Self {
        Self { auto_ack, ..self }
    }

    /// Returns the `delay` value set by [`RadioConfig::with_auto_retries()`].
    pub const fn retransmit_delay(&self) -> u8 {
        self.retransmit_delay
    }

    /// The `delay` value set by [`RadioConfig::with_auto_retries()`] in microseconds.
    pub const fn retransmit_delay_us(&self) -> u16 {
        (self.retransmit_delay as u16 + 1) * 250
    }

    /// Returns the `count` value set by [`RadioConfig::with_auto_retries()`].
    pub const fn retransmit_count(&self) -> u8 {
        self.retransmit_count
    }

    /// Set the hardware's auto-retransmit policy.
    ///
    /// - `delay` is a multiple of 250 microseconds, the time waited between
    ///   attempts is `(delay + 1) * 250` microseconds. Valid range is [0, 15].
    /// - `count` is the number of retransmissions before MAX_RT is asserted.
    ///   Valid range is [0, 15].
    pub fn with_auto_retries(self, delay: u8, count: u8) -> Self {
        Self {
            retransmit_delay: delay,
            retransmit_count: count,
            ..self
        }
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    use super::RadioConfig;
    use crate::{ConfigError, ConfigField, CrcLength, DataRate, PaLevel, PayloadMode};

    #[test]
    fn defaults_are_valid() {
        let config = RadioConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.channel(), 76);
        assert_eq!(config.data_rate(), DataRate::Mbps1);
        assert_eq!(config.pa_level(), PaLevel::Max);
        assert_eq!(config.payload_mode(), PayloadMode::Fixed(32));
        assert_eq!(config.retransmit_delay_us(), 1500);
        assert_eq!(config.retransmit_count(), 15);
    }

    #[test]
    fn builder_does_not_clamp() {
        let config = RadioConfig::default()
            .with_channel(200)
            .with_address_width(9);
        assert_eq!(config.channel(), 200);
        assert_eq!(config.address_width(), 9);
    }

    fn invalid(config: RadioConfig, field: ConfigField) {
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidParameter(field))
        );
    }

    #[test]
    fn out_of_range_fields() {
        let config = RadioConfig::default();
        invalid(config.with_channel(126), ConfigField::Channel);
        invalid(config.with_address_width(2), ConfigField::AddressWidth);
        invalid(config.with_address_width(6), ConfigField::AddressWidth);
        invalid(
            config.with_payload_mode(PayloadMode::Fixed(0)),
            ConfigField::PayloadSize,
        );
        invalid(
            config.with_payload_mode(PayloadMode::Fixed(33)),
            ConfigField::PayloadSize,
        );
        invalid(config.with_auto_retries(16, 0), ConfigField::RetransmitDelay);
        invalid(config.with_auto_retries(0, 16), ConfigField::RetransmitCount);
        invalid(
            config.with_crc_length(CrcLength::Disabled),
            ConfigField::CrcLength,
        );
        invalid(
            config
                .with_auto_ack(false)
                .with_payload_mode(PayloadMode::Dynamic),
            ConfigField::AutoAck,
        );
    }

    #[test]
    fn crc_disabled_without_auto_ack() {
        let config = RadioConfig::default()
            .with_auto_ack(false)
            .with_crc_length(CrcLength::Disabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn edges_are_valid() {
        let config = RadioConfig::default()
            .with_channel(125)
            .with_address_width(3)
            .with_payload_mode(PayloadMode::Fixed(1))
            .with_auto_retries(15, 0);
        assert!(config.validate().is_ok());
        assert_eq!(config.retransmit_delay_us(), 4000);
    }
}
