use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use super::{
    bit_fields::{Config, Feature, RfSetup, SetupRetry},
    commands, mnemonics, registers, timing, Nrf24Error, RF24Link,
};
use crate::{
    radio::{prelude::EsbConfigure, RadioConfig},
    ConfigError, PayloadMode, StatusFlags,
};

impl<SPI, DO, DELAY, IRQ> RF24Link<SPI, DO, DELAY, IRQ>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    IRQ: InputPin,
{
    /// Drive CE low and clear the PWR_UP bit.
    pub(super) fn power_down(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self.set_ce(false)?;
        self.config_reg = self.config_reg.with_power(false);
        self.write_register(registers::CONFIG, self.config_reg.into_bits())
    }

    /// Any address cached with the current width must keep matching it.
    fn check_width_change(&self, width: u8) -> Result<(), ConfigError> {
        let current = self.config.address_width();
        let has_addresses =
            self.tx_address.is_some() || self.rx_addresses.iter().any(Option::is_some);
        if width != current && has_addresses {
            return Err(ConfigError::AddressWidthMismatch {
                expected: current,
                actual: width as usize,
            });
        }
        Ok(())
    }
}

impl<SPI, DO, DELAY, IRQ> EsbConfigure for RF24Link<SPI, DO, DELAY, IRQ>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    IRQ: InputPin,
{
    type ConfigErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn init(&mut self) -> Result<(), Self::ConfigErrorType> {
        // configuration bits may not stick unless the radio had time to settle,
        // after power on and after an MCU reset alike
        self.delay_impl.delay_us(timing::POWER_UP_SETTLE_US);

        self.power_down()?;
        if self.read_register(registers::CONFIG)? != self.config_reg.into_bits() {
            #[cfg(feature = "defmt")]
            defmt::warn!("CONFIG read back does not match; check the SPI wiring");
            return Err(Nrf24Error::BinaryCorruption);
        }
        self.configure(&RadioConfig::default())
    }

    fn configure(&mut self, config: &RadioConfig) -> Result<(), Self::ConfigErrorType> {
        self.ensure_idle()?;
        config.validate()?;
        self.check_width_change(config.address_width())?;

        // leaves RX mode too
        self.config_reg = self.config_reg.with_is_rx(false);
        self.power_down()?;
        self.clear_flags(StatusFlags::IRQ_MASK)?;
        self.command(commands::FLUSH_RX)?;
        self.command(commands::FLUSH_TX)?;

        self.write_register(registers::SETUP_AW, config.address_width() - 2)?;
        let retries = SetupRetry::new()
            .with_ard(config.retransmit_delay())
            .with_arc(config.retransmit_count());
        self.write_register(registers::SETUP_RETR, retries.into_bits())?;
        self.write_register(
            registers::EN_AA,
            if config.auto_ack() {
                mnemonics::ALL_PIPES
            } else {
                0
            },
        )?;
        self.write_register(registers::RF_CH, config.channel())?;
        let rf_setup = RfSetup::new()
            .with_data_rate(config.data_rate())
            .with_pa_level(config.pa_level())
            .with_lna_enable(config.lna_enable());
        self.write_register(registers::RF_SETUP, rf_setup.into_bits())?;

        // FEATURE and DYNPD are coupled; the radio ignores DYNPD without EN_DPL
        match config.payload_mode() {
            PayloadMode::Dynamic => {
                let feature = Feature::from_bits(0).with_dynamic_payloads(true);
                self.write_register(registers::FEATURE, feature.into_bits())?;
                self.write_register(registers::DYNPD, mnemonics::ALL_PIPES)?;
            }
            PayloadMode::Fixed(size) => {
                self.write_register(registers::DYNPD, 0)?;
                self.write_register(registers::FEATURE, 0)?;
                for pipe in 0..6 {
                    self.write_register(registers::RX_PW_P0 + pipe, size)?;
                }
            }
        }

        // Set CONFIG register:
        //      Set all IRQ events on IRQ pin
        //      Set CRC length
        //      Power up
        //      Enable PTX
        // CE stays low so the radio remains in standby-I mode.
        self.config_reg = Config::default()
            .with_crc_length(config.crc_length())
            .with_power(true);
        self.write_register(registers::CONFIG, self.config_reg.into_bits())?;
        self.delay_impl.delay_us(timing::POWER_UP_SETTLE_US);
        self.config = *config;

        if let (true, Some(address)) = (config.auto_ack(), self.tx_address) {
            let width = config.address_width() as usize;
            self.write_register_multi(registers::RX_ADDR_P0, &address[..width])?;
            self.update_register(registers::EN_RXADDR, |pipes| pipes | 1)?;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "configured channel {=u8} with {=u8} byte addresses",
            config.channel(),
            config.address_width()
        );
        Ok(())
    }
}
