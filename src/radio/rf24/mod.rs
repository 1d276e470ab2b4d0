use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin, OutputPin},
    spi::SpiDevice,
};

pub(crate) mod bit_fields;
mod bus;
mod configure;
mod constants;
mod details;
mod pipe;
mod receive;
mod status;
mod transmit;

use bit_fields::Config;
pub use bus::RawRegisters;
pub use constants::registers;
use constants::{commands, mnemonics, timing};

use super::RadioConfig;
use crate::{LinkState, LinkStatus, Nrf24Error, StatusFlags};

/// A stand-in for the radio's IRQ pin when it is not wired.
///
/// It always reports the IRQ as asserted, so the driver falls back to
/// reading the STATUS register over SPI on every poll.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoIrq;

impl ErrorType for NoIrq {
    type Error = core::convert::Infallible;
}

impl InputPin for NoIrq {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// A point-to-point link driver for the nRF24L01 transceiver.
///
/// The driver exclusively owns the SPI bus device, the CE pin, the (optional) IRQ pin
/// and every cached copy of the radio's state. All hardware access funnels through
/// a handful of private register functions, so the cached STATUS byte always
/// reflects the latest bus exchange.
///
/// The functionality is split over the [`Esb*` traits](mod@crate::radio::prelude):
///
/// | trait | component |
/// |------:|:----------|
/// | [`EsbConfigure`](crate::radio::prelude::EsbConfigure) | link configurator |
/// | [`EsbPipe`](crate::radio::prelude::EsbPipe) | pipe manager |
/// | [`EsbTransmit`](crate::radio::prelude::EsbTransmit) | transmit engine |
/// | [`EsbReceive`](crate::radio::prelude::EsbReceive) | receive path |
/// | [`EsbTelemetry`](crate::radio::prelude::EsbTelemetry) | status and telemetry |
pub struct RF24Link<SPI, DO, DELAY, IRQ = NoIrq> {
    spi: SPI,
    ce_pin: DO,
    irq_pin: IRQ,
    delay_impl: DELAY,
    buf: [u8; 33],
    status: StatusFlags,
    config: RadioConfig,
    config_reg: Config,
    telemetry: LinkStatus,
    state: LinkState,
    tx_address: Option<[u8; 5]>,
    rx_addresses: [Option<[u8; 5]>; 6],
}

impl<SPI, DO, DELAY> RF24Link<SPI, DO, DELAY, NoIrq>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Instantiate an [`RF24Link`] object for use on the specified
    /// `spi` bus with the given `ce_pin`.
    ///
    /// The radio's CSN pin (aka Chip Select pin) shall be defined
    /// when instantiating the [`SpiDevice`](trait@embedded_hal::spi::SpiDevice)
    /// object (passed to the `spi` parameter).
    ///
    /// Nothing is written to the radio until
    /// [`init()`](fn@crate::radio::prelude::EsbConfigure::init) or
    /// [`configure()`](fn@crate::radio::prelude::EsbConfigure::configure) is called.
    pub fn new(ce_pin: DO, spi: SPI, delay_impl: DELAY) -> Self {
        Self::with_irq(ce_pin, spi, delay_impl, NoIrq)
    }
}

impl<SPI, DO, DELAY, IRQ> RF24Link<SPI, DO, DELAY, IRQ>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    IRQ: InputPin,
{
    /// Like [`RF24Link::new()`] but also takes the radio's (active low) IRQ pin.
    ///
    /// While a payload is in flight the driver only reads the STATUS register
    /// once the IRQ pin is asserted. If reading the pin fails, STATUS is read anyway.
    pub fn with_irq(ce_pin: DO, spi: SPI, delay_impl: DELAY, irq_pin: IRQ) -> Self {
        Self {
            spi,
            ce_pin,
            irq_pin,
            delay_impl,
            buf: [0u8; 33],
            status: StatusFlags::from_bits(0),
            config: RadioConfig::default(),
            // 16 bit CRC, enable all IRQ, and power down as TX
            config_reg: Config::default(),
            telemetry: LinkStatus::default(),
            state: LinkState::Idle,
            tx_address: None,
            rx_addresses: [None; 6],
        }
    }

    /// The configuration last applied by
    /// [`configure()`](fn@crate::radio::prelude::EsbConfigure::configure).
    pub fn config(&self) -> &RadioConfig {
        &self.config
    }

    /// The transmit engine's current state.
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// The address given to the latest
    /// [`open_writing_pipe()`](fn@crate::radio::prelude::EsbPipe::open_writing_pipe).
    pub fn tx_address(&self) -> Option<&[u8]> {
        let width = self.config.address_width() as usize;
        self.tx_address.as_ref().map(|addr| &addr[..width])
    }

    /// Borrow the raw register interface.
    ///
    /// <div class="warning">
    ///
    /// This is an escape hatch. Writing registers behind the driver's back
    /// desynchronizes its cached configuration; prefer the
    /// [`Esb*` traits](mod@crate::radio::prelude).
    ///
    /// </div>
    pub fn raw(&mut self) -> RawRegisters<'_, SPI, DO, DELAY, IRQ> {
        RawRegisters::new(self)
    }

    /// Release the bus, pins and delay provider.
    pub fn release(self) -> (DO, SPI, DELAY, IRQ) {
        (self.ce_pin, self.spi, self.delay_impl, self.irq_pin)
    }

    /// Refuse to touch the radio while a payload is in flight.
    fn ensure_idle(&self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        match self.state {
            LinkState::Idle => Ok(()),
            LinkState::Transmitting => Err(crate::SendError::Busy.into()),
        }
    }

    fn set_ce(&mut self, high: bool) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        if high {
            self.ce_pin.set_high().map_err(Nrf24Error::Gpo)
        } else {
            self.ce_pin.set_low().map_err(Nrf24Error::Gpo)
        }
    }
}
