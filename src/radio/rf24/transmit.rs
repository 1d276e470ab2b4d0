use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use super::{
    bit_fields::ObserveTx, commands, mnemonics, registers, timing, Nrf24Error, RF24Link,
};
use crate::{
    radio::{prelude::EsbTransmit, RadioConfig},
    LinkState, PayloadMode, SendError, SendOutcome,
};

impl<SPI, DO, DELAY, IRQ> RF24Link<SPI, DO, DELAY, IRQ>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    IRQ: InputPin,
{
    /// Everything that can be rejected before touching the bus.
    fn check_send(&self, buf: &[u8]) -> Result<(), SendError> {
        if self.state == LinkState::Transmitting {
            return Err(SendError::Busy);
        }
        let len = buf.len();
        let fits = match self.config.payload_mode() {
            PayloadMode::Dynamic => len > 0 && len <= RadioConfig::MAX_PAYLOAD_SIZE as usize,
            PayloadMode::Fixed(size) => len <= size as usize,
        };
        if !fits {
            return Err(SendError::InvalidPayloadLength(len));
        }
        if self.config_reg.is_rx() {
            return Err(SendError::Listening);
        }
        Ok(())
    }

    /// Upload the payload and pulse CE. The payload must already be checked.
    fn upload_and_pulse(&mut self, buf: &[u8]) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self.set_ce(false)?;
        self.clear_flags(mnemonics::MASK_TX_DS | mnemonics::MASK_MAX_RT)?;
        if self.status.tx_full() {
            return Err(SendError::FifoFull.into());
        }
        let padded_len = match self.config.payload_mode() {
            PayloadMode::Fixed(size) => size as usize,
            PayloadMode::Dynamic => buf.len(),
        };
        self.write_payload(buf, padded_len)?;

        // a CE pulse of at least 10us starts one transmission from standby-I
        self.set_ce(true)?;
        self.delay_impl.delay_us(timing::CE_PULSE_US);
        self.set_ce(false)?;
        self.state = LinkState::Transmitting;
        Ok(())
    }

    /// Read OBSERVE_TX and latch its counters into the telemetry.
    pub(super) fn observe_tx(&mut self) -> Result<ObserveTx, Nrf24Error<SPI::Error, DO::Error>> {
        let observed = ObserveTx::from_bits(self.read_register(registers::OBSERVE_TX)?);
        self.telemetry.packets_lost = observed.plos_cnt();
        self.telemetry.retransmits_for_last_packet = observed.arc_cnt();
        Ok(observed)
    }

    /// Is the IRQ pin asserted? A pin that cannot be read counts as asserted.
    fn irq_asserted(&mut self) -> bool {
        self.irq_pin.is_low().unwrap_or(true)
    }
}

impl<SPI, DO, DELAY, IRQ> EsbTransmit for RF24Link<SPI, DO, DELAY, IRQ>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    IRQ: InputPin,
{
    type TransmitErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn send(
        &mut self,
        buf: &[u8],
        timeout_us: u32,
    ) -> Result<SendOutcome, Self::TransmitErrorType> {
        self.check_send(buf)?;
        self.command(commands::FLUSH_TX)?;
        self.upload_and_pulse(buf)?;

        let mut elapsed = 0u32;
        loop {
            let polled = self.poll_send();
            if polled.is_err() {
                // a failed exchange ends this send; abort() discards the payload
                self.state = LinkState::Idle;
            }
            if let Some(outcome) = polled? {
                return Ok(outcome);
            }
            if elapsed >= timeout_us {
                // the payload may still be in the TX FIFO; abort() discards it
                self.state = LinkState::Idle;
                #[cfg(feature = "defmt")]
                defmt::warn!("no TX outcome after {=u32} us", elapsed);
                return Err(SendError::Timeout.into());
            }
            self.delay_impl.delay_us(timing::POLL_INTERVAL_US);
            elapsed = elapsed.saturating_add(timing::POLL_INTERVAL_US);
        }
    }

    fn start_send(&mut self, buf: &[u8]) -> Result<(), Self::TransmitErrorType> {
        self.check_send(buf)?;
        self.upload_and_pulse(buf)
    }

    fn poll_send(&mut self) -> Result<Option<SendOutcome>, Self::TransmitErrorType> {
        if self.state == LinkState::Idle {
            return Err(SendError::NotTransmitting.into());
        }
        if !self.irq_asserted() {
            return Ok(None);
        }
        self.command(commands::NOP)?;
        if self.status.tx_ds() {
            self.state = LinkState::Idle;
            self.clear_flags(mnemonics::MASK_TX_DS)?;
            let observed = self.observe_tx()?;
            #[cfg(feature = "defmt")]
            defmt::debug!("TX_DS after {=u8} retransmits", observed.arc_cnt());
            return Ok(Some(SendOutcome {
                retransmits_used: observed.arc_cnt(),
            }));
        }
        if self.status.max_rt() {
            self.state = LinkState::Idle;
            // the failed payload stays in the FIFO until flushed
            self.command(commands::FLUSH_TX)?;
            self.clear_flags(mnemonics::MASK_MAX_RT)?;
            let _observed = self.observe_tx()?;
            #[cfg(feature = "defmt")]
            defmt::warn!("MAX_RT, {=u8} packets lost", _observed.plos_cnt());
            return Err(SendError::MaxRetransmitsExceeded.into());
        }
        Ok(None)
    }

    fn abort(&mut self) -> Result<(), Self::TransmitErrorType> {
        self.set_ce(false)?;
        self.command(commands::FLUSH_TX)?;
        self.clear_flags(mnemonics::MASK_TX_DS | mnemonics::MASK_MAX_RT)?;
        self.state = LinkState::Idle;
        #[cfg(feature = "defmt")]
        defmt::debug!("transmission aborted");
        Ok(())
    }
}
