use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use super::{commands, mnemonics, registers, timing, Nrf24Error, RF24Link};
use crate::{
    radio::{prelude::EsbReceive, RadioConfig},
    PayloadMode, StatusFlags,
};

impl<SPI, DO, DELAY, IRQ> EsbReceive for RF24Link<SPI, DO, DELAY, IRQ>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    IRQ: InputPin,
{
    type ReceiveErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn start_listening(&mut self) -> Result<(), Self::ReceiveErrorType> {
        self.ensure_idle()?;
        let was_powered = self.config_reg.power();
        self.config_reg = self.config_reg.with_is_rx(true).with_power(true);
        self.write_register(registers::CONFIG, self.config_reg.into_bits())?;
        if !was_powered {
            self.delay_impl.delay_us(timing::POWER_UP_SETTLE_US);
        }
        self.clear_flags(StatusFlags::IRQ_MASK)?;
        self.set_ce(true)?;

        // Restore the pipe0 address, if exists
        let width = self.config.address_width() as usize;
        if let Some(address) = self.rx_addresses[0] {
            self.write_register_multi(registers::RX_ADDR_P0, &address[..width])?;
            self.update_register(registers::EN_RXADDR, |pipes| pipes | 1)
        } else {
            self.update_register(registers::EN_RXADDR, |pipes| pipes & !1)
        }
    }

    fn stop_listening(&mut self) -> Result<(), Self::ReceiveErrorType> {
        self.set_ce(false)?;
        self.config_reg = self.config_reg.with_is_rx(false);
        self.write_register(registers::CONFIG, self.config_reg.into_bits())?;

        if let (true, Some(address)) = (self.pipe0_holds_tx_address(), self.tx_address) {
            let width = self.config.address_width() as usize;
            self.write_register_multi(registers::RX_ADDR_P0, &address[..width])?;
            self.update_register(registers::EN_RXADDR, |pipes| pipes | 1)?;
        }
        Ok(())
    }

    fn is_listening(&self) -> bool {
        self.config_reg.is_rx()
    }

    fn available(&mut self) -> Result<Option<u8>, Self::ReceiveErrorType> {
        let fifo = self.read_register(registers::FIFO_STATUS)?;
        if fifo & mnemonics::RX_EMPTY != 0 {
            return Ok(None);
        }
        // the STATUS byte clocked out with FIFO_STATUS names the pipe
        Ok(Some(self.status.rx_pipe()))
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<u8, Self::ReceiveErrorType> {
        let len = match self.config.payload_mode() {
            PayloadMode::Fixed(size) => size,
            PayloadMode::Dynamic => {
                let len = self.read_register(commands::R_RX_PL_WID)?;
                if len > RadioConfig::MAX_PAYLOAD_SIZE {
                    // a corrupt width; the payload cannot be trusted
                    #[cfg(feature = "defmt")]
                    defmt::warn!("discarding RX FIFO, payload width {=u8}", len);
                    self.command(commands::FLUSH_RX)?;
                    self.clear_flags(mnemonics::MASK_RX_DR)?;
                    return Ok(0);
                }
                len
            }
        };
        self.read_payload(buf, len)?;
        self.clear_flags(mnemonics::MASK_RX_DR)?;
        Ok((len as usize).min(buf.len()) as u8)
    }
}
