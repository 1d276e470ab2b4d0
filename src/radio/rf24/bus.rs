use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use super::{commands, registers, RF24Link};
use crate::{ConfigError, ConfigField, Nrf24Error, StatusFlags};

type BusResult<T, SPI, DO> = Result<
    T,
    Nrf24Error<
        <SPI as embedded_hal::spi::ErrorType>::Error,
        <DO as embedded_hal::digital::ErrorType>::Error,
    >,
>;

/// The register interface. Every other component reaches the radio through these.
impl<SPI, DO, DELAY, IRQ> RF24Link<SPI, DO, DELAY, IRQ>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    IRQ: InputPin,
{
    /// Exchange the first `len` bytes of the internal buffer.
    ///
    /// The first byte clocked back is always the STATUS register,
    /// which refreshes the cached [`StatusFlags`] and link flags.
    fn spi_transfer(&mut self, len: u8) -> BusResult<(), SPI, DO> {
        self.spi
            .transfer_in_place(&mut self.buf[..len as usize])
            .map_err(Nrf24Error::Spi)?;
        self.status = StatusFlags::from_bits(self.buf[0]);
        self.telemetry.tx_fifo_full = self.status.tx_full();
        self.telemetry.rx_data_ready = self.status.rx_dr();
        Ok(())
    }

    /// Send a command that is followed by `len` dummy bytes.
    ///
    /// The response is stored in `self.buf[1..=len]`.
    pub(super) fn spi_read(&mut self, len: u8, command: u8) -> BusResult<(), SPI, DO> {
        self.buf[0] = command;
        self.buf[1..=len as usize].fill(0);
        self.spi_transfer(len + 1)
    }

    /// Send a 1 byte command, like `FLUSH_TX` or `NOP`.
    pub(crate) fn command(&mut self, command: u8) -> BusResult<(), SPI, DO> {
        self.spi_read(0, command)
    }

    /// Send a command followed by `data`.
    pub(super) fn spi_write_command(&mut self, command: u8, data: &[u8]) -> BusResult<(), SPI, DO> {
        let len = data.len();
        self.buf[0] = command;
        self.buf[1..=len].copy_from_slice(data);
        self.spi_transfer(len as u8 + 1)
    }

    /// Upload `data` to the TX FIFO, zero padded to `padded_len` bytes.
    pub(super) fn write_payload(
        &mut self,
        data: &[u8],
        padded_len: usize,
    ) -> BusResult<(), SPI, DO> {
        let len = data.len();
        let padded_len = padded_len.max(len);
        self.buf[0] = commands::W_TX_PAYLOAD;
        self.buf[1..=len].copy_from_slice(data);
        self.buf[len + 1..=padded_len].fill(0);
        self.spi_transfer(padded_len as u8 + 1)
    }

    /// Read `len` bytes from the RX FIFO into the front of `out`.
    pub(super) fn read_payload(&mut self, out: &mut [u8], len: u8) -> BusResult<(), SPI, DO> {
        self.spi_read(len, commands::R_RX_PAYLOAD)?;
        let count = out.len().min(len as usize);
        out[..count].copy_from_slice(&self.buf[1..=count]);
        Ok(())
    }

    pub(super) fn read_register(&mut self, addr: u8) -> BusResult<u8, SPI, DO> {
        self.spi_read(1, addr)?;
        Ok(self.buf[1])
    }

    pub(super) fn write_register(&mut self, addr: u8, value: u8) -> BusResult<(), SPI, DO> {
        self.buf[0] = addr | commands::W_REGISTER;
        self.buf[1] = value;
        self.spi_transfer(2)
    }

    /// Read `out.len()` bytes (LSByte first) starting at register `addr`.
    pub(super) fn read_register_multi(
        &mut self,
        addr: u8,
        out: &mut [u8],
    ) -> BusResult<(), SPI, DO> {
        let len = out.len();
        self.spi_read(len as u8, addr)?;
        out.copy_from_slice(&self.buf[1..=len]);
        Ok(())
    }

    pub(super) fn write_register_multi(&mut self, addr: u8, data: &[u8]) -> BusResult<(), SPI, DO> {
        self.spi_write_command(addr | commands::W_REGISTER, data)
    }

    /// Read-modify-write a single register.
    pub(super) fn update_register(
        &mut self,
        addr: u8,
        op: impl FnOnce(u8) -> u8,
    ) -> BusResult<(), SPI, DO> {
        let value = self.read_register(addr)?;
        self.write_register(addr, op(value))
    }

    /// Clear the given IRQ flags (a `1` bit clears the flag).
    pub(super) fn clear_flags(&mut self, mask: u8) -> BusResult<(), SPI, DO> {
        self.write_register(registers::STATUS, mask & StatusFlags::IRQ_MASK)
    }
}

/// Raw access to the radio's registers.
///
/// Obtained from [`RF24Link::raw()`]. Register addresses above `0x1D`
/// and transfers longer than 32 bytes are rejected with
/// [`ConfigError::InvalidParameter`]. Writes are refused while a payload
/// is in flight.
pub struct RawRegisters<'a, SPI, DO, DELAY, IRQ> {
    link: &'a mut RF24Link<SPI, DO, DELAY, IRQ>,
}

impl<'a, SPI, DO, DELAY, IRQ> RawRegisters<'a, SPI, DO, DELAY, IRQ>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    IRQ: InputPin,
{
    pub(super) fn new(link: &'a mut RF24Link<SPI, DO, DELAY, IRQ>) -> Self {
        Self { link }
    }

    fn check(addr: u8, len: usize) -> Result<(), ConfigError> {
        if addr > registers::LAST {
            return Err(ConfigError::InvalidParameter(ConfigField::RegisterAddress));
        }
        if len > 32 {
            return Err(ConfigError::InvalidParameter(ConfigField::PayloadSize));
        }
        Ok(())
    }

    pub fn read_register(&mut self, addr: u8) -> BusResult<u8, SPI, DO> {
        Self::check(addr, 1)?;
        self.link.read_register(addr)
    }

    pub fn write_register(&mut self, addr: u8, value: u8) -> BusResult<(), SPI, DO> {
        Self::check(addr, 1)?;
        self.link.ensure_idle()?;
        self.link.write_register(addr, value)
    }

    /// Fill `out` with the bytes of a multi-byte register (LSByte first).
    pub fn read_register_multi(&mut self, addr: u8, out: &mut [u8]) -> BusResult<(), SPI, DO> {
        Self::check(addr, out.len())?;
        self.link.read_register_multi(addr, out)
    }

    pub fn write_register_multi(&mut self, addr: u8, data: &[u8]) -> BusResult<(), SPI, DO> {
        Self::check(addr, data.len())?;
        self.link.ensure_idle()?;
        self.link.write_register_multi(addr, data)
    }

    /// The STATUS byte observed by the latest SPI transaction.
    pub fn status(&self) -> StatusFlags {
        self.link.status
    }
}
