use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use super::{registers, Nrf24Error, RF24Link};
use crate::{radio::prelude::EsbPipe, ConfigError, ConfigField};

impl<SPI, DO, DELAY, IRQ> RF24Link<SPI, DO, DELAY, IRQ>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    IRQ: InputPin,
{
    /// Copy an address that matches the configured width into a full size buffer.
    fn checked_address(&self, address: &[u8]) -> Result<[u8; 5], ConfigError> {
        let width = self.config.address_width();
        if address.len() != width as usize {
            return Err(ConfigError::AddressWidthMismatch {
                expected: width,
                actual: address.len(),
            });
        }
        let mut out = [0u8; 5];
        out[..address.len()].copy_from_slice(address);
        Ok(out)
    }

    /// Is RX pipe 0 currently reserved for receiving ACK packets?
    pub(super) fn pipe0_holds_tx_address(&self) -> bool {
        !self.config_reg.is_rx() && self.config.auto_ack() && self.tx_address.is_some()
    }
}

impl<SPI, DO, DELAY, IRQ> EsbPipe for RF24Link<SPI, DO, DELAY, IRQ>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    IRQ: InputPin,
{
    type PipeErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn open_writing_pipe(&mut self, address: &[u8]) -> Result<(), Self::PipeErrorType> {
        self.ensure_idle()?;
        let cached = self.checked_address(address)?;
        self.write_register_multi(registers::TX_ADDR, address)?;
        if self.config.auto_ack() {
            // ACK packets arrive on pipe 0 with the TX address
            self.write_register_multi(registers::RX_ADDR_P0, address)?;
            self.update_register(registers::EN_RXADDR, |pipes| pipes | 1)?;
        }
        self.tx_address = Some(cached);
        Ok(())
    }

    fn open_reading_pipe(&mut self, pipe: u8, address: &[u8]) -> Result<(), Self::PipeErrorType> {
        self.ensure_idle()?;
        if pipe > 5 {
            return Err(ConfigError::InvalidParameter(ConfigField::PipeId).into());
        }
        let cached = self.checked_address(address)?;
        self.rx_addresses[pipe as usize] = Some(cached);

        if pipe == 0 && self.pipe0_holds_tx_address() {
            // start_listening() applies it
            return Ok(());
        }
        if pipe < 2 {
            self.write_register_multi(registers::RX_ADDR_P0 + pipe, address)?;
        }
        // For pipes 2-5, only write the LSB
        else {
            self.write_register(registers::RX_ADDR_P0 + pipe, address[0])?;
        }
        self.update_register(registers::EN_RXADDR, |pipes| pipes | (1 << pipe))
    }

    fn close_pipe(&mut self, pipe: u8) -> Result<(), Self::PipeErrorType> {
        self.ensure_idle()?;
        if pipe > 5 {
            return Err(ConfigError::InvalidParameter(ConfigField::PipeId).into());
        }
        self.rx_addresses[pipe as usize] = None;
        if pipe == 0 && self.pipe0_holds_tx_address() {
            return Ok(());
        }
        self.update_register(registers::EN_RXADDR, |pipes| pipes & !(1 << pipe))
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{registers, EsbPipe};
    use crate::{
        radio::rf24::commands, spi_test_expects, test::mk_radio, ConfigError, ConfigField,
        Nrf24Error,
    };
    use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;
    use std::vec;

    #[test]
    fn open_reading_pipe5() {
        let spi_expectations = spi_test_expects![
            // open_reading_pipe(5)
            (
                vec![(registers::RX_ADDR_P0 + 5) | commands::W_REGISTER, 0x55u8],
                vec![0xEu8, 0u8],
            ),
            // set EN_RXADDR
            (vec![registers::EN_RXADDR, 0u8], vec![0xEu8, 1u8]),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 0x21u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let address = [0x55u8; 5];
        assert_eq!(
            radio.open_reading_pipe(9, &address),
            Err(Nrf24Error::Config(ConfigError::InvalidParameter(
                ConfigField::PipeId
            )))
        );
        radio.open_reading_pipe(5, &address).unwrap();
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn open_writing_pipe() {
        let mut expected_buf = [0x55u8; 6];
        expected_buf[0] = registers::TX_ADDR | commands::W_REGISTER;
        let mut p0_buf = [0x55u8; 6];
        p0_buf[0] = registers::RX_ADDR_P0 | commands::W_REGISTER;
        let mut response = [0u8; 6];
        response[0] = 0xEu8;
        let spi_expectations = spi_test_expects![
            (expected_buf.to_vec(), response.to_vec()),
            (p0_buf.to_vec(), response.to_vec()),
            (vec![registers::EN_RXADDR, 0u8], vec![0xEu8, 2u8]),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 3u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.open_writing_pipe(&[0x55u8; 5]).unwrap();
        assert_eq!(radio.tx_address(), Some([0x55u8; 5].as_slice()));
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn address_width_mismatch() {
        let mocks = mk_radio(&[], &[]);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let expected = Err(Nrf24Error::Config(ConfigError::AddressWidthMismatch {
            expected: 5,
            actual: 4,
        }));
        assert_eq!(radio.open_writing_pipe(b"Node"), expected);
        assert_eq!(radio.open_reading_pipe(1, b"Node"), expected);
        assert!(radio.tx_address().is_none());
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn pipe0_is_cached_while_reserved_for_acks() {
        let spi_expectations = spi_test_expects![
            (
                vec![registers::TX_ADDR | commands::W_REGISTER, 1, 2, 3, 4, 5],
                vec![0xEu8, 0, 0, 0, 0, 0],
            ),
            (
                vec![registers::RX_ADDR_P0 | commands::W_REGISTER, 1, 2, 3, 4, 5],
                vec![0xEu8, 0, 0, 0, 0, 0],
            ),
            (vec![registers::EN_RXADDR, 0u8], vec![0xEu8, 0u8]),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 1u8],
                vec![0xEu8, 0u8],
            ),
            // close_pipe(1)
            (vec![registers::EN_RXADDR, 0u8], vec![0xEu8, 3u8]),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 1u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.open_writing_pipe(&[1, 2, 3, 4, 5]).unwrap();
        // no bus traffic; the ACK address stays on pipe 0
        radio.open_reading_pipe(0, b"Prime").unwrap();
        assert_eq!(radio.rx_addresses[0], Some(*b"Prime"));
        radio.close_pipe(0).unwrap();
        assert!(radio.rx_addresses[0].is_none());
        radio.close_pipe(1).unwrap();
        spi.done();
        ce_pin.done();
    }
}
