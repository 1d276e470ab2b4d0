use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use super::{commands, registers, Nrf24Error, RF24Link};
use crate::{
    radio::{prelude::EsbTelemetry, RegisterDump},
    LinkStatus,
};

impl<SPI, DO, DELAY, IRQ> EsbTelemetry for RF24Link<SPI, DO, DELAY, IRQ>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    IRQ: InputPin,
{
    type TelemetryErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn get_packets_lost(&mut self) -> Result<u8, Self::TelemetryErrorType> {
        Ok(self.observe_tx()?.plos_cnt())
    }

    fn reset_packets_lost(&mut self) -> Result<(), Self::TelemetryErrorType> {
        self.ensure_idle()?;
        // writing RF_CH clears PLOS_CNT; write back what the radio is tuned to
        let channel = self.read_register(registers::RF_CH)?;
        self.write_register(registers::RF_CH, channel)?;
        self.telemetry.packets_lost = 0;
        Ok(())
    }

    fn get_retransmits_used(&mut self) -> Result<u8, Self::TelemetryErrorType> {
        Ok(self.observe_tx()?.arc_cnt())
    }

    fn dump_registers(&mut self) -> Result<RegisterDump, Self::TelemetryErrorType> {
        let mut values = [0u8; registers::DOCUMENTED.len()];
        for (value, addr) in values.iter_mut().zip(registers::DOCUMENTED) {
            *value = self.read_register(addr)?;
        }
        // SETUP_AW is the 4th documented register
        let width = ((values[3] & 3) + 2) as usize;
        let mut tx_address = [0u8; 5];
        let mut rx_address_p0 = [0u8; 5];
        let mut rx_address_p1 = [0u8; 5];
        self.read_register_multi(registers::TX_ADDR, &mut tx_address[..width])?;
        self.read_register_multi(registers::RX_ADDR_P0, &mut rx_address_p0[..width])?;
        self.read_register_multi(registers::RX_ADDR_P1, &mut rx_address_p1[..width])?;
        Ok(RegisterDump::new(
            values,
            tx_address,
            rx_address_p0,
            rx_address_p1,
        ))
    }

    fn update(&mut self) -> Result<(), Self::TelemetryErrorType> {
        self.command(commands::NOP)
    }

    fn link_status(&self) -> LinkStatus {
        self.telemetry
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{commands, registers, EsbTelemetry};
    use crate::{
        radio::RadioConfig, spi_test_expects, test::mk_radio, LinkState, LinkStatus, Nrf24Error,
        SendError,
    };
    use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;
    use std::{vec, vec::Vec};

    #[test]
    fn observe_tx_counters() {
        let spi_expectations = spi_test_expects![
            (vec![registers::OBSERVE_TX, 0u8], vec![0xEu8, 0x25u8]),
            (vec![registers::OBSERVE_TX, 0u8], vec![0xEu8, 0x25u8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert_eq!(radio.get_packets_lost(), Ok(2));
        assert_eq!(radio.get_retransmits_used(), Ok(5));
        assert_eq!(
            radio.link_status(),
            LinkStatus {
                packets_lost: 2,
                retransmits_for_last_packet: 5,
                tx_fifo_full: false,
                rx_data_ready: false,
            }
        );
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn reset_packets_lost() {
        // the chip still holds its power-on channel; it must not be retuned
        let spi_expectations = spi_test_expects![
            (vec![registers::RF_CH, 0u8], vec![0xEu8, 2u8]),
            (
                vec![registers::RF_CH | commands::W_REGISTER, 2u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.config = RadioConfig::default().with_channel(52);
        radio.telemetry.packets_lost = 4;
        radio.reset_packets_lost().unwrap();
        assert_eq!(radio.link_status().packets_lost, 0);

        radio.state = LinkState::Transmitting;
        assert_eq!(
            radio.reset_packets_lost(),
            Err(Nrf24Error::Send(SendError::Busy))
        );
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn update() {
        let spi_expectations = spi_test_expects![(vec![commands::NOP], vec![0x41u8]),];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.update().unwrap();
        let status = radio.link_status();
        assert!(status.rx_data_ready);
        assert!(status.tx_fifo_full);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn dump_registers() {
        let mut spi_expectations = Vec::new();
        for addr in registers::DOCUMENTED {
            let value = match addr {
                registers::SETUP_AW => 1u8,
                registers::RF_CH => 76,
                _ => 0,
            };
            spi_expectations.extend(spi_test_expects![(vec![addr, 0u8], vec![0xEu8, value]),]);
        }
        for addr in [registers::TX_ADDR, registers::RX_ADDR_P0, registers::RX_ADDR_P1] {
            spi_expectations.extend(spi_test_expects![(
                vec![addr, 0u8, 0u8, 0u8],
                vec![0xEu8, 1u8, 2u8, 3u8]
            ),]);
        }
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let dump = radio.dump_registers().unwrap();
        assert_eq!(dump.address_width(), 3);
        assert_eq!(dump.get(registers::RF_CH), Some(76));
        assert_eq!(dump.tx_address(), &[1, 2, 3]);
        let mut address = [0u8; 3];
        dump.rx_address(1, &mut address);
        assert_eq!(address, [1, 2, 3]);
        spi.done();
        ce_pin.done();
    }
}
