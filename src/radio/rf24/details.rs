use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use super::{Nrf24Error, RF24Link};
use crate::radio::prelude::EsbDetails;

#[cfg(any(feature = "defmt", feature = "std"))]
use crate::radio::prelude::EsbTelemetry;

#[cfg(feature = "std")]
extern crate std;

impl<SPI, DO, DELAY, IRQ> EsbDetails for RF24Link<SPI, DO, DELAY, IRQ>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
    IRQ: InputPin,
{
    type DetailsErrorType = Nrf24Error<SPI::Error, DO::Error>;

    #[cfg(all(feature = "defmt", not(feature = "std")))]
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType> {
        use defmt::Display2Format;

        let dump = self.dump_registers()?;
        let config = dump.radio_config();
        defmt::println!(
            "Channel___________________{=u8} ~ {=u16} MHz",
            config.channel(),
            config.channel() as u16 + 2400u16
        );
        defmt::println!(
            "RF Data Rate______________{}",
            Display2Format(&config.data_rate())
        );
        defmt::println!(
            "RF Power Amplifier________{}",
            Display2Format(&config.pa_level())
        );
        defmt::println!("RF LNA enabled____________{=bool}", config.lna_enable());
        defmt::println!(
            "CRC Length________________{}",
            Display2Format(&config.crc_length())
        );
        defmt::println!(
            "Address length____________{=u8} bytes",
            config.address_width()
        );
        defmt::println!(
            "Payload lengths___________{}",
            Display2Format(&config.payload_mode())
        );
        defmt::println!(
            "Auto retry delay__________{=u16} microseconds",
            config.retransmit_delay_us()
        );
        defmt::println!(
            "Auto retry attempts_______{=u8} maximum",
            config.retransmit_count()
        );
        let (lost, retries) = dump.observe_tx();
        defmt::println!(
            "Packets lost\n    on current channel____{=u8}",
            lost
        );
        defmt::println!(
            "Retry attempts made\n    for last transmission_{=u8}",
            retries
        );
        defmt::println!("{}", dump.status());
        defmt::println!(
            "TX FIFO___________________{}",
            Display2Format(&dump.fifo_state(true))
        );
        defmt::println!(
            "RX FIFO___________________{}",
            Display2Format(&dump.fifo_state(false))
        );
        defmt::println!("Auto Acknowledgment_______{=bool}", config.auto_ack());
        defmt::println!("TX address________________{=[u8]:02X}", dump.tx_address());
        Ok(())
    }

    #[cfg(not(any(feature = "defmt", feature = "std")))]
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType> {
        Ok(())
    }

    #[cfg(feature = "std")]
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType> {
        let dump = self.dump_registers()?;
        let config = dump.radio_config();
        let channel = config.channel();
        std::println!(
            "Channel___________________{channel} ~ {} MHz",
            channel as u16 + 2400u16
        );
        std::println!("RF Data Rate______________{}", config.data_rate());
        std::println!("RF Power Amplifier________{}", config.pa_level());
        std::println!("RF LNA enabled____________{}", config.lna_enable());
        std::println!("CRC Length________________{}", config.crc_length());
        std::println!(
            "Address length____________{} bytes",
            config.address_width()
        );
        std::println!("Payload lengths___________{}", config.payload_mode());
        std::println!(
            "Auto retry delay__________{} microseconds",
            config.retransmit_delay_us()
        );
        std::println!(
            "Auto retry attempts_______{} maximum",
            config.retransmit_count()
        );
        let (lost, retries) = dump.observe_tx();
        std::println!("Packets lost\n    on current channel____{lost}");
        std::println!("Retry attempts made\n    for last transmission_{retries}");
        std::println!("{}", dump.status());
        std::println!("TX FIFO___________________{}", dump.fifo_state(true));
        std::println!("RX FIFO___________________{}", dump.fifo_state(false));
        std::println!("Auto Acknowledgment_______{}", config.auto_ack());
        std::print!("TX address________________0x");
        for byte in dump.tx_address().iter().rev() {
            std::print!("{byte:02X}");
        }
        std::println!();
        std::print!("{dump}");
        Ok(())
    }
}
