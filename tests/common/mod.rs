//! A register-level simulation of the nRF24L01, driven through the same
//! embedded-hal traits as real hardware.
#![allow(dead_code)]

use std::{
    collections::VecDeque,
    convert::Infallible,
    sync::{
        mpsc::{Receiver, Sender},
        Arc, Mutex, MutexGuard,
    },
};

use embedded_hal::{
    digital::{ErrorType as PinErrorType, OutputPin},
    spi::{ErrorType as SpiErrorType, Operation, SpiDevice},
};
use embedded_hal_mock::eh1::delay::NoopDelay;
use rf24link::radio::{registers, RF24Link};

const W_REGISTER: u8 = 0x20;
const R_RX_PL_WID: u8 = 0x60;
const R_RX_PAYLOAD: u8 = 0x61;
const W_TX_PAYLOAD: u8 = 0xA0;
const FLUSH_TX: u8 = 0xE1;
const FLUSH_RX: u8 = 0xE2;
const NOP: u8 = 0xFF;

const TX_DS: u8 = 0x20;
const MAX_RT: u8 = 0x10;
const RX_DR: u8 = 0x40;

/// What happens to the next payload put on air.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AirOutcome {
    /// The receiver acknowledges after `retransmits` retries.
    Ack { retransmits: u8 },
    /// Nobody answers; every retry is spent.
    NoAck,
    /// The radio never reports an outcome.
    Silent,
}

pub struct Chip {
    pub regs: [u8; 0x1E],
    pub tx_address: [u8; 5],
    pub rx_address_p0: [u8; 5],
    pub rx_address_p1: [u8; 5],
    pub tx_fifo: VecDeque<Vec<u8>>,
    pub rx_fifo: VecDeque<(u8, Vec<u8>)>,
    pub air: AirOutcome,
    /// Every payload put on air, in order.
    pub on_air: Vec<Vec<u8>>,
    /// Count of SPI transactions.
    pub transfers: usize,
    pub ce_high: bool,
}

impl Default for Chip {
    /// The register values after a power on reset.
    fn default() -> Self {
        let mut regs = [0u8; 0x1E];
        regs[registers::CONFIG as usize] = 0x08;
        regs[registers::EN_AA as usize] = 0x3F;
        regs[registers::EN_RXADDR as usize] = 0x03;
        regs[registers::SETUP_AW as usize] = 0x03;
        regs[registers::SETUP_RETR as usize] = 0x03;
        regs[registers::RF_CH as usize] = 0x02;
        regs[registers::RF_SETUP as usize] = 0x0F;
        regs[0x0C] = 0xC3;
        regs[0x0D] = 0xC4;
        regs[0x0E] = 0xC5;
        regs[0x0F] = 0xC6;
        Self {
            regs,
            tx_address: [0xE7; 5],
            rx_address_p0: [0xE7; 5],
            rx_address_p1: [0xC2; 5],
            tx_fifo: VecDeque::new(),
            rx_fifo: VecDeque::new(),
            air: AirOutcome::Ack { retransmits: 0 },
            on_air: Vec::new(),
            transfers: 0,
            ce_high: false,
        }
    }
}

impl Chip {
    pub fn reg(&self, addr: u8) -> u8 {
        self.regs[addr as usize]
    }

    fn status(&self) -> u8 {
        let pipe = self.rx_fifo.front().map_or(7, |(pipe, _)| *pipe);
        (self.regs[registers::STATUS as usize] & 0x70)
            | (pipe << 1)
            | (self.tx_fifo.len() >= 3) as u8
    }

    fn fifo_status(&self) -> u8 {
        let mut value = 0;
        if self.rx_fifo.is_empty() {
            value |= 1;
        }
        if self.rx_fifo.len() >= 3 {
            value |= 2;
        }
        if self.tx_fifo.is_empty() {
            value |= 0x10;
        }
        if self.tx_fifo.len() >= 3 {
            value |= 0x20;
        }
        value
    }

    fn address_mut(&mut self, addr: u8) -> Option<&mut [u8; 5]> {
        match addr {
            registers::TX_ADDR => Some(&mut self.tx_address),
            registers::RX_ADDR_P0 => Some(&mut self.rx_address_p0),
            registers::RX_ADDR_P1 => Some(&mut self.rx_address_p1),
            _ => None,
        }
    }

    fn read(&mut self, addr: u8, out: &mut [u8]) {
        let value = match addr {
            registers::STATUS => self.status(),
            registers::FIFO_STATUS => self.fifo_status(),
            _ => self.reg(addr),
        };
        match self.address_mut(addr) {
            Some(address) => {
                let len = out.len().min(5);
                out[..len].copy_from_slice(&address[..len]);
            }
            None => {
                if let Some(first) = out.first_mut() {
                    *first = value;
                }
            }
        }
    }

    fn write(&mut self, addr: u8, data: &[u8]) {
        if let Some(address) = self.address_mut(addr) {
            let len = data.len().min(5);
            address[..len].copy_from_slice(&data[..len]);
            return;
        }
        let Some(&value) = data.first() else {
            return;
        };
        match addr {
            // a 1 clears the flag
            registers::STATUS => self.regs[addr as usize] &= !(value & 0x70),
            registers::RF_CH => {
                self.regs[addr as usize] = value & 0x7F;
                // PLOS_CNT is reset by writing RF_CH
                self.regs[registers::OBSERVE_TX as usize] &= 0x0F;
            }
            registers::OBSERVE_TX | registers::FIFO_STATUS => (),
            _ => self.regs[addr as usize] = value,
        }
    }

    /// Handle one SPI transaction, replacing `buf` with the chip's response.
    fn transfer(&mut self, buf: &mut [u8]) {
        self.transfers += 1;
        let command = buf[0];
        let mut response = [0u8; 33];
        response[0] = self.status();
        let data_len = buf.len() - 1;
        match command {
            0x00..=0x1F => self.read(command, &mut response[1..buf.len()]),
            0x20..=0x3F => self.write(command & 0x1F, &buf[1..]),
            R_RX_PL_WID => {
                response[1] = self.rx_fifo.front().map_or(0, |(_, p)| p.len() as u8);
            }
            R_RX_PAYLOAD => {
                if let Some((_, payload)) = self.rx_fifo.pop_front() {
                    let len = payload.len().min(data_len);
                    response[1..=len].copy_from_slice(&payload[..len]);
                }
            }
            W_TX_PAYLOAD => {
                if self.tx_fifo.len() < 3 {
                    self.tx_fifo.push_back(buf[1..].to_vec());
                }
            }
            FLUSH_TX => self.tx_fifo.clear(),
            FLUSH_RX => self.rx_fifo.clear(),
            NOP => (),
            _ => panic!("unsupported command {command:#04X}"),
        }
        buf.copy_from_slice(&response[..buf.len()]);
    }

    /// A rising edge on CE while in PTX mode sends the head of the TX FIFO.
    fn ce_rising(&mut self) {
        let config = self.reg(registers::CONFIG);
        let powered_tx = config & 2 != 0 && config & 1 == 0;
        if !powered_tx {
            return;
        }
        let Some(payload) = self.tx_fifo.front().cloned() else {
            return;
        };
        let auto_ack = self.reg(registers::EN_AA) & 1 != 0;
        let observe = registers::OBSERVE_TX as usize;
        let status = registers::STATUS as usize;
        match (self.air, auto_ack) {
            (AirOutcome::Silent, _) => (),
            (AirOutcome::Ack { retransmits }, true) => {
                self.on_air.push(payload);
                self.tx_fifo.pop_front();
                self.regs[observe] = (self.regs[observe] & 0xF0) | (retransmits & 0xF);
                self.regs[status] |= TX_DS;
            }
            (_, false) => {
                self.on_air.push(payload);
                self.tx_fifo.pop_front();
                self.regs[observe] &= 0xF0;
                self.regs[status] |= TX_DS;
            }
            (AirOutcome::NoAck, true) => {
                self.on_air.push(payload);
                // the payload stays in the FIFO after MAX_RT
                let count = self.reg(registers::SETUP_RETR) & 0xF;
                let lost = ((self.regs[observe] >> 4) + 1).min(15);
                self.regs[observe] = (lost << 4) | count;
                self.regs[status] |= MAX_RT;
            }
        }
    }

    /// Put a payload in the RX FIFO, as if it was received on `pipe`.
    pub fn deliver(&mut self, pipe: u8, payload: &[u8]) {
        self.rx_fifo.push_back((pipe, payload.to_vec()));
        self.regs[registers::STATUS as usize] |= RX_DR;
    }
}

pub type SharedChip = Arc<Mutex<Chip>>;

pub fn lock(chip: &SharedChip) -> MutexGuard<'_, Chip> {
    chip.lock().unwrap()
}

/// Pauses the SPI bus right after a payload upload.
pub struct Gate {
    pub entered: Sender<()>,
    pub release: Receiver<()>,
}

pub struct SimSpi {
    chip: SharedChip,
    gate: Option<Gate>,
}

impl SpiErrorType for SimSpi {
    type Error = Infallible;
}

impl SpiDevice for SimSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        for operation in operations {
            if let Operation::TransferInPlace(buf) = operation {
                let is_upload = buf.first() == Some(&W_TX_PAYLOAD);
                lock(&self.chip).transfer(buf);
                if let (true, Some(gate)) = (is_upload, &self.gate) {
                    gate.entered.send(()).unwrap();
                    gate.release.recv().unwrap();
                }
            }
        }
        Ok(())
    }
}

pub struct SimCe {
    chip: SharedChip,
}

impl PinErrorType for SimCe {
    type Error = Infallible;
}

impl OutputPin for SimCe {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        lock(&self.chip).ce_high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut chip = lock(&self.chip);
        if !chip.ce_high {
            chip.ce_high = true;
            chip.ce_rising();
        }
        Ok(())
    }
}

pub type SimLink = RF24Link<SimSpi, SimCe, NoopDelay>;

pub fn sim_link(gate: Option<Gate>) -> (SimLink, SharedChip) {
    let chip = Arc::new(Mutex::new(Chip::default()));
    let spi = SimSpi {
        chip: chip.clone(),
        gate,
    };
    let ce_pin = SimCe { chip: chip.clone() };
    (RF24Link::new(ce_pin, spi, NoopDelay::new()), chip)
}
