#![doc(
    html_logo_url = "https://raw.githubusercontent.com/nRF24/rf24-rs/main/docs/src/images/logo-square.png"
)]
#![doc(html_favicon_url = "https://github.com/nRF24/rf24-rs/raw/main/docs/src/images/favicon.ico")]
#![doc = include_str!("../README.md")]
//!
//! ## Link API
//!
//! - [`RF24Link::new()`](fn@crate::radio::RF24Link::new)
//! - [`RF24Link::with_irq()`](fn@crate::radio::RF24Link::with_irq)
//! - [`RF24Link::init()`](radio/struct.RF24Link.html#method.init)
//! - [`RF24Link::configure()`](radio/struct.RF24Link.html#method.configure)
//! - [`RF24Link::open_writing_pipe()`](radio/struct.RF24Link.html#method.open_writing_pipe)
//! - [`RF24Link::open_reading_pipe()`](radio/struct.RF24Link.html#method.open_reading_pipe)
//! - [`RF24Link::close_pipe()`](radio/struct.RF24Link.html#method.close_pipe)
//! - [`RF24Link::send()`](radio/struct.RF24Link.html#method.send)
//! - [`RF24Link::get_packets_lost()`](radio/struct.RF24Link.html#method.get_packets_lost)
//! - [`RF24Link::reset_packets_lost()`](radio/struct.RF24Link.html#method.reset_packets_lost)
//! - [`RF24Link::get_retransmits_used()`](radio/struct.RF24Link.html#method.get_retransmits_used)
//!
//! ## Advanced API
//!
//! - [`RF24Link::start_send()`](radio/struct.RF24Link.html#method.start_send)
//! - [`RF24Link::poll_send()`](radio/struct.RF24Link.html#method.poll_send)
//! - [`RF24Link::abort()`](radio/struct.RF24Link.html#method.abort)
//! - [`RF24Link::start_listening()`](radio/struct.RF24Link.html#method.start_listening)
//! - [`RF24Link::stop_listening()`](radio/struct.RF24Link.html#method.stop_listening)
//! - [`RF24Link::available()`](radio/struct.RF24Link.html#method.available)
//! - [`RF24Link::read()`](radio/struct.RF24Link.html#method.read)
//! - [`RF24Link::dump_registers()`](radio/struct.RF24Link.html#method.dump_registers)
//! - [`RF24Link::link_status()`](radio/struct.RF24Link.html#method.link_status)
//! - [`RF24Link::update()`](radio/struct.RF24Link.html#method.update)
//! - [`RF24Link::print_details()`](radio/struct.RF24Link.html#method.print_details)
//! - [`RF24Link::raw()`](fn@crate::radio::RF24Link::raw)
//!
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod error;
pub use error::{ConfigError, ConfigField, Nrf24Error, SendError};
mod types;
pub use types::{
    CrcLength, DataRate, FifoState, LinkState, LinkStatus, PaLevel, PayloadMode, SendOutcome,
    StatusFlags,
};
pub mod radio;
