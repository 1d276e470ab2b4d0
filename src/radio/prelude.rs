//! This module defines the generic traits that may
//! need to imported to use radio implementations.
//!
//! Since rustc only compiles objects that are used,
//! it is convenient to import these traits with the `*` syntax.
//!
//! ```
//! use rf24link::radio::prelude::*;
//! ```

use crate::{LinkStatus, SendOutcome};

use super::{RadioConfig, RegisterDump};

/// A trait to represent the link configurator of an ESB capable transceiver.
pub trait EsbConfigure {
    type ConfigErrorType;

    /// Bring up the radio after power on (or an MCU reset).
    ///
    /// Waits for the radio to settle, powers it down, verifies the SPI wiring
    /// by reading back the CONFIG register, then applies
    /// [`RadioConfig::default()`] with [`EsbConfigure::configure()`].
    fn init(&mut self) -> Result<(), Self::ConfigErrorType>;

    /// Validate and apply a [`RadioConfig`].
    ///
    /// Configuration is all-or-nothing per call: every field is validated
    /// before the first register is written, so a rejected `config` leaves the
    /// previous configuration untouched.
    ///
    /// The radio is powered down, reconfigured, then powered up into
    /// standby-I mode. The call returns after the radio's fixed
    /// power up settle time.
    ///
    /// <div class="warning">
    ///
    /// Changing the address width while any pipe address is open is rejected
    /// with [`ConfigError::AddressWidthMismatch`](crate::ConfigError::AddressWidthMismatch).
    /// Close the pipes first.
    ///
    /// </div>
    fn configure(&mut self, config: &RadioConfig) -> Result<(), Self::ConfigErrorType>;
}

/// A trait to represent manipulation of data pipes
/// for an ESB capable transceiver.
pub trait EsbPipe {
    type PipeErrorType;

    /// Set the address used for transmitting.
    ///
    /// The `address` length must equal the configured address width.
    ///
    /// <div class="warning">
    ///
    /// When auto-ack is enabled, this also writes `address` to reading pipe 0
    /// and opens that pipe. The radio receives ACK packets on pipe 0, so this is
    /// required for acknowledgements to be recognized. A reading pipe 0 address
    /// given to [`EsbPipe::open_reading_pipe()`] is remembered and only applied
    /// while listening.
    ///
    /// </div>
    fn open_writing_pipe(&mut self, address: &[u8]) -> Result<(), Self::PipeErrorType>;

    /// Open a specified `pipe` for receiving data when radio is in RX mode.
    ///
    /// The `address` length must equal the configured address width and `pipe`
    /// must be in range [0, 5].
    ///
    /// ### About pipe addresses
    /// Pipes 0 and 1 will store a full address. Pipes 2-5 will technically
    /// only store a single byte (the first one), borrowing the remaining bytes from pipe 1.
    /// ```ignore
    /// let a = ["Prime", "2Node", "3Node", "4Node"];
    /// radio.open_reading_pipe(0, a[0].as_bytes()).unwrap(); // address used is "Prime"
    /// radio.open_reading_pipe(1, a[1].as_bytes()).unwrap(); // address used is "2Node"
    /// radio.open_reading_pipe(2, a[2].as_bytes()).unwrap(); // address used is "3Node"
    /// radio.open_reading_pipe(3, a[3].as_bytes()).unwrap(); // address used is "4Node"
    /// ```
    fn open_reading_pipe(&mut self, pipe: u8, address: &[u8]) -> Result<(), Self::PipeErrorType>;

    /// Close a specified pipe from receiving data when radio is in RX mode.
    fn close_pipe(&mut self, pipe: u8) -> Result<(), Self::PipeErrorType>;
}

/// A trait to represent the transmit engine of an ESB capable transceiver.
///
/// At most one payload is in flight per radio. The engine performs no
/// software retries; on-air retransmissions are configured with
/// [`RadioConfig::with_auto_retries()`].
pub trait EsbTransmit {
    type TransmitErrorType;

    /// Transmit a single payload and block until its outcome is known.
    ///
    /// - Returns a [`SendOutcome`] when the radio reports TX_DS.
    /// - Returns [`SendError::MaxRetransmitsExceeded`](crate::SendError::MaxRetransmitsExceeded)
    ///   when the radio reports MAX_RT. The payload is flushed so it cannot be resent.
    /// - Returns [`SendError::Timeout`](crate::SendError::Timeout) if neither flag was
    ///   observed within `timeout_us` microseconds. The radio is left as-is for
    ///   inspection; use [`EsbTransmit::abort()`] to discard the payload.
    ///
    /// The TX FIFO is flushed before the payload is uploaded.
    /// Payloads longer than 32 bytes (or than the fixed payload size) are
    /// rejected before the SPI bus is touched.
    fn send(&mut self, buf: &[u8], timeout_us: u32)
        -> Result<SendOutcome, Self::TransmitErrorType>;

    /// Upload a payload and pulse the CE pin, without waiting.
    ///
    /// Use [`EsbTransmit::poll_send()`] to observe the outcome.
    fn start_send(&mut self, buf: &[u8]) -> Result<(), Self::TransmitErrorType>;

    /// Check on the payload given to [`EsbTransmit::start_send()`].
    ///
    /// Returns `Ok(None)` while the outcome is still unknown.
    fn poll_send(&mut self) -> Result<Option<SendOutcome>, Self::TransmitErrorType>;

    /// Cancel whatever is in flight: drive CE low, flush the TX FIFO and clear
    /// the TX flags. The engine returns to
    /// [`LinkState::Idle`](crate::LinkState::Idle).
    fn abort(&mut self) -> Result<(), Self::TransmitErrorType>;
}

/// A trait to represent the receiving side of an ESB capable transceiver.
pub trait EsbReceive {
    type ReceiveErrorType;

    /// Put the radio into active RX mode.
    fn start_listening(&mut self) -> Result<(), Self::ReceiveErrorType>;

    /// Leave RX mode and return to standby-I (TX mode).
    fn stop_listening(&mut self) -> Result<(), Self::ReceiveErrorType>;

    /// Is the radio in RX mode?
    fn is_listening(&self) -> bool;

    /// Returns the pipe that received the next payload in the RX FIFO, if any.
    fn available(&mut self) -> Result<Option<u8>, Self::ReceiveErrorType>;

    /// Read the next payload into `buf` and return the number of bytes read.
    fn read(&mut self, buf: &mut [u8]) -> Result<u8, Self::ReceiveErrorType>;
}

/// A trait to represent the status and telemetry of an ESB capable transceiver.
pub trait EsbTelemetry {
    type TelemetryErrorType;

    /// Packets lost (MAX_RT events) since the channel was last written.
    fn get_packets_lost(&mut self) -> Result<u8, Self::TelemetryErrorType>;

    /// Reset the lost packet counter.
    ///
    /// <div class="warning">
    ///
    /// The radio has no dedicated reset for this counter. It is cleared as a side
    /// effect of writing the RF channel register, so this function reads the RF
    /// channel register and writes the same value back.
    ///
    /// </div>
    fn reset_packets_lost(&mut self) -> Result<(), Self::TelemetryErrorType>;

    /// Retransmissions spent on the latest payload.
    fn get_retransmits_used(&mut self) -> Result<u8, Self::TelemetryErrorType>;

    /// Read every documented register.
    fn dump_registers(&mut self) -> Result<RegisterDump, Self::TelemetryErrorType>;

    /// Refresh the cached STATUS byte (which is also saved from every SPI transaction).
    fn update(&mut self) -> Result<(), Self::TelemetryErrorType>;

    /// The counters and flags observed by the latest SPI transactions.
    fn link_status(&self) -> LinkStatus;
}

/// A trait to represent debug output of an ESB capable transceiver.
pub trait EsbDetails {
    type DetailsErrorType;

    /// Print details about the radio's current configuration.
    ///
    /// This function only prints output with the `std` feature (via `std::println!`)
    /// or the `defmt` feature (via `defmt::println!`) enabled.
    fn print_details(&mut self) -> Result<(), Self::DetailsErrorType>;
}
