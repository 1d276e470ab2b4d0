use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard,
};

use super::prelude::EsbTransmit;
use crate::{SendError, SendOutcome};

/// A link that can be shared between threads.
///
/// Every call takes the inner lock, so operations are serialized.
/// [`SharedLink::send()`] does not wait for the lock when another send is in flight;
/// it returns [`SendError::Busy`] instead.
///
/// ```ignore
/// let link = std::sync::Arc::new(SharedLink::new(radio));
/// let worker = link.clone();
/// std::thread::spawn(move || worker.send(b"ping", 5000));
/// ```
pub struct SharedLink<L> {
    link: Mutex<L>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag, even if the send panics.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<L> SharedLink<L> {
    pub fn new(link: L) -> Self {
        Self {
            link: Mutex::new(link),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Take exclusive access to the link, waiting for any other holder.
    ///
    /// A lock poisoned by a panicking thread is recovered; the link's own
    /// state is always consistent between SPI transactions.
    pub fn lock(&self) -> MutexGuard<'_, L> {
        self.link
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Is a [`SharedLink::send()`] currently in progress?
    pub fn is_sending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn into_inner(self) -> L {
        self.link
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<L> SharedLink<L>
where
    L: EsbTransmit,
    L::TransmitErrorType: From<SendError>,
{
    /// Like [`EsbTransmit::send()`], but returns [`SendError::Busy`] immediately
    /// if another thread is already sending.
    pub fn send(&self, buf: &[u8], timeout_us: u32) -> Result<SendOutcome, L::TransmitErrorType> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SendError::Busy.into());
        }
        let _in_flight = InFlight(&self.in_flight);
        self.lock().send(buf, timeout_us)
    }

    /// See [`EsbTransmit::abort()`]. Waits for a blocking send to finish first.
    pub fn abort(&self) -> Result<(), L::TransmitErrorType> {
        self.lock().abort()
    }
}
