//! A one-shot readiness signal for resources that load in the background.
//!
//! The loader holds the [`ReadinessSignal`] and drops it (or calls [`ReadinessSignal::complete`]) once loading
//! has finished, successfully or not. Any number of [`Readiness`] clones may wait on it; once complete, it stays
//! complete.

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use thiserror::Error;

pub struct ReadinessSignal {
    _sender: Sender<()>,
}

impl ReadinessSignal {
    pub fn complete(self) {}
}

#[derive(Debug, Clone)]
pub struct Readiness {
    receiver: Receiver<()>,
}

pub fn readiness() -> (ReadinessSignal, Readiness) {
    let (sender, receiver) = bounded(0);

    let signal = ReadinessSignal {
        _sender: sender,
    };

    (signal, Readiness {
        receiver,
    })
}

impl Readiness {
    /// Already complete, for resources that need no loading.
    pub fn ready() -> Self {
        let (signal, readiness) = readiness();
        signal.complete();
        readiness
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.receiver.try_recv(), Err(TryRecvError::Disconnected) | Ok(()))
    }

    /// Blocks until complete, for at most `timeout`.
    pub fn wait(&self, timeout: Duration) -> Result<(), ReadinessError> {
        match self.receiver.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => Ok(()),
            Err(RecvTimeoutError::Timeout) => Err(ReadinessError::TimedOut(timeout)),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadinessError {
    #[error("Timed out waiting for readiness. timeout: {0:?}")]
    TimedOut(Duration),
}

#[cfg(test)]
mod readiness_tests {
    use std::thread;
    use std::time::Duration;

    use crate::readiness::{readiness, Readiness, ReadinessError};

    #[test]
    fn ready_is_immediately_complete() {
        // given
        let readiness = Readiness::ready();

        // expect
        assert!(readiness.is_ready());
        assert_eq!(readiness.wait(Duration::from_millis(1)), Ok(()));
    }

    #[test]
    fn pending_readiness_times_out() {
        // given
        let (_signal, readiness) = readiness();

        // when
        let result = readiness.wait(Duration::from_millis(10));

        // then
        assert!(!readiness.is_ready());
        assert_eq!(result, Err(ReadinessError::TimedOut(Duration::from_millis(10))));
    }

    #[test]
    fn completion_on_another_thread_wakes_every_waiter() {
        // given
        let (signal, readiness) = readiness();
        let other = readiness.clone();

        // when
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            signal.complete();
        });

        // then
        assert_eq!(readiness.wait(Duration::from_secs(10)), Ok(()));
        assert_eq!(other.wait(Duration::from_secs(10)), Ok(()));
        handle.join().unwrap();
        assert!(readiness.is_ready());
    }
}
