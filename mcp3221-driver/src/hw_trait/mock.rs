//! Scripted I2C test double.
//!
//! Clones share state, so a test can hand one clone to a driver and keep
//! another to script responses and inspect the transaction log.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::{I2c, I2cError, I2cFunctionality, Result};

/// One logged read with its wall-clock interval.
#[derive(Debug, Clone)]
pub(crate) struct ReadRecord {
    pub addr: u8,
    pub len: usize,
    pub started: Instant,
    pub finished: Instant,
}

#[derive(Debug, Default)]
struct MockState {
    read_data: VecDeque<u8>,
    fail_next: Option<I2cError>,
    log: Vec<ReadRecord>,
    max_in_flight: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct MockI2c {
    state: Arc<Mutex<MockState>>,
    in_flight: Arc<AtomicUsize>,
    functionality: I2cFunctionality,
    latency: Duration,
}

impl MockI2c {
    /// Adapter with plain I2C support and no simulated latency.
    pub fn new() -> Self {
        Self::with_functionality(I2cFunctionality::I2C)
    }

    pub fn with_functionality(functionality: I2cFunctionality) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            functionality,
            latency: Duration::ZERO,
        }
    }

    /// Hold every read open for `latency` so overlaps would show.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queue bytes returned by subsequent reads, in order.
    pub fn push_read_data(&self, data: &[u8]) {
        self.state().read_data.extend(data.iter().copied());
    }

    /// Make the next read fail with `err`.
    pub fn fail_next(&self, err: I2cError) {
        self.state().fail_next = Some(err);
    }

    pub fn transactions(&self) -> Vec<ReadRecord> {
        self.state().log.clone()
    }

    /// Highest number of reads observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.state().max_in_flight
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl I2c for MockI2c {
    async fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        let started = Instant::now();
        let depth = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state();
            state.max_in_flight = state.max_in_flight.max(depth);
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let result = {
            let mut state = self.state();
            match state.fail_next.take() {
                Some(err) => Err(err.into()),
                None => {
                    for byte in buffer.iter_mut() {
                        *byte = state.read_data.pop_front().unwrap_or(0);
                    }
                    Ok(())
                }
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.state().log.push(ReadRecord {
            addr,
            len: buffer.len(),
            started,
            finished: Instant::now(),
        });
        result
    }

    fn functionality(&self) -> I2cFunctionality {
        self.functionality
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw_trait::HwError;

    #[tokio::test]
    async fn test_mock_i2c_read() {
        let mut i2c = MockI2c::new();
        i2c.push_read_data(&[0xAA, 0xBB, 0xCC]);

        let mut buffer = [0u8; 3];
        i2c.read(0x51, &mut buffer).await.unwrap();
        assert_eq!(buffer, [0xAA, 0xBB, 0xCC]);

        let log = i2c.transactions();
        assert_eq!(log.len(), 1);
        assert_eq!((log[0].addr, log[0].len), (0x51, 3));
        assert!(log[0].started <= log[0].finished);
    }

    #[tokio::test]
    async fn test_mock_i2c_fail_next_is_one_shot() {
        let mut i2c = MockI2c::new();
        i2c.fail_next(I2cError::NoAck(0x4d));

        let mut buffer = [0u8; 2];
        let err = i2c.read(0x4d, &mut buffer).await.unwrap_err();
        assert!(matches!(err, HwError::I2c(I2cError::NoAck(0x4d))));

        i2c.read(0x4d, &mut buffer).await.unwrap();
        assert_eq!(i2c.transactions().len(), 2);
    }

    #[test]
    fn test_mock_i2c_reports_functionality() {
        let i2c = MockI2c::with_functionality(I2cFunctionality::empty());
        assert_eq!(i2c.functionality(), I2cFunctionality::empty());
        assert_eq!(MockI2c::new().functionality(), I2cFunctionality::I2C);
    }
}
