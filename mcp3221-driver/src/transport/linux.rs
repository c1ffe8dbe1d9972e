//! Linux i2c-dev transport.
//!
//! Transfers go through the `I2C_RDWR` ioctl, which blocks the calling
//! thread, so every transfer runs on tokio's blocking pool. The device handle
//! is moved into the blocking task and handed back when it completes.

use async_trait::async_trait;
use embedded_hal::i2c::{Error as _, ErrorKind, I2c as _};
use linux_embedded_hal::{I2CError, I2cdev};
use std::fs::File;
use std::os::raw::c_ulong;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use crate::hw_trait::{HwError, I2c, I2cError, I2cFunctionality, Result};
use crate::tracing::prelude::*;

/// Query adapter functionality (`linux/i2c-dev.h`)
const I2C_FUNCS: u16 = 0x0705;

nix::ioctl_read_bad!(i2c_funcs, I2C_FUNCS, c_ulong);

/// I2C bus backed by a `/dev/i2c-N` node.
pub struct LinuxI2c {
    dev: Option<I2cdev>,
    path: PathBuf,
    functionality: I2cFunctionality,
}

impl LinuxI2c {
    /// Open the i2c-dev node at `path` and ask the adapter what it supports.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let dev = I2cdev::new(&path)
            .map_err(|e| HwError::Other(format!("{}: {}", path.display(), e)))?;

        let node = File::open(&path)
            .map_err(|e| HwError::Other(format!("{}: {}", path.display(), e)))?;
        let functionality = query_functionality(&node).map_err(|e| {
            HwError::NotSupported(format!("{}: I2C_FUNCS failed: {}", path.display(), e))
        })?;

        debug!(
            path = %path.display(),
            functionality = %functionality,
            "Opened i2c-dev node"
        );
        Ok(Self {
            dev: Some(dev),
            path,
            functionality,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `op` against the device on the blocking pool.
    async fn with_device<T, F>(&mut self, addr: u8, op: F) -> Result<T>
    where
        F: FnOnce(&mut I2cdev) -> std::result::Result<T, I2CError> + Send + 'static,
        T: Send + 'static,
    {
        // Only a panicked transfer leaves the slot empty
        let mut dev = self.dev.take().ok_or_else(|| {
            HwError::Other(format!("{}: device lost after failed transfer", self.path.display()))
        })?;

        let (dev, result) = tokio::task::spawn_blocking(move || {
            let result = op(&mut dev);
            (dev, result)
        })
        .await
        .map_err(|e| HwError::Other(format!("i2c transfer task failed: {}", e)))?;

        self.dev = Some(dev);
        result.map_err(|e| {
            trace!(addr = %format!("{:#04x}", addr), error = %e, "i2c transfer failed");
            map_error(&e, addr)
        })
    }
}

/// Read the adapter's `I2C_FUNC_*` bits from an open i2c-dev node.
fn query_functionality(node: &impl AsRawFd) -> nix::Result<I2cFunctionality> {
    let mut funcs: c_ulong = 0;
    // SAFETY: I2C_FUNCS writes exactly one unsigned long through the pointer,
    // which points at a live local.
    unsafe { i2c_funcs(node.as_raw_fd(), &mut funcs) }?;
    // Every defined bit fits in the low 32
    Ok(I2cFunctionality::from_bits(funcs as u32))
}

/// Translate an i2c-dev error into the bus error taxonomy.
fn map_error(err: &I2CError, addr: u8) -> HwError {
    match err.kind() {
        ErrorKind::NoAcknowledge(_) => I2cError::NoAck(addr).into(),
        ErrorKind::ArbitrationLoss => I2cError::ArbitrationLost.into(),
        ErrorKind::Bus => I2cError::BusError.into(),
        _ => I2cError::Other(err.to_string()).into(),
    }
}

#[async_trait]
impl I2c for LinuxI2c {
    async fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()> {
        let len = buffer.len();
        let data = self
            .with_device(addr, move |dev| {
                let mut data = vec![0u8; len];
                dev.read(addr, &mut data).map(|_| data)
            })
            .await?;
        buffer.copy_from_slice(&data);
        Ok(())
    }

    fn functionality(&self) -> I2cFunctionality {
        self.functionality
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_functionality_query_rejects_non_i2c_node() {
        let node = File::open("/dev/null").unwrap();
        let err = query_functionality(&node).unwrap_err();
        assert_eq!(err, nix::errno::Errno::ENOTTY);
    }

    #[test]
    fn test_open_missing_node_fails() {
        let err = LinuxI2c::open("/dev/i2c-does-not-exist").err().unwrap();
        assert!(matches!(err, HwError::Other(msg) if msg.contains("i2c-does-not-exist")));
    }
}
