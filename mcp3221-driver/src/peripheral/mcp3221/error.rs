//! Error types for MCP3221 operations

use thiserror::Error;

use crate::hw_trait::{HwError, I2cFunctionality};
use crate::iio::ChanInfo;

#[derive(Error, Debug)]
pub enum AdcError {
    /// The bound adapter cannot issue plain I2C receives.
    #[error("I2C adapter lacks plain I2C transfers (functionality {available})")]
    UnsupportedTransport { available: I2cFunctionality },

    /// The bus transaction failed; not retried.
    #[error("I2C receive failed")]
    TransportFailure(#[source] HwError),

    /// The request shape is not served by this device.
    #[error("Invalid request for {info:?}: {reason}")]
    InvalidRequest { info: ChanInfo, reason: &'static str },
}

impl AdcError {
    /// Whether this error was raised while binding the device rather than
    /// while serving a request.
    pub fn is_probe_error(&self) -> bool {
        matches!(self, AdcError::UnsupportedTransport { .. })
    }
}

impl From<AdcError> for HwError {
    fn from(err: AdcError) -> Self {
        match err {
            AdcError::TransportFailure(source) => source,
            other @ AdcError::UnsupportedTransport { .. } => {
                HwError::NotSupported(other.to_string())
            }
            other @ AdcError::InvalidRequest { .. } => HwError::InvalidParameter(other.to_string()),
        }
    }
}
