use bridge::BridgeError;
use thiserror::Error;

pub type DriverResult<T> = Result<T, DriverError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),
}
