use bridge::BridgeError;
use router_codec::CodecError;
use thiserror::Error;

pub type EnvResult<T> = Result<T, EnvError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}
