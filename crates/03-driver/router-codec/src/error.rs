use thiserror::Error;

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Action integers must fit in the 5-bit action space.
    #[error("action {0} outside 0..32")]
    ActionOutOfRange(i64),
}
