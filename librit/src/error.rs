use crate::hash::Digest;

/// Generic result type used at every public API boundary, mirroring the
/// split between a structured error enum and an opaque `anyhow` error that
/// most of the call sites actually want.
pub type RitResult<T> = Result<T, RitGenericError>;
pub type RitGenericError = anyhow::Error;

/// Repository-corruption and other "should never happen in a sane
/// repository" conditions. These are distinct from the fixed user-facing
/// messages in `cmd`, which are just printed strings -- not exceptions --
/// per the command contract.
#[derive(thiserror::Error, Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub enum RitError {
    #[error("object `{0}` not found in the object store")]
    ObjectMissing(Digest),
    #[error("prefix `{0}` is ambiguous")]
    AmbiguousPrefix(String, Vec<Digest>),
    #[error("repository is corrupt: {0}")]
    Corrupt(String),
}

pub trait RitResultExt {
    fn is_missing_object(&self) -> bool;
}

impl RitResultExt for RitGenericError {
    fn is_missing_object(&self) -> bool {
        matches!(self.downcast_ref::<RitError>(), Some(RitError::ObjectMissing(..)))
    }
}

impl<T> RitResultExt for RitResult<T> {
    fn is_missing_object(&self) -> bool {
        match self {
            Ok(..) => false,
            Err(err) => err.is_missing_object(),
        }
    }
}
