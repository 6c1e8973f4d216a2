//! Packing error types.

use thiserror::Error;

use crate::space::Space;

/// Result type alias for packing operations over a binner with error `E`.
pub type PackResult<T, E> = Result<T, PackError<E>>;

/// Errors returned by a packer.
///
/// `E` is the capacity contract's own error type. Failures that originate in
/// the contract's placement side effect are passed through untouched in
/// [`PackError::Placement`].
#[derive(Debug, Error)]
pub enum PackError<E> {
    /// The item is larger than a whole bin and can never be placed.
    #[error("item too large for bin: item size {size}, bin size {bin_size}")]
    ItemTooLarge { size: Space, bin_size: Space },

    #[error("failed to create new bin")]
    NewBin(#[source] E),

    #[error("failed to initialize packer")]
    Init(#[source] E),

    /// The contract's `add_item` failed; the item was not placed.
    #[error(transparent)]
    Placement(E),

    /// The cancellation token was already cancelled when the packer checked it.
    #[error("packing cancelled")]
    Cancelled,
}

/// Comparable discriminant of a [`PackError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackErrorKind {
    ItemTooLarge,
    NewBin,
    Init,
    Placement,
    Cancelled,
}

impl<E> PackError<E> {
    pub fn kind(&self) -> PackErrorKind {
        match self {
            PackError::ItemTooLarge { .. } => PackErrorKind::ItemTooLarge,
            PackError::NewBin(_) => PackErrorKind::NewBin,
            PackError::Init(_) => PackErrorKind::Init,
            PackError::Placement(_) => PackErrorKind::Placement,
            PackError::Cancelled => PackErrorKind::Cancelled,
        }
    }

    pub fn is_item_too_large(&self) -> bool {
        self.kind() == PackErrorKind::ItemTooLarge
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind() == PackErrorKind::Cancelled
    }

    /// The capacity contract's error, if this failure came from the contract.
    pub fn binner_error(&self) -> Option<&E> {
        match self {
            PackError::NewBin(e) | PackError::Init(e) | PackError::Placement(e) => Some(e),
            PackError::ItemTooLarge { .. } | PackError::Cancelled => None,
        }
    }

    pub fn into_binner_error(self) -> Option<E> {
        match self {
            PackError::NewBin(e) | PackError::Init(e) | PackError::Placement(e) => Some(e),
            PackError::ItemTooLarge { .. } | PackError::Cancelled => None,
        }
    }

    /// Re-tag a bin allocation failure from packer construction.
    pub(crate) fn into_init(self) -> Self {
        match self {
            PackError::NewBin(e) => PackError::Init(e),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[derive(Debug, Error, PartialEq)]
    #[error("disk full")]
    struct DiskFull;

    #[test]
    fn placement_error_is_transparent() {
        let err: PackError<DiskFull> = PackError::Placement(DiskFull);
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(err.kind(), PackErrorKind::Placement);
        assert_eq!(err.into_binner_error(), Some(DiskFull));
    }

    #[test]
    fn new_bin_error_keeps_source() {
        let err: PackError<DiskFull> = PackError::NewBin(DiskFull);
        assert_eq!(err.to_string(), "failed to create new bin");
        assert_eq!(err.source().map(|s| s.to_string()), Some("disk full".into()));
    }

    #[test]
    fn init_wraps_bin_allocation_failure() {
        let err = PackError::NewBin(DiskFull).into_init();
        assert_eq!(err.kind(), PackErrorKind::Init);
        assert_eq!(err.to_string(), "failed to initialize packer");
        assert_eq!(err.binner_error(), Some(&DiskFull));
    }

    #[test]
    fn too_large_reports_sizes() {
        let err: PackError<DiskFull> = PackError::ItemTooLarge {
            size: Space::new(11),
            bin_size: Space::new(10),
        };
        assert!(err.is_item_too_large());
        assert!(err.to_string().contains("item size 11"));
        assert!(err.binner_error().is_none());
    }
}
