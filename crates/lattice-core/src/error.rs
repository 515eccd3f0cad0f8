use thiserror::Error;

/// Configuration errors. These are fatal at the call site; layout-degenerate
/// inputs (zero space, empty children, zero star weight) are not errors and
/// resolve to neutral sizes instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no root element installed")]
    MissingRoot,

    #[error("overlay is already registered")]
    DuplicateOverlay,
}
