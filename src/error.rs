/// Error type for encoding failures.
///
/// Encoding is all-or-nothing: any error aborts the whole call and no
/// partial output is returned. The computation is deterministic, so a
/// retry can only succeed after changing the input, the tracking
/// strategy or the depth bound.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum XsonError {
    /// A value classified as a scalar carried a non-primitive payload.
    #[error("scalar expected; got {found}")]
    Classification { found: &'static str },

    /// The bounded tracker ran past its configured maximum depth,
    /// which signals a probable infinite structure.
    #[error("probable infinite structure: reached depth {max_depth}")]
    DepthExceeded { max_depth: usize },
}
