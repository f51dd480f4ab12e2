/// Errors produced by this crate.
///
/// Nearly every public operation on [`crate::Tree`] is infallible by
/// construction — malformed rectangles and remove-misses are not errors
/// (see the crate-level documentation). [`Error::InvalidShape`] is the one
/// exception, returned by [`crate::Tree::from_json`] when the input does
/// not describe a well-formed node-record tree.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `from_json` received a record tree that doesn't satisfy the node
    /// shape: a `leaf` node whose `children` aren't items, an interior node
    /// whose `children` aren't node records, or a `height` inconsistent
    /// with the depth of its descendants.
    #[error("malformed node record: {reason}")]
    InvalidShape { reason: String },
}
