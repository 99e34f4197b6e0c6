//! Operator entry point installed by the binary.

/// Implements every operator capability against the infrastructure layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct Operator;

impl Operator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}
