use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayerError {
    #[error("{op}: shape mismatch, expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        op: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("{op}: index {index} out of range for size {size}")]
    IndexOutOfRange {
        op: &'static str,
        index: usize,
        size: usize,
    },

    #[error("{op}: sequence length must be at least 1")]
    EmptySequence { op: &'static str },
}

pub type Result<T> = std::result::Result<T, LayerError>;

/// Compare an actual shape against the expected one, failing with a
/// [`LayerError::ShapeMismatch`] that names the offending operation.
pub(crate) fn check_shape(op: &'static str, expected: &[usize], actual: &[usize]) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(LayerError::ShapeMismatch {
            op,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message() {
        let err = check_shape("rnn_step_forward", &[2, 5], &[2, 4]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("rnn_step_forward"));
        assert!(msg.contains("[2, 5]"));
        assert!(msg.contains("[2, 4]"));
    }

    #[test]
    fn test_matching_shapes_pass() {
        assert!(check_shape("any", &[3, 7], &[3, 7]).is_ok());
    }
}
