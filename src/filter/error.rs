use std::fmt;

/// Misuse of a `SearchSelectFilter`.
///
/// Neither variant can happen when the caller only passes indices it got from
/// the current visible list, so both indicate a caller bug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// `index` is not a position in the visible list of length `len`.
    OutOfRange { index: usize, len: usize },
    /// Select-all/none was requested on a single-select filter.
    MultiSelectOnly,
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::OutOfRange { index, len } => write!(
                f,
                "selection index {} out of range for {} visible items",
                index, len
            ),
            SelectionError::MultiSelectOnly => {
                write!(f, "select all/none requires multi-select mode")
            }
        }
    }
}

impl std::error::Error for SelectionError {}
