/// Error categories for a fitting run.
///
/// Every failure is terminal: the pipeline either produces a complete set of
/// tables/plots or exits with one of these kinds. The kind determines the
/// process exit code so scripts can tell input problems from fit failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// File or configuration problem at the I/O boundary.
    Io,
    /// Mismatched or insufficient h/θ series.
    InputShape,
    /// The optimizer could not satisfy the bounds/tolerance, or the problem
    /// is underdetermined.
    Convergence,
    /// Zero-variance measured series makes R² undefined.
    DegenerateMetric,
    /// The model was evaluated outside its valid domain (n ≤ 0, negative
    /// head, non-finite values).
    NumericDomain,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Io => 2,
            ErrorKind::InputShape => 3,
            ErrorKind::Convergence => 4,
            ErrorKind::DegenerateMetric => 5,
            ErrorKind::NumericDomain => 6,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_distinct_exit_codes() {
        let kinds = [
            ErrorKind::Io,
            ErrorKind::InputShape,
            ErrorKind::Convergence,
            ErrorKind::DegenerateMetric,
            ErrorKind::NumericDomain,
        ];
        let mut codes: Vec<u8> = kinds.iter().map(|k| k.exit_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn error_carries_kind_and_message() {
        let err = AppError::new(ErrorKind::Convergence, "no fit");
        assert_eq!(err.kind(), ErrorKind::Convergence);
        assert_eq!(err.exit_code(), 4);
        assert_eq!(format!("{err}"), "no fit");
    }
}
