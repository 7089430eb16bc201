use crate::error::{LhrError, Result};

/// Per-stage partial result: every value that made it through, plus a typed
/// error for every item that did not.
#[derive(Debug)]
pub struct Batch<T> {
    pub values: Vec<T>,
    pub errors: Vec<LhrError>,
}

impl<T> Default for Batch<T> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<T> FromIterator<Result<T>> for Batch<T> {
    fn from_iter<I: IntoIterator<Item = Result<T>>>(iter: I) -> Self {
        let mut batch = Batch::default();
        for item in iter {
            match item {
                Ok(value) => batch.values.push(value),
                Err(e) => batch.errors.push(e),
            }
        }
        batch
    }
}

/// Everything excluded or done during one run
#[derive(Debug, Default)]
pub struct Report {
    /// Records read successfully from the history store
    pub loaded: usize,
    /// Records whose resource lies under the scope
    pub matched: usize,
    /// Resources outside the scope (or not `file:` URIs)
    pub unmatched: Vec<String>,
    /// Files handed to the executor
    pub resolved: usize,
    pub copied: usize,
    pub unchanged: usize,
    /// Copies never started because the run was cancelled
    pub skipped: usize,
    /// Parse, mapping and copy failures, in the order they were found
    pub failures: Vec<LhrError>,
}

impl Report {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty() || self.skipped > 0
    }

    /// Number of failures of one kind (see [`LhrError::kind`])
    pub fn count(&self, kind: &str) -> usize {
        self.failures.iter().filter(|e| e.kind() == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn batch_splits_results() {
        let items: Vec<Result<u32>> = vec![
            Ok(1),
            Err(LhrError::Mapping {
                resource: "file:///x".to_string(),
                reason: "escapes".to_string(),
            }),
            Ok(3),
        ];
        let batch: Batch<u32> = items.into_iter().collect();
        assert_eq!(batch.values, vec![1, 3]);
        assert_eq!(batch.errors.len(), 1);
    }

    #[test]
    fn report_counts_by_kind() {
        let mut report = Report::default();
        assert!(!report.has_failures());

        report.failures.push(LhrError::Parse {
            dir: PathBuf::from("/h/1"),
            reason: "bad".to_string(),
        });
        assert!(report.has_failures());
        assert_eq!(report.count("parse"), 1);
        assert_eq!(report.count("copy"), 0);
    }
}
