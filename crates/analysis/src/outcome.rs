use serde::{Deserialize, Serialize};

/// What happened to one item of a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome<T> {
    Accepted(T),
    /// Scored fine but did not clear the emit threshold.
    BelowThreshold { id: String, score: f32 },
    /// Could not be scored at all.
    Skipped { id: String, reason: String },
}

/// An item left out of a batch result because it could not be processed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedItem {
    pub id: String,
    pub reason: String,
}

/// Accepted records of a batch plus everything that had to be skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport<T> {
    pub accepted: Vec<T>,
    pub skipped: Vec<SkippedItem>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            accepted: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    pub fn record(&mut self, outcome: ItemOutcome<T>) {
        match outcome {
            ItemOutcome::Accepted(item) => self.accepted.push(item),
            ItemOutcome::BelowThreshold { id, score } => {
                tracing::debug!(id = %id, score, "below threshold");
            }
            ItemOutcome::Skipped { id, reason } => {
                tracing::warn!(id = %id, reason = %reason, "skipping item");
                self.skipped.push(SkippedItem { id, reason });
            }
        }
    }

    /// Orders accepted records by descending `score`; ties keep input order.
    pub(crate) fn sort_desc_by<F>(&mut self, score: F)
    where
        F: Fn(&T) -> f32,
    {
        self.accepted.sort_by(|a, b| {
            score(b)
                .partial_cmp(&score(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
}

impl<T> FromIterator<ItemOutcome<T>> for BatchReport<T> {
    fn from_iter<I: IntoIterator<Item = ItemOutcome<T>>>(iter: I) -> Self {
        let mut report = BatchReport::default();
        for outcome in iter {
            report.record(outcome);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_are_routed() {
        let report: BatchReport<u32> = vec![
            ItemOutcome::Accepted(1),
            ItemOutcome::BelowThreshold {
                id: "low".into(),
                score: 0.1,
            },
            ItemOutcome::Skipped {
                id: "bad".into(),
                reason: "invalid base64 payload".into(),
            },
            ItemOutcome::Accepted(2),
        ]
        .into_iter()
        .collect();

        assert_eq!(report.accepted, vec![1, 2]);
        assert_eq!(
            report.skipped,
            vec![SkippedItem {
                id: "bad".into(),
                reason: "invalid base64 payload".into()
            }]
        );
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mut report = BatchReport {
            accepted: vec![("a", 0.5), ("b", 0.9), ("c", 0.5), ("d", 0.1)],
            skipped: Vec::new(),
        };
        report.sort_desc_by(|(_, s)| *s);
        let order: Vec<&str> = report.accepted.iter().map(|(id, _)| *id).collect();
        assert_eq!(order, vec!["b", "a", "c", "d"]);
    }
}
