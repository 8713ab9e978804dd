use crate::models::{MrzRecord, Strategy};

pub struct Reconciler;

impl Reconciler {
    /// Pick the authoritative record from reader results in preference
    /// order: the first present result wins outright, no merging. All
    /// absent yields `(None, Strategy::None)`.
    pub fn reconcile(
        candidates: Vec<(Strategy, Option<MrzRecord>)>,
    ) -> (Option<MrzRecord>, Strategy) {
        for (strategy, record) in candidates {
            if let Some(record) = record {
                return (Some(record), strategy);
            }
        }
        (None, Strategy::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded() -> MrzRecord {
        MrzRecord::empty_decoded()
    }

    fn raw_lines() -> MrzRecord {
        MrzRecord::RawLines {
            line1: "A".repeat(44),
            line2: "B".repeat(44),
        }
    }

    #[test]
    fn structured_wins_over_fallback() {
        let (record, strategy) = Reconciler::reconcile(vec![
            (Strategy::Structured, Some(decoded())),
            (Strategy::Fallback, Some(raw_lines())),
        ]);
        assert_eq!(strategy, Strategy::Structured);
        assert_eq!(record, Some(decoded()));
    }

    #[test]
    fn fallback_wins_when_structured_is_absent() {
        let (record, strategy) = Reconciler::reconcile(vec![
            (Strategy::Structured, None),
            (Strategy::Fallback, Some(raw_lines())),
        ]);
        assert_eq!(strategy, Strategy::Fallback);
        assert_eq!(record, Some(raw_lines()));
    }

    #[test]
    fn all_absent_reports_none() {
        let (record, strategy) =
            Reconciler::reconcile(vec![(Strategy::Structured, None), (Strategy::Fallback, None)]);
        assert_eq!(strategy, Strategy::None);
        assert_eq!(record, None);
    }

    #[test]
    fn empty_candidate_list_reports_none() {
        let (record, strategy) = Reconciler::reconcile(Vec::new());
        assert_eq!(strategy, Strategy::None);
        assert_eq!(record, None);
    }
}
