use std::collections::BTreeSet;

use serde::Serialize;

use super::domain::{Evaluation, Participant, RecordId};

/// Average of one criterion for one participant. `average` is `None` when no
/// evaluation rated the criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriterionAverage {
    pub criterion: String,
    pub average: Option<String>,
    pub rated_by: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantScores {
    pub participant_id: RecordId,
    pub name: String,
    pub averages: Vec<CriterionAverage>,
    pub unique_evaluator_count: usize,
}

/// Evaluation attributed to a participant, paired with the evaluator who wrote it.
#[derive(Debug, Clone, Copy)]
pub struct ScoredEvaluation<'a> {
    pub evaluation: &'a Evaluation,
    pub evaluator_id: &'a RecordId,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ScoreAggregator;

impl ScoreAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(
        &self,
        participant: &Participant,
        evaluations: &[ScoredEvaluation<'_>],
        criteria: &[String],
    ) -> ParticipantScores {
        let averages = criteria
            .iter()
            .map(|criterion| {
                let scores: Vec<f64> = evaluations
                    .iter()
                    .filter_map(|scored| scored.evaluation.criterion(criterion))
                    .filter_map(|result| result.rated_score())
                    .collect();

                CriterionAverage {
                    criterion: criterion.clone(),
                    average: format_average(&scores),
                    rated_by: scores.len(),
                }
            })
            .collect();

        let unique_evaluator_count = evaluations
            .iter()
            .map(|scored| scored.evaluator_id)
            .collect::<BTreeSet<_>>()
            .len();

        ParticipantScores {
            participant_id: participant.id.clone(),
            name: participant.name.clone(),
            averages,
            unique_evaluator_count,
        }
    }
}

/// Mean of `scores` to one decimal place, halves rounding up.
pub fn format_average(scores: &[f64]) -> Option<String> {
    if scores.is_empty() {
        return None;
    }

    let sum: f64 = scores.iter().sum();
    let tenths = (sum * 10.0 / scores.len() as f64).round();
    Some(format!("{:.1}", tenths / 10.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_average_matches_sheet_conventions() {
        assert_eq!(format_average(&[4.0, 5.0, 3.0]).as_deref(), Some("4.0"));
        assert_eq!(format_average(&[5.0]).as_deref(), Some("5.0"));
        assert_eq!(format_average(&[4.0, 5.0]).as_deref(), Some("4.5"));
        assert_eq!(format_average(&[]), None);
    }

    #[test]
    fn format_average_rounds_halves_up() {
        // 4.25 -> 4.3, 3.35 -> 3.4
        assert_eq!(format_average(&[4.0, 4.0, 4.0, 5.0]).as_deref(), Some("4.3"));
        let mut scores = vec![3.0; 13];
        scores.extend(vec![4.0; 7]);
        assert_eq!(format_average(&scores).as_deref(), Some("3.4"));
        assert_eq!(format_average(&[1.0, 2.0, 2.0]).as_deref(), Some("1.7"));
    }
}
