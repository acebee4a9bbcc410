use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use super::domain::{Category, Evaluator, RecordId};
use super::join::{JoinResult, Resolution};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluatorStats {
    pub evaluator_id: RecordId,
    pub name: String,
    pub total: u64,
    pub per_category: BTreeMap<Category, u64>,
}

impl EvaluatorStats {
    fn empty(evaluator: &Evaluator) -> Self {
        Self {
            evaluator_id: evaluator.id.clone(),
            name: evaluator.name.clone(),
            total: 0,
            per_category: BTreeMap::new(),
        }
    }

    pub fn count(&self, category: Category) -> u64 {
        self.per_category.get(&category).copied().unwrap_or(0)
    }
}

/// Workload per evaluator across every attributable evaluation, followed by
/// the rest of the roster with zero counts.
#[derive(Debug, Default, Clone, Copy)]
pub struct EvaluatorStatsAggregator;

impl EvaluatorStatsAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(&self, resolution: &Resolution, roster: &[Evaluator]) -> Vec<EvaluatorStats> {
        let mut counted: Vec<EvaluatorStats> = Vec::new();
        let mut index: HashMap<RecordId, usize> = HashMap::new();

        for entry in &resolution.entries {
            let Some(evaluator) = entry.result.evaluator() else {
                continue;
            };

            let slot = *index.entry(evaluator.id.clone()).or_insert_with(|| {
                counted.push(EvaluatorStats::empty(evaluator));
                counted.len() - 1
            });
            let stats = &mut counted[slot];
            stats.total += 1;

            if let JoinResult::Resolved { participant, .. } = &entry.result {
                *stats.per_category.entry(participant.category).or_insert(0) += 1;
            }
        }

        // Stable, so equal totals keep first-seen order.
        counted.sort_by(|left, right| right.total.cmp(&left.total));

        let mut seen: HashSet<RecordId> = index.into_keys().collect();
        for evaluator in roster {
            if seen.insert(evaluator.id.clone()) {
                counted.push(EvaluatorStats::empty(evaluator));
            }
        }

        counted
    }
}
