use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Version of the record shapes below. Snapshot files carry it so a reader
/// never silently interprets records written for a different layout.
pub const SCHEMA_VERSION: u32 = 1;

/// Opaque storage identifier shared by participants, evaluators and evaluations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Leader,
    Supporter,
}

impl Category {
    /// Order in which category blocks and per-category columns appear.
    pub const fn ordered() -> [Self; 2] {
        [Self::Leader, Self::Supporter]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Leader => "Leader",
            Self::Supporter => "Supporter",
        }
    }

    pub const fn section_label(self) -> &'static str {
        match self {
            Self::Leader => "LEADERS",
            Self::Supporter => "SUPPORTERS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: RecordId,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub checked_in: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluator {
    pub id: RecordId,
    pub name: String,
}

/// One scored dimension inside an evaluation. A missing or non-positive score
/// means the evaluator did not rate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub name: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub evidence: String,
}

impl CriterionResult {
    pub fn rated_score(&self) -> Option<f64> {
        self.score.filter(|score| *score > 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: RecordId,
    #[serde(default)]
    pub participant_ref: Option<RecordId>,
    #[serde(default)]
    pub evaluator_ref: Option<RecordId>,
    #[serde(default)]
    pub criteria: Vec<CriterionResult>,
    pub created_at: DateTime<Utc>,
}

impl Evaluation {
    /// First entry for `name`; later duplicates inside the same evaluation are ignored.
    pub fn criterion(&self, name: &str) -> Option<&CriterionResult> {
        self.criteria.iter().find(|criterion| criterion.name == name)
    }
}

/// Evaluation as returned by the repository's own reference join. Either side
/// is `None` when storage could not follow the reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedEvaluation {
    pub evaluation: Evaluation,
    pub participant: Option<Participant>,
    pub evaluator: Option<Evaluator>,
}

/// Ordered criteria names per participant category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaCatalog {
    pub leader: Vec<String>,
    pub supporter: Vec<String>,
}

impl CriteriaCatalog {
    pub fn new(leader: Vec<String>, supporter: Vec<String>) -> Self {
        Self { leader, supporter }
    }

    /// Rubric used by the training camp when no override is configured.
    pub fn training_camp() -> Self {
        let leader = [
            "Energy",
            "Discipline",
            "Interest & Readiness",
            "Problem Solving",
            "Teamwork",
            "Communication",
            "Child Psychology",
            "CISV Skills",
        ];
        let supporter = [
            "Energy",
            "Attitude & Focus",
            "Self-Awareness",
            "Critical Thinking",
            "Teamwork",
            "Communication & Connection",
            "Sharing Experience",
        ];

        Self {
            leader: leader.iter().map(|name| name.to_string()).collect(),
            supporter: supporter.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn for_category(&self, category: Category) -> &[String] {
        match category {
            Category::Leader => &self.leader,
            Category::Supporter => &self.supporter,
        }
    }
}
