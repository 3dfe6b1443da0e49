//! Entity matcher - weighted fuzzy scoring of catalog rows.
//!
//! Each entity kind has a fixed rubric of criteria. A criterion only counts
//! when its field is present on both the candidate and the target, so the
//! maximum attainable score shrinks with missing data and the final score is
//! normalized to 0-100.
//!
//! Scoring is pure: rows are plain data and nothing here can fail.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::candidate::{BestMatch, CandidateRow, EntityKind, MatchSelection};
use crate::types::config::{FallbackPolicy, MatcherConfig};

// Hotel rubric (sums to 100)
pub const HOTEL_NAME_WEIGHT: f64 = 40.0;
pub const HOTEL_ROOM_TYPE_WEIGHT: f64 = 30.0;
pub const HOTEL_CITY_WEIGHT: f64 = 20.0;
pub const HOTEL_CATEGORY_WEIGHT: f64 = 10.0;

// Service rubric (sums to 100)
pub const SERVICE_NAME_WEIGHT: f64 = 50.0;
pub const SERVICE_CITY_WEIGHT: f64 = 30.0;
pub const SERVICE_PROVIDER_WEIGHT: f64 = 20.0;

// Program rubric (sums to 100)
pub const PROGRAM_CODE_WEIGHT: f64 = 40.0;
pub const PROGRAM_NAME_WEIGHT: f64 = 40.0;
pub const PROGRAM_CITY_WEIGHT: f64 = 20.0;

/// Share of the name weight earned when only a significant word matches.
pub const PARTIAL_NAME_CREDIT: f64 = 0.5;

/// Words must be longer than this (in characters) to count as significant.
pub const MIN_SIGNIFICANT_WORD_LEN: usize = 3;

/// How a criterion compares the target value with the candidate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Case-insensitive equality.
    Exact,

    /// Either value contains the other, case-insensitive. Equality included.
    Contains,

    /// Containment for full credit; otherwise [`PARTIAL_NAME_CREDIT`] when
    /// any significant target word appears in the candidate value.
    ContainsOrSignificantWord,

    /// Containment for full credit; otherwise the share of target words
    /// found among the candidate's words.
    ContainsOrWordOverlap,
}

impl Comparison {
    /// Fraction of the criterion weight earned, in `[0, 1]`.
    pub fn credit(&self, target: &str, candidate: &str) -> f64 {
        let target = target.to_lowercase();
        let candidate = candidate.to_lowercase();

        match self {
            Self::Exact => {
                if target == candidate {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Contains => {
                if contains_either(&target, &candidate) {
                    1.0
                } else {
                    0.0
                }
            }
            Self::ContainsOrSignificantWord => {
                if contains_either(&target, &candidate) {
                    1.0
                } else if target
                    .split_whitespace()
                    .filter(|word| word.chars().count() > MIN_SIGNIFICANT_WORD_LEN)
                    .any(|word| candidate.contains(word))
                {
                    PARTIAL_NAME_CREDIT
                } else {
                    0.0
                }
            }
            Self::ContainsOrWordOverlap => {
                if contains_either(&target, &candidate) {
                    1.0
                } else {
                    word_overlap(&target, &candidate)
                }
            }
        }
    }
}

fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Share of `target` words present among `candidate` words.
fn word_overlap(target: &str, candidate: &str) -> f64 {
    let target_words: Vec<&str> = target.split_whitespace().collect();
    if target_words.is_empty() {
        return 0.0;
    }
    let candidate_words: HashSet<&str> = candidate.split_whitespace().collect();
    let shared = target_words
        .iter()
        .filter(|word| candidate_words.contains(*word))
        .count();
    shared as f64 / target_words.len() as f64
}

/// One weighted attribute of a rubric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Criterion {
    /// Attribute name for breakdowns and logs.
    pub name: &'static str,

    /// Row fields holding the attribute, first present wins.
    pub keys: &'static [&'static str],
    pub weight: f64,
    pub comparison: Comparison,
}

pub const HOTEL_RUBRIC: &[Criterion] = &[
    Criterion {
        name: "name",
        keys: &["nombre_hotel", "nombre"],
        weight: HOTEL_NAME_WEIGHT,
        comparison: Comparison::ContainsOrSignificantWord,
    },
    Criterion {
        name: "room_type",
        keys: &["tipo_habitacion"],
        weight: HOTEL_ROOM_TYPE_WEIGHT,
        comparison: Comparison::Exact,
    },
    Criterion {
        name: "city",
        keys: &["ciudad"],
        weight: HOTEL_CITY_WEIGHT,
        comparison: Comparison::Contains,
    },
    Criterion {
        name: "category",
        keys: &["categoria"],
        weight: HOTEL_CATEGORY_WEIGHT,
        comparison: Comparison::Contains,
    },
];

pub const SERVICE_RUBRIC: &[Criterion] = &[
    Criterion {
        name: "name",
        keys: &["nombre", "nombre_servicio", "servicio"],
        weight: SERVICE_NAME_WEIGHT,
        comparison: Comparison::ContainsOrWordOverlap,
    },
    Criterion {
        name: "city",
        keys: &["ciudad"],
        weight: SERVICE_CITY_WEIGHT,
        comparison: Comparison::Contains,
    },
    Criterion {
        name: "provider",
        keys: &["proveedor"],
        weight: SERVICE_PROVIDER_WEIGHT,
        comparison: Comparison::Contains,
    },
];

pub const PROGRAM_RUBRIC: &[Criterion] = &[
    Criterion {
        name: "code",
        keys: &["codigo"],
        weight: PROGRAM_CODE_WEIGHT,
        comparison: Comparison::Exact,
    },
    Criterion {
        name: "name",
        keys: &["nombre", "nombre_programa"],
        weight: PROGRAM_NAME_WEIGHT,
        comparison: Comparison::Contains,
    },
    Criterion {
        name: "city",
        keys: &["ciudad"],
        weight: PROGRAM_CITY_WEIGHT,
        comparison: Comparison::Contains,
    },
];

/// The rubric applied to `kind`.
pub fn rubric(kind: EntityKind) -> &'static [Criterion] {
    match kind {
        EntityKind::Hotel => HOTEL_RUBRIC,
        EntityKind::Servicio => SERVICE_RUBRIC,
        EntityKind::Programa => PROGRAM_RUBRIC,
    }
}

/// Points earned on one criterion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriterionScore {
    pub name: &'static str,
    pub earned: f64,
    pub weight: f64,
}

/// How a candidate's score was put together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// Normalized score, 0-100.
    pub score: f64,
    pub earned: f64,

    /// Sum of the weights of criteria present on both sides.
    pub max_possible: f64,

    /// Only the criteria that were scored.
    pub criteria: Vec<CriterionScore>,
}

/// Score a candidate with a per-criterion breakdown.
pub fn score_breakdown(
    candidate: &CandidateRow,
    target: &CandidateRow,
    kind: EntityKind,
) -> ScoreBreakdown {
    let mut criteria = Vec::new();
    let mut earned = 0.0;
    let mut max_possible = 0.0;

    for criterion in rubric(kind) {
        let (Some(target_value), Some(candidate_value)) = (
            target.get_any(criterion.keys),
            candidate.get_any(criterion.keys),
        ) else {
            continue;
        };

        let points = criterion.weight * criterion.comparison.credit(target_value, candidate_value);
        earned += points;
        max_possible += criterion.weight;
        criteria.push(CriterionScore {
            name: criterion.name,
            earned: points,
            weight: criterion.weight,
        });
    }

    let score = if max_possible > 0.0 {
        (earned / max_possible * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    ScoreBreakdown {
        score,
        earned,
        max_possible,
        criteria,
    }
}

/// Score a candidate against the target, 0-100.
pub fn score_candidate(candidate: &CandidateRow, target: &CandidateRow, kind: EntityKind) -> f64 {
    score_breakdown(candidate, target, kind).score
}

/// Every candidate with its score, best first. Ties keep input order.
pub fn rank_candidates(
    candidates: &[CandidateRow],
    target: &CandidateRow,
    kind: EntityKind,
) -> Vec<BestMatch> {
    let mut ranked: Vec<BestMatch> = candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| BestMatch {
            index,
            score: score_candidate(candidate, target, kind),
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// The highest-scoring candidate, if its score is strictly above
/// `threshold`. The first candidate wins ties.
///
/// `None` means no confident match; the caller picks its fallback.
pub fn select_best_match(
    candidates: &[CandidateRow],
    target: &CandidateRow,
    kind: EntityKind,
    threshold: f64,
) -> Option<BestMatch> {
    let mut best: Option<BestMatch> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let score = score_candidate(candidate, target, kind);
        tracing::debug!(%kind, index, score, "Scored candidate");

        if best.map_or(true, |b| score > b.score) {
            best = Some(BestMatch { index, score });
        }
    }

    best.filter(|b| b.score > threshold)
}

/// Select a row, applying the configured fallback when nothing clears the
/// threshold.
pub fn resolve_match(
    candidates: &[CandidateRow],
    target: &CandidateRow,
    kind: EntityKind,
    config: &MatcherConfig,
) -> Option<MatchSelection> {
    if let Some(best) = select_best_match(candidates, target, kind, config.threshold) {
        tracing::debug!(%kind, index = best.index, score = best.score, "Selected candidate");
        return Some(MatchSelection {
            index: best.index,
            score: best.score,
            fallback: false,
        });
    }

    match config.fallback {
        FallbackPolicy::FirstRow => candidates.first().map(|first| {
            let score = score_candidate(first, target, kind);
            tracing::info!(
                %kind,
                candidates = candidates.len(),
                threshold = config.threshold,
                "No confident match, falling back to first row"
            );
            MatchSelection {
                index: 0,
                score,
                fallback: true,
            }
        }),
        FallbackPolicy::Abort => {
            tracing::info!(
                %kind,
                candidates = candidates.len(),
                threshold = config.threshold,
                "No confident match"
            );
            None
        }
    }
}

/// Matcher bound to a configuration.
#[derive(Debug, Clone, Default)]
pub struct EntityMatcher {
    config: MatcherConfig,
}

impl EntityMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// See [`select_best_match`].
    pub fn select(
        &self,
        candidates: &[CandidateRow],
        target: &CandidateRow,
        kind: EntityKind,
    ) -> Option<BestMatch> {
        select_best_match(candidates, target, kind, self.config.threshold)
    }

    /// See [`resolve_match`].
    pub fn resolve(
        &self,
        candidates: &[CandidateRow],
        target: &CandidateRow,
        kind: EntityKind,
    ) -> Option<MatchSelection> {
        resolve_match(candidates, target, kind, &self.config)
    }
}
