//! The engine pipeline.
//!
//! Raw extraction flows through:
//! - Field normalizers (dates, codes, IATA, email, numbers)
//! - Detail normalization (hotel/service/eventual/program lines)
//! - Reservation assembly (collections, aliases, date defaults)
//!
//! Alongside, the matcher scores catalog rows against a detail and the
//! change detector compares a new reservation with a stored one.

pub mod assemble;
pub mod detail;
pub mod diff;
pub mod matching;
pub mod normalize;

pub use assemble::{
    assemble_reservation, assemble_reservation_today, normalize_flight, normalize_passenger,
    parse_extraction,
};
pub use detail::{nights_between, normalize_detail, normalize_detail_with};
pub use diff::{
    diff, diff_passengers, diff_stored, plan_edit, EditPlan, PASSENGER_COMPARED_FIELDS,
};
pub use matching::{
    rank_candidates, resolve_match, rubric, score_breakdown, score_candidate, select_best_match,
    Comparison, Criterion, EntityMatcher, ScoreBreakdown,
};
pub use normalize::{
    normalize_code, normalize_confidence, normalize_count, normalize_date, normalize_email,
    normalize_enum, normalize_iata, normalize_identifier, normalize_number, normalize_string,
    normalize_time, normalize_upper,
};
