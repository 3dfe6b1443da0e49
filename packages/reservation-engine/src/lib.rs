//! Reservation Normalization, Matching & Diff Engine
//!
//! Turns noisy AI-extracted reservation JSON into canonical records, picks
//! catalog rows for fuzzy hotel/service/package references, and computes
//! change-sets between two versions of a reservation so an edit flow only
//! touches what changed.
//!
//! # Design Philosophy
//!
//! - Best effort, never fatal: bad values become `None`, incomplete entities
//!   are dropped and reported, uncertain matches return `None`
//! - Pure and synchronous: no I/O, no shared state, safe to call from any
//!   number of automation sessions at once
//! - Aliases resolved once, at ingestion
//!
//! # Usage
//!
//! ```rust,ignore
//! use reservation_engine::{assemble_reservation_today, parse_extraction, EngineConfig};
//! use reservation_engine::{diff, resolve_match, CandidateRow, EntityKind};
//!
//! let config = EngineConfig::default();
//! let raw = parse_extraction(&ai_output)?;
//! let assembly = assemble_reservation_today(&raw, &config.assembly);
//!
//! // Pick the catalog row for the hotel
//! if let Some(hotel) = &assembly.reservation.hotel {
//!     let target = CandidateRow::from_detail(hotel, EntityKind::Hotel);
//!     let selection = resolve_match(&rows, &target, EntityKind::Hotel, &config.matcher);
//! }
//!
//! // Only touch what changed since the stored snapshot
//! let changes = diff(&assembly.reservation, previous.as_ref());
//! ```
//!
//! # Modules
//!
//! - [`types`] - Canonical records, code sets, configuration
//! - [`pipeline`] - Normalizers, assembler, matcher, change detector
//! - [`testing`] - Fixtures for tests

pub mod error;
pub mod pipeline;
pub mod testing;
pub mod types;

// Re-export core types at crate root
pub use error::{EngineError, Result};
pub use types::{
    assembly::{Assembly, EntityCollection, RejectedEntity, RejectionReason},
    candidate::{BestMatch, CandidateRow, EntityKind, MatchSelection},
    change_set::{ChangeSet, PassengerChange, PassengerStatus},
    codes::{CodeSet, DocumentType, Estado, PassengerType, Sex},
    config::{
        AssemblyConfig, EngineConfig, FallbackPolicy, MatcherConfig, NormalizeOptions,
        DEFAULT_CONFIDENCE, DEFAULT_MATCH_THRESHOLD,
    },
    reservation::{BookableDetail, Flight, Passenger, Reservation},
};

// Re-export pipeline components
pub use pipeline::{
    // Assembly
    assemble_reservation, assemble_reservation_today, normalize_flight, normalize_passenger,
    parse_extraction,
    // Details
    nights_between, normalize_detail, normalize_detail_with,
    // Change detection
    diff, diff_passengers, diff_stored, plan_edit, EditPlan,
    // Matching
    rank_candidates, resolve_match, score_breakdown, score_candidate, select_best_match,
    EntityMatcher, ScoreBreakdown,
};
