//! Output of the reservation assembler.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::reservation::Reservation;

/// Which collection a rejected entity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCollection {
    Passengers,
    Flights,
    Hotel,
    Services,
}

/// Why an entity was dropped during assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    /// The element is not a JSON object.
    NotAnObject,

    /// Passenger without first or last name.
    MissingName,

    /// Required fields missing after normalization.
    MissingFields { fields: Vec<String> },
}

/// A raw entity the assembler could not turn into a canonical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedEntity {
    pub collection: EntityCollection,

    /// Position within its source collection. For legacy single-object
    /// fields this is the position they would have had after the array.
    pub index: usize,
    pub reason: RejectionReason,

    /// The raw value as received.
    pub raw: Value,
}

/// A canonical reservation plus everything dropped on the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    pub reservation: Reservation,

    #[serde(default)]
    pub rejected: Vec<RejectedEntity>,
}

impl Assembly {
    /// Whether any entity was dropped.
    pub fn has_rejections(&self) -> bool {
        !self.rejected.is_empty()
    }

    /// Rejections from one collection.
    pub fn rejected_from(&self, collection: EntityCollection) -> Vec<&RejectedEntity> {
        self.rejected
            .iter()
            .filter(|r| r.collection == collection)
            .collect()
    }

    /// Consume and return only the reservation.
    pub fn into_reservation(self) -> Reservation {
        self.reservation
    }
}
