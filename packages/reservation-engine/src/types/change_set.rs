//! Change-sets between two reservation snapshots.

use serde::{Deserialize, Serialize};

use crate::types::reservation::Passenger;

/// One flag per header field and per collection: `true` means the edit flow
/// has to touch that part of the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    pub codigo: bool,
    pub reservation_type: bool,
    pub status: bool,
    pub client: bool,
    pub reservation_date: bool,
    pub travel_date: bool,
    pub tour_end_date: bool,
    pub seller: bool,
    pub currency: bool,
    pub exchange_rate: bool,
    pub commission: bool,
    pub net_amount: bool,
    pub gross_amount: bool,
    pub adults: bool,
    pub children: bool,
    pub infants: bool,
    pub trip_name: bool,
    pub product_code: bool,
    pub contact_name: bool,
    pub contact_email: bool,
    pub contact_phone: bool,

    pub hotel: bool,
    pub services: bool,
    pub flights: bool,
    pub passengers: bool,
}

impl ChangeSet {
    /// Every flag set; used when there is nothing to compare against.
    pub fn all_changed() -> Self {
        Self {
            codigo: true,
            reservation_type: true,
            status: true,
            client: true,
            reservation_date: true,
            travel_date: true,
            tour_end_date: true,
            seller: true,
            currency: true,
            exchange_rate: true,
            commission: true,
            net_amount: true,
            gross_amount: true,
            adults: true,
            children: true,
            infants: true,
            trip_name: true,
            product_code: true,
            contact_name: true,
            contact_email: true,
            contact_phone: true,
            hotel: true,
            services: true,
            flights: true,
            passengers: true,
        }
    }

    /// Wire names of the flags that are set, sorted by name.
    pub fn changed_fields(&self) -> Vec<String> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(flags)) => flags
                .into_iter()
                .filter(|(_, flag)| flag.as_bool() == Some(true))
                .map(|(name, _)| name)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn any_changed(&self) -> bool {
        *self != Self::default()
    }

    pub fn all_set(&self) -> bool {
        *self == Self::all_changed()
    }
}

/// How a passenger differs from the stored snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerStatus {
    /// No stored passenger shares its document number.
    New,

    /// A stored passenger shares its document number but differs in at
    /// least one compared field.
    Modified,
}

/// A passenger that has to be written by the edit flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerChange {
    #[serde(flatten)]
    pub passenger: Passenger,
    pub is_new: bool,
    pub is_modified: bool,
}

impl PassengerChange {
    pub fn new(passenger: Passenger, status: PassengerStatus) -> Self {
        Self {
            passenger,
            is_new: status == PassengerStatus::New,
            is_modified: status == PassengerStatus::Modified,
        }
    }

    pub fn status(&self) -> PassengerStatus {
        if self.is_new {
            PassengerStatus::New
        } else {
            PassengerStatus::Modified
        }
    }
}
