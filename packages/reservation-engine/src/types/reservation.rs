//! Canonical reservation records.
//!
//! These are the normalized, typed shapes handed to the automation layer.
//! Wire names follow the extraction JSON (camelCase, with the legacy
//! application's Spanish names for bookable details), so a serialized record
//! can be fed back through the assembler and come out unchanged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::codes::{DocumentType, Estado, PassengerType, Sex};

/// A traveller on the reservation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub document_type: Option<DocumentType>,

    /// Identity key when pairing passengers across two snapshots.
    pub document_number: Option<String>,

    /// Country name, uppercased.
    pub nationality: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub sex: Option<Sex>,

    #[serde(default)]
    pub passenger_type: PassengerType,
    pub cuil_cuit: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl Passenger {
    /// Document number usable as an identity key (present and non-empty).
    pub fn identity(&self) -> Option<&str> {
        self.document_number
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// "Last, First" for log lines.
    pub fn display_name(&self) -> String {
        match (&self.last_name, &self.first_name) {
            (Some(last), Some(first)) => format!("{last}, {first}"),
            (Some(last), None) => last.clone(),
            (None, Some(first)) => first.clone(),
            (None, None) => String::new(),
        }
    }
}

/// A flight segment. Only complete segments are ever constructed by the
/// assembler: number, origin and destination are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub flight_number: String,
    pub airline: Option<String>,

    /// IATA airport code, three uppercase letters.
    pub origin: String,

    /// IATA airport code, three uppercase letters.
    pub destination: String,
    pub departure_date: Option<NaiveDate>,
    pub arrival_date: Option<NaiveDate>,

    /// `HH:MM`, 24h.
    pub departure_time: Option<String>,

    /// `HH:MM`, 24h.
    pub arrival_time: Option<String>,
}

/// A hotel, service, eventual or program line. All four share this shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookableDetail {
    /// Place name or code.
    pub destino: Option<String>,

    #[serde(rename = "in")]
    pub check_in: Option<NaiveDate>,

    #[serde(rename = "out")]
    pub check_out: Option<NaiveDate>,

    /// Nights. Derived from `in`/`out` when both are known.
    #[serde(default)]
    pub nts: u32,

    #[serde(default)]
    pub base_pax: u32,

    /// Canonical name of the hotel, service or program.
    pub servicio: Option<String>,
    pub descripcion: Option<String>,
    pub estado: Option<Estado>,
}

/// The full canonical reservation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub codigo: Option<String>,
    pub reservation_type: Option<String>,
    pub status: Option<String>,
    pub client: Option<String>,
    pub reservation_date: Option<NaiveDate>,
    pub travel_date: Option<NaiveDate>,
    pub tour_end_date: Option<NaiveDate>,
    pub seller: Option<String>,

    // Financial
    pub currency: Option<String>,
    pub exchange_rate: Option<f64>,
    pub commission: Option<f64>,
    pub net_amount: Option<f64>,
    pub gross_amount: Option<f64>,

    // Party size
    pub adults: Option<u32>,
    pub children: Option<u32>,
    pub infants: Option<u32>,

    // Administrative
    pub trip_name: Option<String>,
    pub product_code: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,

    /// Extraction confidence, 0.0-1.0.
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    #[serde(default, alias = "pasajeros")]
    pub passengers: Vec<Passenger>,

    #[serde(default, alias = "vuelos")]
    pub flights: Vec<Flight>,

    pub hotel: Option<BookableDetail>,

    /// Services, eventuals and programs, in source order.
    #[serde(default, alias = "servicios")]
    pub services: Vec<BookableDetail>,
}

fn default_confidence() -> f64 {
    crate::types::config::DEFAULT_CONFIDENCE
}

impl Reservation {
    /// Every bookable line: the hotel first, then services in order.
    pub fn details(&self) -> impl Iterator<Item = &BookableDetail> {
        self.hotel.iter().chain(self.services.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_uses_in_out_wire_names() {
        let detail = BookableDetail {
            check_in: NaiveDate::from_ymd_opt(2026, 1, 10),
            check_out: NaiveDate::from_ymd_opt(2026, 1, 15),
            nts: 5,
            base_pax: 2,
            ..Default::default()
        };
        let value = serde_json::to_value(&detail).unwrap();

        assert_eq!(value["in"], "2026-01-10");
        assert_eq!(value["out"], "2026-01-15");
        assert_eq!(value["basePax"], 2);
        assert!(value["estado"].is_null());
    }

    #[test]
    fn test_reservation_accepts_spanish_collection_aliases() {
        let reservation: Reservation = serde_json::from_value(json!({
            "pasajeros": [{"firstName": "Ana", "passengerType": "CHD"}],
            "servicios": [{"servicio": "Transfer", "nts": 0, "basePax": 1}]
        }))
        .unwrap();

        assert_eq!(reservation.passengers.len(), 1);
        assert_eq!(reservation.passengers[0].passenger_type, PassengerType::Child);
        assert_eq!(reservation.services.len(), 1);
        assert_eq!(reservation.confidence, 0.5);
    }

    #[test]
    fn test_identity_ignores_blank_document() {
        let passenger = Passenger {
            document_number: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(passenger.identity(), None);
    }

    #[test]
    fn test_details_lists_hotel_first() {
        let reservation = Reservation {
            hotel: Some(BookableDetail {
                servicio: Some("Hotel".to_string()),
                ..Default::default()
            }),
            services: vec![BookableDetail {
                servicio: Some("Transfer".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let names: Vec<_> = reservation
            .details()
            .filter_map(|d| d.servicio.as_deref())
            .collect();
        assert_eq!(names, vec!["Hotel", "Transfer"]);
    }
}
