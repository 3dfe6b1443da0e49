//! Change detector - what differs between a new and a stored reservation.
//!
//! Values are compared in their serialized form after collapsing null and
//! empty strings to "absent" and stringifying everything else, so type drift
//! between snapshots (`"5"` vs `5`, `2.0` vs `2`) is not reported as a change.
//! Anything that cannot be compared is reported as changed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

use crate::types::change_set::{ChangeSet, PassengerChange, PassengerStatus};
use crate::types::reservation::{Passenger, Reservation};

/// Passenger fields that decide whether a paired passenger was modified.
/// `phoneNumber` is deliberately absent.
pub const PASSENGER_COMPARED_FIELDS: [&str; 10] = [
    "firstName",
    "lastName",
    "documentType",
    "documentNumber",
    "nationality",
    "dateOfBirth",
    "sex",
    "passengerType",
    "cuilCuit",
    "address",
];

/// Comparable form of a scalar: `None` for null or blank strings.
pub fn scalar_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", f as i64)),
            _ => Some(n.to_string()),
        },
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn scalar_changed<T: Serialize>(new: &T, old: &T) -> bool {
    scalar_key(&to_json(new)) != scalar_key(&to_json(old))
}

/// Key-by-key comparison of two JSON objects over the union of their keys.
/// Non-objects fall back to scalar comparison.
pub fn objects_differ(new: &Value, old: &Value) -> bool {
    match (new.as_object(), old.as_object()) {
        (Some(new_obj), Some(old_obj)) => {
            let keys: BTreeSet<&String> = new_obj.keys().chain(old_obj.keys()).collect();
            keys.into_iter().any(|key| {
                scalar_key(new_obj.get(key).unwrap_or(&Value::Null))
                    != scalar_key(old_obj.get(key).unwrap_or(&Value::Null))
            })
        }
        _ => scalar_key(new) != scalar_key(old),
    }
}

/// Comparison restricted to `keys`.
fn fields_differ(new: &Value, old: &Value, keys: &[&str]) -> bool {
    keys.iter().any(|key| {
        scalar_key(new.get(*key).unwrap_or(&Value::Null))
            != scalar_key(old.get(*key).unwrap_or(&Value::Null))
    })
}

fn optional_differ<T: Serialize>(new: Option<&T>, old: Option<&T>) -> bool {
    match (new, old) {
        (None, None) => false,
        (Some(new), Some(old)) => objects_differ(&to_json(new), &to_json(old)),
        _ => true,
    }
}

/// Positional comparison: equal length and every pair equal.
fn lists_differ<T: Serialize>(new: &[T], old: &[T]) -> bool {
    new.len() != old.len()
        || new
            .iter()
            .zip(old)
            .any(|(n, o)| objects_differ(&to_json(n), &to_json(o)))
}

/// Passengers pair one-to-one: by document number when the new one has it,
/// otherwise by position. Each old passenger pairs at most once; a new
/// passenger left without a partner, or an old one nobody claimed, is a
/// difference.
fn passengers_differ(new: &[Passenger], old: &[Passenger]) -> bool {
    if new.len() != old.len() {
        return true;
    }

    let mut used = vec![false; old.len()];
    for (index, passenger) in new.iter().enumerate() {
        let counterpart = match passenger.identity() {
            Some(document) => {
                (0..old.len()).find(|&i| !used[i] && old[i].identity() == Some(document))
            }
            None => Some(index).filter(|&i| i < old.len() && !used[i]),
        };

        let Some(i) = counterpart else {
            return true;
        };
        used[i] = true;
        if objects_differ(&to_json(passenger), &to_json(&old[i])) {
            return true;
        }
    }

    used.contains(&false)
}

/// Compare two reservations. Without a previous snapshot every flag is set.
pub fn diff(new: &Reservation, old: Option<&Reservation>) -> ChangeSet {
    let Some(old) = old else {
        return ChangeSet::all_changed();
    };

    let changes = ChangeSet {
        codigo: scalar_changed(&new.codigo, &old.codigo),
        reservation_type: scalar_changed(&new.reservation_type, &old.reservation_type),
        status: scalar_changed(&new.status, &old.status),
        client: scalar_changed(&new.client, &old.client),
        reservation_date: scalar_changed(&new.reservation_date, &old.reservation_date),
        travel_date: scalar_changed(&new.travel_date, &old.travel_date),
        tour_end_date: scalar_changed(&new.tour_end_date, &old.tour_end_date),
        seller: scalar_changed(&new.seller, &old.seller),
        currency: scalar_changed(&new.currency, &old.currency),
        exchange_rate: scalar_changed(&new.exchange_rate, &old.exchange_rate),
        commission: scalar_changed(&new.commission, &old.commission),
        net_amount: scalar_changed(&new.net_amount, &old.net_amount),
        gross_amount: scalar_changed(&new.gross_amount, &old.gross_amount),
        adults: scalar_changed(&new.adults, &old.adults),
        children: scalar_changed(&new.children, &old.children),
        infants: scalar_changed(&new.infants, &old.infants),
        trip_name: scalar_changed(&new.trip_name, &old.trip_name),
        product_code: scalar_changed(&new.product_code, &old.product_code),
        contact_name: scalar_changed(&new.contact_name, &old.contact_name),
        contact_email: scalar_changed(&new.contact_email, &old.contact_email),
        contact_phone: scalar_changed(&new.contact_phone, &old.contact_phone),
        hotel: optional_differ(new.hotel.as_ref(), old.hotel.as_ref()),
        services: lists_differ(&new.services, &old.services),
        flights: lists_differ(&new.flights, &old.flights),
        passengers: passengers_differ(&new.passengers, &old.passengers),
    };

    tracing::debug!(changed = ?changes.changed_fields(), "Computed change-set");
    changes
}

/// Compare against a stored snapshot in JSON form.
///
/// A missing or null snapshot means full-create semantics. A snapshot that
/// does not decode as a reservation cannot be trusted for skipping fields,
/// so it is treated as entirely different.
pub fn diff_stored(new: &Reservation, stored: Option<&Value>) -> ChangeSet {
    let Some(stored) = stored.filter(|v| !v.is_null()) else {
        return ChangeSet::all_changed();
    };

    match Reservation::deserialize(stored) {
        Ok(old) => diff(new, Some(&old)),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Stored reservation snapshot is not decodable, treating as changed"
            );
            ChangeSet::all_changed()
        }
    }
}

/// Passengers the edit flow has to write.
///
/// A passenger whose document number has no match in `old` (or who has no
/// document number) is new. A paired passenger is modified when any of
/// [`PASSENGER_COMPARED_FIELDS`] differs. Unchanged passengers are omitted.
pub fn diff_passengers(new: &[Passenger], old: &[Passenger]) -> Vec<PassengerChange> {
    new.iter()
        .filter_map(|passenger| {
            let previous = passenger
                .identity()
                .and_then(|document| old.iter().find(|o| o.identity() == Some(document)));

            let status = match previous {
                None => PassengerStatus::New,
                Some(previous) => {
                    if fields_differ(
                        &to_json(passenger),
                        &to_json(previous),
                        &PASSENGER_COMPARED_FIELDS,
                    ) {
                        PassengerStatus::Modified
                    } else {
                        return None;
                    }
                }
            };

            tracing::debug!(
                passenger = %passenger.display_name(),
                ?status,
                "Passenger needs writing"
            );
            Some(PassengerChange::new(passenger.clone(), status))
        })
        .collect()
}

/// Everything an edit flow needs from one comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditPlan {
    pub changes: ChangeSet,
    pub passengers: Vec<PassengerChange>,
}

/// Change-set plus per-passenger changes. Without a previous snapshot every
/// passenger is new.
pub fn plan_edit(new: &Reservation, old: Option<&Reservation>) -> EditPlan {
    let previous = old.map_or(&[][..], |o| o.passengers.as_slice());
    EditPlan {
        changes: diff(new, old),
        passengers: diff_passengers(&new.passengers, previous),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::codes::DocumentType;
    use crate::types::reservation::{BookableDetail, Flight};
    use chrono::NaiveDate;
    use serde_json::json;

    fn passenger(first: &str, document: Option<&str>) -> Passenger {
        Passenger {
            first_name: Some(first.to_string()),
            last_name: Some("Gómez".to_string()),
            document_type: Some(DocumentType::Dni),
            document_number: document.map(str::to_string),
            ..Default::default()
        }
    }

    fn reservation() -> Reservation {
        Reservation {
            codigo: Some("R-1001".to_string()),
            client: Some("Acme Viajes".to_string()),
            travel_date: NaiveDate::from_ymd_opt(2026, 1, 10),
            adults: Some(2),
            exchange_rate: Some(1045.0),
            passengers: vec![
                passenger("Ana", Some("30123456")),
                passenger("Luis", Some("28999111")),
            ],
            flights: vec![Flight {
                flight_number: "AR1300".to_string(),
                airline: None,
                origin: "AEP".to_string(),
                destination: "MDZ".to_string(),
                departure_date: NaiveDate::from_ymd_opt(2026, 1, 10),
                arrival_date: None,
                departure_time: Some("07:45".to_string()),
                arrival_time: None,
            }],
            hotel: Some(BookableDetail {
                servicio: Some("Hotel Mendoza Plaza".to_string()),
                nts: 5,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_scalar_key_collapses_absent_and_drift() {
        assert_eq!(scalar_key(&Value::Null), None);
        assert_eq!(scalar_key(&json!("  ")), None);
        assert_eq!(scalar_key(&json!(5)), scalar_key(&json!("5")));
        assert_eq!(scalar_key(&json!(2.0)), scalar_key(&json!(2)));
        assert_ne!(scalar_key(&json!(2.5)), scalar_key(&json!(2)));
    }

    #[test]
    fn test_no_previous_snapshot_sets_everything() {
        assert!(diff(&reservation(), None).all_set());
    }

    #[test]
    fn test_identical_snapshots_have_no_changes() {
        let r = reservation();
        assert!(!diff(&r, Some(&r)).any_changed());
    }

    #[test]
    fn test_header_change_flags_only_that_field() {
        let old = reservation();
        let mut new = old.clone();
        new.client = Some("Otra Agencia".to_string());

        let changes = diff(&new, Some(&old));
        assert!(changes.client);
        assert_eq!(changes.changed_fields(), vec!["client".to_string()]);
    }

    #[test]
    fn test_blank_and_missing_are_equal() {
        let old = reservation();
        let mut new = old.clone();
        new.seller = Some(String::new());

        assert!(!diff(&new, Some(&old)).seller);
    }

    #[test]
    fn test_hotel_presence_and_fields() {
        let old = reservation();

        let mut removed = old.clone();
        removed.hotel = None;
        assert!(diff(&removed, Some(&old)).hotel);

        let mut edited = old.clone();
        if let Some(hotel) = edited.hotel.as_mut() {
            hotel.nts = 6;
        }
        assert!(diff(&edited, Some(&old)).hotel);

        let mut neither = old.clone();
        neither.hotel = None;
        assert!(!diff(&neither, Some(&removed)).hotel);
    }

    #[test]
    fn test_collection_length_change() {
        let old = reservation();
        let mut new = old.clone();
        new.flights.clear();
        new.services.push(BookableDetail::default());

        let changes = diff(&new, Some(&old));
        assert!(changes.flights);
        assert!(changes.services);
        assert!(!changes.passengers);
    }

    #[test]
    fn test_passengers_paired_by_document_not_position() {
        let old = reservation();
        let mut new = old.clone();
        new.passengers.reverse();

        assert!(!diff(&new, Some(&old)).passengers);
    }

    #[test]
    fn test_passenger_with_unknown_document_is_structural_change() {
        let old = reservation();
        let mut new = old.clone();
        new.passengers[1].document_number = Some("11111111".to_string());

        assert!(diff(&new, Some(&old)).passengers);
    }

    #[test]
    fn test_old_passenger_pairs_only_once() {
        let old = reservation();
        let mut new = old.clone();
        new.passengers[1] = new.passengers[0].clone();

        assert!(diff(&new, Some(&old)).passengers);
    }

    #[test]
    fn test_diff_passengers_tags_new_and_modified() {
        let old = vec![passenger("Ana", Some("30123456")), passenger("Luis", Some("28999111"))];
        let mut modified = passenger("Luis", Some("28999111"));
        modified.nationality = Some("URUGUAY".to_string());
        let new = vec![
            passenger("Ana", Some("30123456")),
            modified,
            passenger("Sofía", Some("45000111")),
            passenger("Bebé", None),
        ];

        let changes = diff_passengers(&new, &old);
        assert_eq!(changes.len(), 3);
        assert!(changes[0].is_modified);
        assert_eq!(changes[0].passenger.first_name.as_deref(), Some("Luis"));
        assert!(changes[1].is_new);
        assert!(changes[2].is_new);
    }

    #[test]
    fn test_phone_number_is_not_a_modification() {
        let old = vec![passenger("Ana", Some("30123456"))];
        let mut new = old.clone();
        new[0].phone_number = Some("+54 261 555 0101".to_string());

        assert!(diff_passengers(&new, &old).is_empty());
    }

    #[test]
    fn test_diff_stored_decodes_snapshot() {
        let r = reservation();
        let stored = serde_json::to_value(&r).unwrap();
        assert!(!diff_stored(&r, Some(&stored)).any_changed());
    }

    #[test]
    fn test_diff_stored_tolerates_numeric_drift() {
        let r = reservation();
        let mut stored = serde_json::to_value(&r).unwrap();
        stored["exchangeRate"] = json!(1045);
        assert!(!diff_stored(&r, Some(&stored)).exchange_rate);
    }

    #[test]
    fn test_diff_stored_undecodable_is_all_changed() {
        let r = reservation();
        let stored = json!({"passengers": "not a list"});
        assert!(diff_stored(&r, Some(&stored)).all_set());
        assert!(diff_stored(&r, Some(&Value::Null)).all_set());
        assert!(diff_stored(&r, None).all_set());
    }

    #[test]
    fn test_plan_edit_without_previous() {
        let r = reservation();
        let plan = plan_edit(&r, None);
        assert!(plan.changes.all_set());
        assert_eq!(plan.passengers.len(), 2);
        assert!(plan.passengers.iter().all(|p| p.is_new));
    }
}
