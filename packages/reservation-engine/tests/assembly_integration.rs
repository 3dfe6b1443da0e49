//! Integration tests for assembling canonical reservations from raw
//! extraction output.

use chrono::NaiveDate;
use reservation_engine::{
    assemble_reservation, parse_extraction,
    testing::{fixed_today, sample_extraction},
    AssemblyConfig, EntityCollection, Estado, PassengerType, RejectionReason, Sex,
};
use serde_json::json;

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[test]
fn test_sample_extraction_assembles() {
    let assembly = assemble_reservation(&sample_extraction(), &AssemblyConfig::default(), fixed_today());
    let reservation = &assembly.reservation;

    assert_eq!(reservation.codigo.as_deref(), Some("R-20931"));
    assert_eq!(reservation.reservation_type.as_deref(), Some("FIT"));
    assert_eq!(reservation.client.as_deref(), Some("Acme Viajes"));
    assert_eq!(reservation.currency.as_deref(), Some("USD"));
    assert_eq!(reservation.children, Some(1));
    assert_eq!(reservation.contact_email.as_deref(), Some("reservas@acmeviajes.com.ar"));
    assert_eq!(reservation.confidence, 0.92);

    // Date defaults
    assert_eq!(reservation.reservation_date, Some(fixed_today()));
    assert_eq!(reservation.travel_date, date(2026, 1, 10));
    assert_eq!(reservation.tour_end_date, date(2026, 1, 15));
}

#[test]
fn test_sample_passengers() {
    let assembly = assemble_reservation(&sample_extraction(), &AssemblyConfig::default(), fixed_today());
    let passengers = &assembly.reservation.passengers;

    assert_eq!(passengers.len(), 3);
    assert_eq!(passengers[0].document_number.as_deref(), Some("30123456"));
    assert_eq!(passengers[0].nationality.as_deref(), Some("ARGENTINA"));
    assert_eq!(passengers[0].sex, Some(Sex::Female));
    assert_eq!(passengers[0].passenger_type, PassengerType::Adult);
    assert_eq!(passengers[2].passenger_type, PassengerType::Child);

    let dropped = assembly.rejected_from(EntityCollection::Passengers);
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped[0].index, 3);
    assert_eq!(dropped[0].reason, RejectionReason::MissingName);
}

#[test]
fn test_sample_flights_keep_only_complete_segments() {
    let assembly = assemble_reservation(&sample_extraction(), &AssemblyConfig::default(), fixed_today());
    let flights = &assembly.reservation.flights;

    assert_eq!(flights.len(), 1);
    assert_eq!(flights[0].flight_number, "AR1300");
    assert_eq!(flights[0].origin, "AEP");

    let dropped = assembly.rejected_from(EntityCollection::Flights);
    assert_eq!(dropped.len(), 1);
    assert_eq!(dropped[0].raw["flightNumber"], "G37486");
}

#[test]
fn test_lone_incomplete_flight_yields_no_flights() {
    let raw = json!({"flights": [{"flightNumber": "G37486", "origin": "GRU"}]});
    let assembly = assemble_reservation(&raw, &AssemblyConfig::default(), fixed_today());

    assert_eq!(assembly.reservation.flights.len(), 0);
    assert!(assembly.has_rejections());
}

#[test]
fn test_sample_details() {
    let assembly = assemble_reservation(&sample_extraction(), &AssemblyConfig::default(), fixed_today());
    let reservation = &assembly.reservation;

    let hotel = reservation.hotel.as_ref().unwrap();
    assert_eq!(hotel.check_in, date(2026, 1, 10));
    assert_eq!(hotel.nts, 5);
    assert_eq!(hotel.estado, Some(Estado::Ok));

    assert_eq!(reservation.services.len(), 2);
    assert_eq!(
        reservation.services[1].servicio.as_deref(),
        Some("Cena show bodega")
    );
    assert_eq!(reservation.services[1].estado, None);
    assert_eq!(reservation.details().count(), 3);
}

#[test]
fn test_month_first_option_changes_ambiguous_dates() {
    let config = AssemblyConfig {
        normalize: reservation_engine::NormalizeOptions::month_first(),
        ..Default::default()
    };
    let raw = json!({"hotel": {"in": "03/04/2026", "out": "03/09/2026"}});
    let assembly = assemble_reservation(&raw, &config, fixed_today());
    let hotel = assembly.reservation.hotel.unwrap();

    assert_eq!(hotel.check_in, date(2026, 3, 4));
    assert_eq!(hotel.nts, 5);
}

#[test]
fn test_reassembling_canonical_output_is_a_no_op() {
    let config = AssemblyConfig::default();
    let first = assemble_reservation(&sample_extraction(), &config, fixed_today());
    let serialized = serde_json::to_value(&first.reservation).unwrap();

    let second = assemble_reservation(&serialized, &config, fixed_today());
    assert_eq!(second.reservation, first.reservation);
    assert!(!second.has_rejections());
}

#[test]
fn test_parse_then_assemble() {
    let raw = parse_extraction(
        r#"{"client": "Acme", "passengers": [{"lastName": "Pérez"}], "travelDate": "2026-02-01"}"#,
    )
    .unwrap();
    let assembly = assemble_reservation(&raw, &AssemblyConfig::default(), fixed_today());

    assert_eq!(assembly.reservation.passengers.len(), 1);
    assert_eq!(assembly.reservation.travel_date, date(2026, 2, 1));
    assert_eq!(assembly.reservation.tour_end_date, None);
}
