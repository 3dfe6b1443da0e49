//! Reservation assembler - raw extraction JSON to a canonical reservation.
//!
//! Field aliases (Spanish names, legacy single-object details, `ADT`) are
//! resolved here, once. Everything downstream only sees the canonical shape.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{EngineError, Result};
use crate::pipeline::detail::normalize_detail_with;
use crate::pipeline::normalize::{
    normalize_code, normalize_confidence, normalize_count, normalize_date, normalize_email,
    normalize_iata, normalize_identifier, normalize_number, normalize_string, normalize_time,
    normalize_upper, pick,
};
use crate::types::assembly::{Assembly, EntityCollection, RejectedEntity, RejectionReason};
use crate::types::codes::PassengerType;
use crate::types::config::{AssemblyConfig, NormalizeOptions};
use crate::types::reservation::{BookableDetail, Flight, Passenger, Reservation};

/// Legacy single-object detail fields, appended after the `services` array
/// in this order.
const LEGACY_DETAIL_FIELDS: &[&str] = &["servicio", "eventual", "programa"];

/// Parse raw extraction text into a JSON object.
pub fn parse_extraction(json: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(json)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(EngineError::NotAnObject {
            found: json_type_name(&value),
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Assemble using the local clock for the reservation-date default.
pub fn assemble_reservation_today(raw: &Value, config: &AssemblyConfig) -> Assembly {
    let today = chrono::Local::now().date_naive();
    assemble_reservation(raw, config, today)
}

/// Build a canonical reservation from raw extraction output.
///
/// Incomplete passengers, flights and details are dropped from the
/// reservation and listed in [`Assembly::rejected`]. Date defaults apply in
/// order and never overwrite an explicit value: `reservationDate` → `today`,
/// `travelDate` → `hotel.in`, `tourEndDate` → `hotel.out`.
pub fn assemble_reservation(raw: &Value, config: &AssemblyConfig, today: NaiveDate) -> Assembly {
    let options = config.normalize;
    let mut rejected = Vec::new();

    let passengers = collect_passengers(raw, options, &mut rejected);
    let flights = collect_flights(raw, options, &mut rejected);
    let hotel = collect_hotel(raw, config, &mut rejected);
    let services = collect_services(raw, config, &mut rejected);

    let mut reservation = Reservation {
        codigo: normalize_identifier(pick(raw, &["codigo", "code", "reservationCode"])),
        reservation_type: normalize_upper(pick(raw, &["reservationType", "tipoReserva"])),
        status: normalize_string(pick(raw, &["status", "estadoReserva"])),
        client: normalize_string(pick(raw, &["client", "cliente"])),
        reservation_date: normalize_date(pick(raw, &["reservationDate", "fechaReserva"]), options),
        travel_date: normalize_date(pick(raw, &["travelDate", "fechaViaje"]), options),
        tour_end_date: normalize_date(pick(raw, &["tourEndDate", "fechaFin"]), options),
        seller: normalize_string(pick(raw, &["seller", "vendedor"])),
        currency: normalize_upper(pick(raw, &["currency", "moneda"])),
        exchange_rate: normalize_number(pick(raw, &["exchangeRate", "tipoCambio"])),
        commission: normalize_number(pick(raw, &["commission", "comision"])),
        net_amount: normalize_number(pick(raw, &["netAmount", "montoNeto"])),
        gross_amount: normalize_number(pick(raw, &["grossAmount", "montoBruto"])),
        adults: normalize_count(pick(raw, &["adults", "adultos"])),
        children: normalize_count(pick(raw, &["children", "menores"])),
        infants: normalize_count(pick(raw, &["infants", "infantes"])),
        trip_name: normalize_string(pick(raw, &["tripName", "nombreViaje"])),
        product_code: normalize_identifier(pick(raw, &["productCode", "codigoProducto"])),
        contact_name: normalize_string(pick(raw, &["contactName", "contacto"])),
        contact_email: normalize_email(pick(raw, &["contactEmail", "email"])),
        contact_phone: normalize_identifier(pick(raw, &["contactPhone", "telefono"])),
        confidence: normalize_confidence(pick(raw, &["confidence"]), config.default_confidence),
        passengers,
        flights,
        hotel,
        services,
    };

    apply_date_defaults(&mut reservation, today);

    tracing::debug!(
        passengers = reservation.passengers.len(),
        flights = reservation.flights.len(),
        services = reservation.services.len(),
        has_hotel = reservation.hotel.is_some(),
        rejected = rejected.len(),
        "Assembled reservation"
    );

    Assembly {
        reservation,
        rejected,
    }
}

/// One-way defaults, applied in this exact order.
fn apply_date_defaults(reservation: &mut Reservation, today: NaiveDate) {
    if reservation.reservation_date.is_none() {
        reservation.reservation_date = Some(today);
    }

    let (hotel_in, hotel_out) = reservation
        .hotel
        .as_ref()
        .map_or((None, None), |h| (h.check_in, h.check_out));

    if reservation.travel_date.is_none() {
        reservation.travel_date = hotel_in;
    }
    if reservation.tour_end_date.is_none() {
        reservation.tour_end_date = hotel_out;
    }
}

/// Elements of a collection field. A lone value counts as a one-element list.
fn items(value: &Value) -> Vec<&Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(elements) => elements.iter().collect(),
        other => vec![other],
    }
}

fn reject(
    rejected: &mut Vec<RejectedEntity>,
    collection: EntityCollection,
    index: usize,
    reason: RejectionReason,
    raw: &Value,
) {
    tracing::debug!(?collection, index, ?reason, "Dropping incomplete entity");
    rejected.push(RejectedEntity {
        collection,
        index,
        reason,
        raw: raw.clone(),
    });
}

fn collect_passengers(
    raw: &Value,
    options: NormalizeOptions,
    rejected: &mut Vec<RejectedEntity>,
) -> Vec<Passenger> {
    let mut passengers = Vec::new();
    for (index, item) in items(pick(raw, &["passengers", "pasajeros"])).into_iter().enumerate() {
        match normalize_passenger(item, options) {
            Ok(passenger) => passengers.push(passenger),
            Err(reason) => reject(rejected, EntityCollection::Passengers, index, reason, item),
        }
    }
    passengers
}

fn collect_flights(
    raw: &Value,
    options: NormalizeOptions,
    rejected: &mut Vec<RejectedEntity>,
) -> Vec<Flight> {
    let mut flights = Vec::new();
    for (index, item) in items(pick(raw, &["flights", "vuelos"])).into_iter().enumerate() {
        match normalize_flight(item, options) {
            Ok(flight) => flights.push(flight),
            Err(reason) => reject(rejected, EntityCollection::Flights, index, reason, item),
        }
    }
    flights
}

fn collect_hotel(
    raw: &Value,
    config: &AssemblyConfig,
    rejected: &mut Vec<RejectedEntity>,
) -> Option<BookableDetail> {
    let value = pick(raw, &["hotel"]);
    if value.is_null() {
        return None;
    }

    let hotel = normalize_detail_with(value, config.normalize, config.default_estado);
    if hotel.is_none() {
        reject(
            rejected,
            EntityCollection::Hotel,
            0,
            RejectionReason::NotAnObject,
            value,
        );
    }
    hotel
}

/// The `services` array first, then the legacy single-object fields.
fn collect_services(
    raw: &Value,
    config: &AssemblyConfig,
    rejected: &mut Vec<RejectedEntity>,
) -> Vec<BookableDetail> {
    let mut sources = items(pick(raw, &["services", "servicios"]));
    for field in LEGACY_DETAIL_FIELDS {
        sources.extend(items(pick(raw, &[*field])));
    }

    let mut services = Vec::with_capacity(sources.len());
    for (index, item) in sources.into_iter().enumerate() {
        match normalize_detail_with(item, config.normalize, config.default_estado) {
            Some(detail) => services.push(detail),
            None => reject(
                rejected,
                EntityCollection::Services,
                index,
                RejectionReason::NotAnObject,
                item,
            ),
        }
    }
    services
}

/// Normalize one passenger. Requires a first or last name.
pub fn normalize_passenger(
    raw: &Value,
    options: NormalizeOptions,
) -> std::result::Result<Passenger, RejectionReason> {
    if !raw.is_object() {
        return Err(RejectionReason::NotAnObject);
    }

    let first_name = normalize_string(pick(raw, &["firstName", "nombre"]));
    let last_name = normalize_string(pick(raw, &["lastName", "apellido"]));
    if first_name.is_none() && last_name.is_none() {
        return Err(RejectionReason::MissingName);
    }

    Ok(Passenger {
        first_name,
        last_name,
        document_type: normalize_code(pick(raw, &["documentType", "tipoDocumento"]), None),
        document_number: normalize_identifier(pick(raw, &["documentNumber", "numeroDocumento"])),
        nationality: normalize_upper(pick(raw, &["nationality", "nacionalidad"])),
        date_of_birth: normalize_date(pick(raw, &["dateOfBirth", "fechaNacimiento"]), options),
        sex: normalize_code(pick(raw, &["sex", "sexo"]), None),
        passenger_type: normalize_code(
            pick(raw, &["passengerType", "tipoPasajero"]),
            Some(PassengerType::Adult),
        )
        .unwrap_or_default(),
        cuil_cuit: normalize_identifier(pick(raw, &["cuilCuit", "cuil", "cuit"])),
        address: normalize_string(pick(raw, &["address", "direccion"])),
        phone_number: normalize_identifier(pick(raw, &["phoneNumber", "telefono", "phone"])),
    })
}

/// Normalize one flight. Flight number, origin and destination must all
/// survive normalization; a flight is never emitted partially.
pub fn normalize_flight(
    raw: &Value,
    options: NormalizeOptions,
) -> std::result::Result<Flight, RejectionReason> {
    if !raw.is_object() {
        return Err(RejectionReason::NotAnObject);
    }

    let flight_number = normalize_identifier(pick(raw, &["flightNumber", "numeroVuelo"]))
        .map(|n| n.split_whitespace().collect::<String>().to_uppercase());
    let origin = normalize_iata(pick(raw, &["origin", "origen"]));
    let destination = normalize_iata(pick(raw, &["destination", "destino"]));

    let (flight_number, origin, destination) = match (flight_number, origin, destination) {
        (Some(number), Some(origin), Some(destination)) => (number, origin, destination),
        (number, origin, destination) => {
            let fields = [
                ("flightNumber", number.is_none()),
                ("origin", origin.is_none()),
                ("destination", destination.is_none()),
            ]
            .into_iter()
            .filter(|(_, missing)| *missing)
            .map(|(name, _)| name.to_string())
            .collect();
            return Err(RejectionReason::MissingFields { fields });
        }
    };

    Ok(Flight {
        flight_number,
        airline: normalize_string(pick(raw, &["airline", "aerolinea"])),
        origin,
        destination,
        departure_date: normalize_date(pick(raw, &["departureDate", "fechaSalida"]), options),
        arrival_date: normalize_date(pick(raw, &["arrivalDate", "fechaLlegada"]), options),
        departure_time: normalize_time(pick(raw, &["departureTime", "horaSalida"])),
        arrival_time: normalize_time(pick(raw, &["arrivalTime", "horaLlegada"])),
    })
}
