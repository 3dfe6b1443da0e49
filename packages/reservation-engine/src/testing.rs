//! Testing utilities: fixed dates, sample extractions and row builders.
//!
//! Useful for applications that embed the engine and want realistic inputs
//! without calling an extraction model.

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::types::candidate::CandidateRow;
use crate::types::codes::DocumentType;
use crate::types::reservation::Passenger;

/// Reference "today" used by fixtures.
pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap_or_default()
}

/// A realistic, slightly messy extraction: mixed date layouts, lowercase
/// codes, one passenger without a name and one incomplete flight.
pub fn sample_extraction() -> Value {
    json!({
        "codigo": "R-20931",
        "reservationType": "fit",
        "cliente": "  Acme Viajes ",
        "vendedor": "MARTA",
        "currency": "usd",
        "exchangeRate": 1045.5,
        "adults": 2,
        "children": "1",
        "contactEmail": "Reservas@AcmeViajes.com.ar",
        "confidence": 0.92,
        "passengers": [
            {
                "firstName": "Ana",
                "lastName": "Gómez",
                "documentType": "dni",
                "documentNumber": 30123456,
                "nationality": "argentina",
                "dateOfBirth": "21/08/1990",
                "sex": "f",
                "passengerType": "ADT"
            },
            {
                "firstName": "Luis",
                "lastName": "Gómez",
                "documentType": "DNI",
                "documentNumber": "28999111",
                "passengerType": "ADU",
                "phoneNumber": "+54 261 555 0101"
            },
            {
                "firstName": "Sofía",
                "lastName": "Gómez",
                "passengerType": "CHD"
            },
            {
                "documentNumber": "99999999"
            }
        ],
        "flights": [
            {
                "flightNumber": "AR 1300",
                "airline": "Aerolíneas Argentinas",
                "origin": "aep",
                "destination": "MDZ",
                "departureDate": "2026-01-10",
                "departureTime": "07:45",
                "arrivalTime": "09:35"
            },
            {
                "flightNumber": "G37486",
                "origin": "GRU"
            }
        ],
        "hotel": {
            "destino": "Mendoza",
            "in": "10/01/2026",
            "out": "2026-01-15",
            "basePax": 2,
            "servicio": "Hotel Mendoza Plaza",
            "descripcion": "DBL",
            "estado": "ok"
        },
        "services": [
            {
                "destino": "Mendoza",
                "in": "2026-01-10",
                "servicio": "Transfer aeropuerto hotel",
                "basePax": 3,
                "estado": "RQ"
            }
        ],
        "eventual": {
            "destino": "Mendoza",
            "in": "2026-01-12",
            "servicio": "Cena show bodega",
            "basePax": 2
        }
    })
}

/// Hotel catalog row.
pub fn hotel_row(name: &str, city: &str) -> CandidateRow {
    CandidateRow::new()
        .with("nombre_hotel", name)
        .with("ciudad", city)
}

/// Service catalog row.
pub fn service_row(name: &str, city: &str, provider: &str) -> CandidateRow {
    CandidateRow::new()
        .with("nombre", name)
        .with("ciudad", city)
        .with("proveedor", provider)
}

/// Program (package) catalog row.
pub fn program_row(code: &str, name: &str, city: &str) -> CandidateRow {
    CandidateRow::new()
        .with("codigo", code)
        .with("nombre", name)
        .with("ciudad", city)
}

/// Adult passenger with a DNI.
pub fn passenger(first: &str, last: &str, document: &str) -> Passenger {
    Passenger {
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        document_type: Some(DocumentType::Dni),
        document_number: Some(document.to_string()),
        ..Default::default()
    }
}
