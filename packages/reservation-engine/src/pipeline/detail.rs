//! Detail normalizer - one bookable line (hotel, service, eventual, program).

use chrono::NaiveDate;
use serde_json::Value;

use crate::pipeline::normalize::{
    normalize_code, normalize_count, normalize_date, normalize_string, pick,
};
use crate::types::codes::Estado;
use crate::types::config::NormalizeOptions;
use crate::types::reservation::BookableDetail;

/// Normalize a raw detail with default options and no estado default.
///
/// Returns `None` when `raw` is not a JSON object.
pub fn normalize_detail(raw: &Value) -> Option<BookableDetail> {
    normalize_detail_with(raw, NormalizeOptions::default(), None)
}

/// Normalize a raw detail.
///
/// `nts` is derived from `in`/`out` when both dates are known (never below
/// zero); otherwise the raw `nts` is used when numeric, else 0. An invalid or
/// missing `estado` falls back to `default_estado`.
///
/// Idempotent: feeding a serialized `BookableDetail` back in yields the same
/// detail.
pub fn normalize_detail_with(
    raw: &Value,
    options: NormalizeOptions,
    default_estado: Option<Estado>,
) -> Option<BookableDetail> {
    if !raw.is_object() {
        return None;
    }

    let check_in = normalize_date(pick(raw, &["in", "checkIn", "fechaDesde"]), options);
    let check_out = normalize_date(pick(raw, &["out", "checkOut", "fechaHasta"]), options);

    let nts = match (check_in, check_out) {
        (Some(check_in), Some(check_out)) => nights_between(check_in, check_out),
        _ => normalize_count(pick(raw, &["nts", "nights"])).unwrap_or(0),
    };

    Some(BookableDetail {
        destino: normalize_string(pick(raw, &["destino", "ciudad", "destination"])),
        check_in,
        check_out,
        nts,
        base_pax: normalize_count(pick(raw, &["basePax", "base_pax", "pax"])).unwrap_or(0),
        servicio: normalize_string(pick(raw, &["servicio", "nombre", "name"])),
        descripcion: normalize_string(pick(raw, &["descripcion", "description"])),
        estado: normalize_code(pick(raw, &["estado", "status"]), default_estado),
    })
}

/// Whole nights from `check_in` to `check_out`, floored at zero.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> u32 {
    let days = (check_out - check_in).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}
