//! Conversion of one raw detail into its canonical flat value.

use tracing::debug;

use heurist_model::{DateRange, DetailValue, FlatValue, RawDate, RawDetail};

use crate::datetime::{normalize_pair, normalize_range};
use crate::error::ConversionError;

/// Geometry type codes whose WKT is passed through: point, line, polygon,
/// rectangle, circle and multi-geometry.
const GEOMETRY_KINDS: &[&str] = &["p", "l", "pl", "r", "c", "m"];

/// Convert one detail to its flat value.
///
/// - text, number and boolean values pass through unchanged
/// - vocabulary terms yield their label
/// - record pointers yield the target id, as an integer when it parses
/// - geometries yield their WKT; an unrecognised geometry type yields null
/// - files yield the external reference URL, or null
/// - dates yield an `[earliest, latest]` pair
pub fn convert(detail: &RawDetail) -> Result<FlatValue, ConversionError> {
    let field_id = detail.field_id;
    let value = match &detail.value {
        DetailValue::Text(scalar) | DetailValue::Number(scalar) | DetailValue::Boolean(scalar) => {
            FlatValue::from(scalar.clone())
        }
        DetailValue::EnumTerm { label, .. } => label
            .clone()
            .map(FlatValue::Text)
            .ok_or(ConversionError::MissingTermLabel { field_id })?,
        DetailValue::Pointer { target_id } => {
            let target = target_id
                .as_deref()
                .ok_or(ConversionError::MissingPointerId { field_id })?;
            target
                .trim()
                .parse::<i64>()
                .map_or_else(|_| FlatValue::Text(target.to_string()), FlatValue::Integer)
        }
        DetailValue::Geo { kind, wkt } => match kind.as_deref() {
            Some(code) if GEOMETRY_KINDS.contains(&code) => {
                wkt.clone().map_or(FlatValue::Null, FlatValue::Text)
            }
            other => {
                debug!(field_id, geometry = ?other, "unrecognised geometry type");
                FlatValue::Null
            }
        },
        DetailValue::File { external_reference } => external_reference
            .clone()
            .map_or(FlatValue::Null, FlatValue::Text),
        DetailValue::Date(raw) => FlatValue::DatePair(convert_date(field_id, raw)?),
    };
    Ok(value)
}

/// The vocabulary term id of an enum detail, for the `_TRM` companion.
///
/// Non-enum details and enum details without an id yield null.
pub fn convert_term_id(detail: &RawDetail) -> Result<FlatValue, ConversionError> {
    let DetailValue::EnumTerm {
        term_id: Some(term_id),
        ..
    } = &detail.value
    else {
        return Ok(FlatValue::Null);
    };
    term_id
        .trim()
        .parse::<i64>()
        .map(FlatValue::Integer)
        .map_err(|_| ConversionError::InvalidTermId {
            field_id: detail.field_id,
            value: term_id.clone(),
        })
}

fn convert_date(field_id: i64, raw: &RawDate) -> Result<Option<DateRange>, ConversionError> {
    if let RawDate::Compound(compound) = raw {
        let missing = match (&compound.est_min_date, &compound.est_max_date) {
            (Some(_), Some(_)) => None,
            (None, _) => Some("estMinDate"),
            (_, None) => Some("estMaxDate"),
        };
        if let Some(key) = missing {
            return Err(ConversionError::MalformedCompoundDate {
                field_id,
                reason: format!("missing {key}"),
            });
        }
        return Ok(Some(normalize_pair(
            compound.est_min_date.as_ref(),
            compound.est_max_date.as_ref(),
        )));
    }
    Ok(normalize_range(raw))
}
