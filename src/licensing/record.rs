//! License records
//!
//! Flattens one upstream license object into the fields shown on the page.
//! Every nested field is optional upstream; missing values fall back to a
//! placeholder instead of failing the whole response.

use super::status::{status_label, PROCESSED};
use serde::Serialize;
use serde_json::Value;

/// Placeholder for missing text fields
pub const MISSING: &str = "-";

/// Classification id used when `idModalitat` is missing or unreadable
pub const UNKNOWN_MODALITY: i64 = -99;

/// Classification id of athlete licenses
pub const ATHLETE_MODALITY: i64 = 1;

/// One license as displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct License {
    /// `codiLlicencia`
    pub code: String,
    /// `estatLlicencia`, the raw status code
    pub status: String,
    /// "surname, given name"
    pub athlete: String,
    pub club: String,
    /// `modalitatLlicencia.idModalitat`
    pub modality_id: i64,
    pub season: String,
    /// "category | subcategory"
    pub category: String,
}

impl License {
    /// Map one JSON item. Never fails: anything missing gets its default.
    pub fn from_json(item: &Value) -> Self {
        let surname = text_at(item, "/federat/persona/cognoms");
        let name = text_at(item, "/federat/persona/nom");
        let category = text_at(item, "/modalitatLlicencia/categoriaLlicencia/nom");
        let subcategory = text_at(
            item,
            "/modalitatLlicencia/categoriaLlicencia/subCategoriaLlicencia/nom",
        );

        Self {
            code: text_at(item, "/codiLlicencia").to_string(),
            status: text_at(item, "/estatLlicencia").to_string(),
            athlete: format!("{}, {}", surname, name),
            club: text_at(item, "/club/nom").to_string(),
            modality_id: item
                .pointer("/modalitatLlicencia/idModalitat")
                .map_or(UNKNOWN_MODALITY, parse_modality),
            season: text_at(item, "/modalitatLlicencia/temporadaLlicencia/nom").to_string(),
            category: format!("{} | {}", category, subcategory),
        }
    }

    /// Map a whole response
    pub fn from_items(items: &[Value]) -> Vec<Self> {
        items.iter().map(Self::from_json).collect()
    }

    /// Competing athlete license (as opposed to coach, official, ...)
    pub fn is_athlete(&self) -> bool {
        self.modality_id == ATHLETE_MODALITY
    }

    /// License has completed administrative processing
    pub fn is_processed(&self) -> bool {
        self.status == PROCESSED
    }

    /// Catalan label for the status code
    pub fn status_label(&self) -> &'static str {
        status_label(&self.status)
    }
}

fn text_at<'a>(item: &'a Value, pointer: &str) -> &'a str {
    item.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or(MISSING)
}

// The upstream has sent `1`, `1.0` and `"1"` for this field
fn parse_modality(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral))
            .unwrap_or(UNKNOWN_MODALITY),
        Value::String(s) => s.trim().parse().unwrap_or(UNKNOWN_MODALITY),
        _ => UNKNOWN_MODALITY,
    }
}

fn integral(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then(|| f as i64)
}
