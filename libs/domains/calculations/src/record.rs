//! Stored document shape and the decoder that reads older revisions of it.
//!
//! Decoding is strict first. Documents that fail are migrated (missing
//! breakdown fields default to `0.0`, BSON datetimes become ISO strings) and
//! decoded again. [`decode_all`] skips anything still unreadable.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use mongodb::bson::{self, Bson, Document, doc};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Calculation, CostBreakdown};

const LEGACY_BREAKDOWN_FIELDS: [&str; 2] = ["daily_rate_per_man", "ground_fixing_screws"];

/// `$dateToString` equivalent of [`format_timestamp`]. BSON datetimes carry
/// milliseconds, so the last three microsecond digits are always zero.
const STORED_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.%L000+00:00";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed document: {0}")]
    Malformed(#[from] bson::de::Error),

    #[error("invalid id {0:?}")]
    InvalidId(String),

    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),
}

/// Current document layout, with no serde defaults.
#[derive(Debug, Deserialize)]
struct StoredCalculation {
    id: String,
    user_name: String,
    project_name: String,
    country: String,
    fence_type: String,
    meters: f64,
    gates: u32,
    breakdown: StoredBreakdown,
    timestamp: String,
}

#[derive(Debug, Deserialize)]
struct StoredBreakdown {
    work_days: f64,
    daily_rate_per_man: f64,
    labor_cost: f64,
    tools_cost: f64,
    supervision_cost: f64,
    flight_ticket: f64,
    ground_fixing_screws: f64,
    raw_total: f64,
    rate_per_meter: f64,
    markup_30: f64,
    markup_40: f64,
    markup_50: f64,
    markup_60: f64,
}

impl From<StoredBreakdown> for CostBreakdown {
    fn from(b: StoredBreakdown) -> Self {
        Self {
            work_days: b.work_days,
            daily_rate_per_man: b.daily_rate_per_man,
            labor_cost: b.labor_cost,
            tools_cost: b.tools_cost,
            supervision_cost: b.supervision_cost,
            flight_ticket: b.flight_ticket,
            ground_fixing_screws: b.ground_fixing_screws,
            raw_total: b.raw_total,
            rate_per_meter: b.rate_per_meter,
            markup_30: b.markup_30,
            markup_40: b.markup_40,
            markup_50: b.markup_50,
            markup_60: b.markup_60,
        }
    }
}

/// Timestamp string as stored: microsecond precision with a `+00:00`
/// offset, so string order is chronological order.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, false)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DecodeError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    // Naive ISO strings carry no offset; they were written as UTC.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| DecodeError::InvalidTimestamp(raw.to_string()))
}

/// Current document for `calculation`.
pub fn to_document(calculation: &Calculation) -> Document {
    let b = &calculation.breakdown;
    doc! {
        "id": calculation.id.to_string(),
        "user_name": calculation.user_name.as_str(),
        "project_name": calculation.project_name.as_str(),
        "country": calculation.country.as_str(),
        "fence_type": calculation.fence_type.as_str(),
        "meters": calculation.meters,
        "gates": i64::from(calculation.gates),
        "breakdown": {
            "work_days": b.work_days,
            "daily_rate_per_man": b.daily_rate_per_man,
            "labor_cost": b.labor_cost,
            "tools_cost": b.tools_cost,
            "supervision_cost": b.supervision_cost,
            "flight_ticket": b.flight_ticket,
            "ground_fixing_screws": b.ground_fixing_screws,
            "raw_total": b.raw_total,
            "rate_per_meter": b.rate_per_meter,
            "markup_30": b.markup_30,
            "markup_40": b.markup_40,
            "markup_50": b.markup_50,
            "markup_60": b.markup_60,
        },
        "timestamp": format_timestamp(&calculation.timestamp),
    }
}

/// Decodes a stored document, migrating older layouts when needed.
pub fn decode_document(document: Document) -> Result<Calculation, DecodeError> {
    let stored = match bson::from_document::<StoredCalculation>(document.clone()) {
        Ok(stored) => stored,
        Err(_) => bson::from_document::<StoredCalculation>(migrate(document))?,
    };
    into_calculation(stored)
}

/// Decodes every readable document, newest first.
///
/// Documents that cannot be decoded are logged and left out.
pub fn decode_all(documents: impl IntoIterator<Item = Document>) -> Vec<Calculation> {
    let mut calculations: Vec<Calculation> = documents
        .into_iter()
        .filter_map(|document| {
            let id = document.get_str("id").unwrap_or("<missing>").to_string();
            decode_document(document)
                .inspect_err(|err| {
                    tracing::warn!(calculation_id = %id, error = %err, "Skipping unreadable archived calculation");
                })
                .ok()
        })
        .collect();

    calculations.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    calculations
}

/// Filter and update pipeline that rewrite BSON datetime timestamps in the
/// stored string format, so the server sorts every record on one type.
pub fn timestamp_migration() -> (Document, Vec<Document>) {
    let filter = doc! { "timestamp": { "$type": "date" } };
    let pipeline = vec![doc! {
        "$set": {
            "timestamp": {
                "$dateToString": {
                    "date": "$timestamp",
                    "format": STORED_TIMESTAMP_FORMAT,
                    "timezone": "UTC",
                }
            }
        }
    }];
    (filter, pipeline)
}

/// Fills fields that older revisions did not write.
fn migrate(mut document: Document) -> Document {
    if let Ok(breakdown) = document.get_document_mut("breakdown") {
        for field in LEGACY_BREAKDOWN_FIELDS {
            if !breakdown.contains_key(field) {
                breakdown.insert(field, 0.0);
            }
        }
    }

    let legacy_timestamp = match document.get("timestamp") {
        Some(Bson::DateTime(dt)) => DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis()),
        _ => None,
    };
    if let Some(ts) = legacy_timestamp {
        document.insert("timestamp", format_timestamp(&ts));
    }

    document
}

fn into_calculation(stored: StoredCalculation) -> Result<Calculation, DecodeError> {
    let id = Uuid::parse_str(&stored.id).map_err(|_| DecodeError::InvalidId(stored.id.clone()))?;
    let timestamp = parse_timestamp(&stored.timestamp)?;

    Ok(Calculation {
        id,
        user_name: stored.user_name,
        project_name: stored.project_name,
        country: stored.country,
        fence_type: stored.fence_type,
        meters: stored.meters,
        gates: stored.gates,
        breakdown: stored.breakdown.into(),
        timestamp,
    })
}
