use serde::{Deserialize, Serialize};

use crate::{CalendarDay, CoreError, ValidationError};

/// One daily price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PricePointFields")]
pub struct PricePoint {
    pub day: CalendarDay,
    pub price: f64,
}

impl PricePoint {
    pub fn new(day: CalendarDay, price: f64) -> Result<Self, ValidationError> {
        validate_price(price)?;
        Ok(Self { day, price })
    }
}

#[derive(Deserialize)]
struct PricePointFields {
    day: CalendarDay,
    price: f64,
}

impl TryFrom<PricePointFields> for PricePoint {
    type Error = ValidationError;

    fn try_from(value: PricePointFields) -> Result<Self, Self::Error> {
        Self::new(value.day, value.price)
    }
}

/// Raw `[timestampMillis, price]` pair as produced by the price feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(i64, f64)", into = "(i64, f64)")]
pub struct PriceRecord {
    pub timestamp_millis: i64,
    pub price: f64,
}

impl PriceRecord {
    pub const fn new(timestamp_millis: i64, price: f64) -> Self {
        Self {
            timestamp_millis,
            price,
        }
    }
}

impl From<(i64, f64)> for PriceRecord {
    fn from((timestamp_millis, price): (i64, f64)) -> Self {
        Self::new(timestamp_millis, price)
    }
}

impl From<PriceRecord> for (i64, f64) {
    fn from(value: PriceRecord) -> Self {
        (value.timestamp_millis, value.price)
    }
}

/// Price history document: `{"prices": [[ts, price], ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    #[serde(default)]
    pub prices: Vec<PriceRecord>,
}

impl PriceHistory {
    pub fn new(prices: Vec<PriceRecord>) -> Self {
        Self { prices }
    }

    pub fn from_json(input: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(input)?)
    }
}

pub(crate) fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() {
        return Err(ValidationError::NonFiniteValue { field: "price" });
    }
    if price < 0.0 {
        return Err(ValidationError::NegativeValue { field: "price" });
    }
    Ok(())
}
