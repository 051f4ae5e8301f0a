//! Fence installation pricing.
//!
//! [`PricingEngine::compute_estimate`] is a pure function of the request and
//! the injected [`RateTables`]: no I/O, no clock, no randomness.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::models::{CalculationRequest, CostBreakdown};
use crate::rates::RateTables;

/// Substituted for countries whose table wage is exactly zero
pub const ZERO_WAGE_FALLBACK: f64 = 15.0;
pub const FLIGHT_TICKET: f64 = 500.0;

const GATE_DAYS: f64 = 0.25;
const SETUP_CLEANUP_DAYS: f64 = 1.0;
const LABOR_RATE_MULTIPLIER: f64 = 2.0;
const HOURS_PER_DAY: f64 = 8.0;
const CREW_FACTOR: f64 = 8.0;
const TOOLS_BASE: f64 = 200.0;
const TOOLS_PER_DAY: f64 = 100.0;
const SUPERVISION_PER_DAY: f64 = 250.0;
const SCREWS_PER_METER: f64 = 0.78;
const MARKUPS: [f64; 4] = [1.30, 1.40, 1.50, 1.60];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("Invalid country selected: {0}")]
    InvalidCountry(String),

    #[error("Invalid fence type: {0}")]
    InvalidFenceType(String),

    #[error("Meters must be a finite number greater than zero, got {0}")]
    InvalidMeters(f64),
}

#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    rates: RateTables,
}

impl PricingEngine {
    pub fn new(rates: RateTables) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &RateTables {
        &self.rates
    }

    pub fn compute_estimate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CostBreakdown, PricingError> {
        let wage = self
            .rates
            .wage(&request.country)
            .ok_or_else(|| PricingError::InvalidCountry(request.country.clone()))?;
        let daily_capacity = self
            .rates
            .daily_capacity(&request.fence_type)
            .ok_or_else(|| PricingError::InvalidFenceType(request.fence_type.clone()))?;

        let meters = request.meters;
        if !meters.is_finite() || meters <= 0.0 {
            return Err(PricingError::InvalidMeters(meters));
        }

        let min_wage = if wage == 0.0 { ZERO_WAGE_FALLBACK } else { wage };

        let fence_days = meters / f64::from(daily_capacity);
        let gate_days = f64::from(request.gates) * GATE_DAYS;
        let work_days = (fence_days + gate_days + SETUP_CLEANUP_DAYS).ceil();

        let hourly_labor_rate = LABOR_RATE_MULTIPLIER * min_wage;
        let daily_rate_per_man = hourly_labor_rate * HOURS_PER_DAY;
        // Second factor of 8 on top of daily_rate_per_man. Must keep matching
        // already archived quotes.
        let daily_labor_cost = CREW_FACTOR * daily_rate_per_man;
        let labor_cost = daily_labor_cost * work_days;

        let tools_cost = TOOLS_BASE + TOOLS_PER_DAY * work_days;
        let supervision_cost = SUPERVISION_PER_DAY * work_days;
        let ground_fixing_screws = meters * SCREWS_PER_METER;

        let raw_total =
            labor_cost + tools_cost + supervision_cost + FLIGHT_TICKET + ground_fixing_screws;
        let rate_per_meter = raw_total / meters;

        let [markup_30, markup_40, markup_50, markup_60] = MARKUPS.map(|m| round2(raw_total * m));

        Ok(CostBreakdown {
            work_days,
            daily_rate_per_man: round2(daily_rate_per_man),
            labor_cost: round2(labor_cost),
            tools_cost: round2(tools_cost),
            supervision_cost: round2(supervision_cost),
            flight_ticket: FLIGHT_TICKET,
            ground_fixing_screws: round2(ground_fixing_screws),
            raw_total: round2(raw_total),
            rate_per_meter: round2(rate_per_meter),
            markup_30,
            markup_40,
            markup_50,
            markup_60,
        })
    }
}

/// Rounds half-to-even at 2 places, on the exact binary value of `value`.
pub fn round2(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn request(country: &str, fence_type: &str, meters: f64, gates: u32) -> CalculationRequest {
        CalculationRequest {
            user_name: "Ana".to_string(),
            project_name: "Paddock".to_string(),
            country: country.to_string(),
            fence_type: fence_type.to_string(),
            meters,
            gates,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.011,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_uk_oval_reference_quote() {
        let engine = PricingEngine::default();
        let b = engine
            .compute_estimate(&request("United Kingdom", "OR", 272.0, 4))
            .unwrap();

        assert_eq!(b.work_days, 4.0);
        assert_close(b.daily_rate_per_man, 195.36);
        assert_close(b.labor_cost, 6251.52);
        assert_eq!(b.tools_cost, 600.0);
        assert_eq!(b.supervision_cost, 1000.0);
        assert_eq!(b.flight_ticket, 500.0);
        assert_close(b.ground_fixing_screws, 212.16);
        assert_close(b.raw_total, 8563.68);
        assert_close(b.rate_per_meter, 31.48);
        assert_close(b.markup_30, 11132.78);
        assert_close(b.markup_40, 11989.15);
        assert_close(b.markup_50, 12845.52);
        assert_close(b.markup_60, 13701.89);
    }

    #[test]
    fn test_raw_total_is_sum_of_components() {
        let engine = PricingEngine::default();
        let b = engine
            .compute_estimate(&request("Germany", "PR2", 517.5, 3))
            .unwrap();

        let sum = b.labor_cost + b.tools_cost + b.supervision_cost + b.flight_ticket
            + b.ground_fixing_screws;
        assert_close(b.raw_total, sum);
        assert_close(b.markup_50, b.raw_total * 1.5);
    }

    #[test]
    fn test_work_days_is_ceiling() {
        let engine = PricingEngine::default();
        let cases = [
            (136.0, 0, 2.0),
            (137.0, 0, 3.0),
            (1.0, 0, 2.0),
            (272.0, 4, 4.0),
            (100.0, 5, 3.0),
        ];
        for (meters, gates, expected) in cases {
            let b = engine
                .compute_estimate(&request("Spain", "OR", meters, gates))
                .unwrap();
            assert_eq!(b.work_days, expected, "meters={meters} gates={gates}");
        }
    }

    #[test]
    fn test_pr2_uses_lower_capacity() {
        let engine = PricingEngine::default();
        let pr1 = engine
            .compute_estimate(&request("Spain", "PR1", 136.0, 0))
            .unwrap();
        let pr2 = engine
            .compute_estimate(&request("Spain", "PR2", 136.0, 0))
            .unwrap();
        assert_eq!(pr1.work_days, 2.0);
        assert_eq!(pr2.work_days, 3.0);
    }

    #[test]
    fn test_zero_wage_country_uses_fallback() {
        let engine = PricingEngine::default();
        for country in ["Sweden", "Norway", "Denmark"] {
            let b = engine
                .compute_estimate(&request(country, "OR", 136.0, 0))
                .unwrap();
            assert_eq!(b.daily_rate_per_man, 240.0);
            assert_eq!(b.labor_cost, 3840.0);
        }
    }

    #[test]
    fn test_unknown_country() {
        let err = PricingEngine::default()
            .compute_estimate(&request("Atlantis", "OR", 100.0, 0))
            .unwrap_err();
        assert_eq!(err, PricingError::InvalidCountry("Atlantis".to_string()));
    }

    #[test]
    fn test_unknown_fence_type() {
        let err = PricingEngine::default()
            .compute_estimate(&request("Spain", "PR", 100.0, 0))
            .unwrap_err();
        assert_eq!(err, PricingError::InvalidFenceType("PR".to_string()));
    }

    #[test]
    fn test_invalid_meters() {
        let engine = PricingEngine::default();
        for meters in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = engine
                .compute_estimate(&request("Spain", "OR", meters, 0))
                .unwrap_err();
            assert!(matches!(err, PricingError::InvalidMeters(_)));
        }
    }

    #[test]
    fn test_injected_tables() {
        let wages = BTreeMap::from([("Atlantis".to_string(), 10.0)]);
        let capacities = BTreeMap::from([("XR".to_string(), 50)]);
        let engine = PricingEngine::new(RateTables::new(wages, capacities).unwrap());

        let b = engine
            .compute_estimate(&request("Atlantis", "XR", 50.0, 0))
            .unwrap();
        assert_eq!(b.work_days, 2.0);
        assert_eq!(b.daily_rate_per_man, 160.0);
        assert!(engine
            .compute_estimate(&request("United Kingdom", "OR", 50.0, 0))
            .is_err());
    }

    #[test]
    fn test_round2_half_even_on_binary_value() {
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(1234.5678), 1234.57);
    }
}
