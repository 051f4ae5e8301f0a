use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_LIST_LIMIT: i64 = 100;
pub const MAX_LIST_LIMIT: i64 = 1000;

/// Input to the pricing engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CalculationRequest {
    #[validate(length(max = 200))]
    pub user_name: String,
    #[validate(length(max = 200))]
    pub project_name: String,
    /// Must be one of `GET /api/countries`
    #[schema(example = "United Kingdom")]
    pub country: String,
    /// Fence type code, e.g. `OR`, `PR1`, `PR2`
    #[schema(example = "OR")]
    pub fence_type: String,
    /// Fence length in metres, finite and greater than zero
    #[schema(example = 272.0)]
    pub meters: f64,
    #[schema(example = 4)]
    pub gates: u32,
}

/// Itemised estimate.
///
/// Monetary fields are rounded to 2 places. `work_days` is a whole number
/// carried as a float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CostBreakdown {
    pub work_days: f64,
    /// Older archived records lack this field
    #[serde(default)]
    pub daily_rate_per_man: f64,
    pub labor_cost: f64,
    pub tools_cost: f64,
    pub supervision_cost: f64,
    pub flight_ticket: f64,
    /// Older archived records lack this field
    #[serde(default)]
    pub ground_fixing_screws: f64,
    pub raw_total: f64,
    pub rate_per_meter: f64,
    pub markup_30: f64,
    pub markup_40: f64,
    pub markup_50: f64,
    pub markup_60: f64,
}

/// A priced request, archivable as-is.
///
/// `id` and `timestamp` are generated when a client omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Calculation {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[validate(length(max = 200))]
    pub user_name: String,
    #[validate(length(max = 200))]
    pub project_name: String,
    pub country: String,
    pub fence_type: String,
    pub meters: f64,
    pub gates: u32,
    pub breakdown: CostBreakdown,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Calculation {
    /// Wraps a breakdown in a fresh, unsaved calculation with a new id.
    pub fn new(request: CalculationRequest, breakdown: CostBreakdown) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_name: request.user_name,
            project_name: request.project_name,
            country: request.country,
            fence_type: request.fence_type,
            meters: request.meters,
            gates: request.gates,
            breakdown,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Maximum number of calculations to return (1-1000, default 100)
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIST_LIMIT
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

/// Body of `DELETE /api/calculations`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct DeleteCalculations {
    #[validate(length(min = 1))]
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub deleted_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalculationResponse {
    pub calculation: Calculation,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CountriesResponse {
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FenceType {
    pub code: String,
    /// Metres installed per crew day
    pub daily_capacity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FenceTypesResponse {
    pub fence_types: Vec<FenceType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiBanner {
    pub message: String,
}
