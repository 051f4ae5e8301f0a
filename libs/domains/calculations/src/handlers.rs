use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::{get, post},
};
use axum_helpers::{
    AppError, ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{
    ApiBanner, Calculation, CalculationRequest, CalculationResponse, CostBreakdown,
    CountriesResponse, DeleteCalculations, DeleteResponse, FenceType, FenceTypesResponse,
    ListQuery,
};
use crate::repository::CalculationRepository;
use crate::service::CalculationService;

pub const API_BANNER: &str = "Racing Fence Installation Pricing API";

type ApiResult<T> = Result<Json<T>, AppError>;

#[derive(OpenApi)]
#[openapi(
    paths(
        root,
        get_countries,
        get_fence_types,
        calculate_preview,
        archive_calculation,
        list_calculations,
        delete_calculations,
    ),
    components(
        schemas(
            ApiBanner,
            Calculation,
            CalculationRequest,
            CalculationResponse,
            CostBreakdown,
            CountriesResponse,
            DeleteCalculations,
            DeleteResponse,
            FenceType,
            FenceTypesResponse,
        ),
        responses(
            BadRequestResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Pricing", description = "Fence installation estimates"),
        (name = "Archive", description = "Archived estimates (MongoDB)")
    )
)]
pub struct ApiDoc;

pub fn router<R: CalculationRepository + 'static>(service: CalculationService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(root))
        .route("/countries", get(get_countries::<R>))
        .route("/fence-types", get(get_fence_types::<R>))
        .route("/calculate-preview", post(calculate_preview::<R>))
        .route("/archive", post(archive_calculation::<R>))
        .route(
            "/calculations",
            get(list_calculations::<R>).delete(delete_calculations::<R>),
        )
        .with_state(shared_service)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Pricing",
    responses((status = 200, description = "API banner", body = ApiBanner))
)]
async fn root() -> Json<ApiBanner> {
    Json(ApiBanner {
        message: API_BANNER.to_string(),
    })
}

/// Countries with a known minimum wage, sorted
#[utoipa::path(
    get,
    path = "/countries",
    tag = "Pricing",
    responses((status = 200, description = "Sorted country names", body = CountriesResponse))
)]
async fn get_countries<R: CalculationRepository>(
    State(service): State<Arc<CalculationService<R>>>,
) -> Json<CountriesResponse> {
    Json(CountriesResponse {
        countries: service.countries(),
    })
}

#[utoipa::path(
    get,
    path = "/fence-types",
    tag = "Pricing",
    responses((status = 200, description = "Fence type codes and daily capacities", body = FenceTypesResponse))
)]
async fn get_fence_types<R: CalculationRepository>(
    State(service): State<Arc<CalculationService<R>>>,
) -> Json<FenceTypesResponse> {
    Json(FenceTypesResponse {
        fence_types: service.fence_types(),
    })
}

/// Price a request without archiving it
#[utoipa::path(
    post,
    path = "/calculate-preview",
    tag = "Pricing",
    request_body = CalculationRequest,
    responses(
        (status = 200, description = "Unsaved calculation", body = CalculationResponse),
        (status = 400, response = BadRequestResponse)
    )
)]
async fn calculate_preview<R: CalculationRepository>(
    State(service): State<Arc<CalculationService<R>>>,
    ValidatedJson(request): ValidatedJson<CalculationRequest>,
) -> ApiResult<CalculationResponse> {
    let calculation = service.preview(request)?;
    Ok(Json(CalculationResponse { calculation }))
}

/// Archive a previewed calculation
#[utoipa::path(
    post,
    path = "/archive",
    tag = "Archive",
    request_body = Calculation,
    responses(
        (status = 200, description = "Archived calculation", body = CalculationResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn archive_calculation<R: CalculationRepository>(
    State(service): State<Arc<CalculationService<R>>>,
    ValidatedJson(calculation): ValidatedJson<Calculation>,
) -> ApiResult<CalculationResponse> {
    let calculation = service.archive(calculation).await?;
    Ok(Json(CalculationResponse { calculation }))
}

/// Archived calculations, newest first
#[utoipa::path(
    get,
    path = "/calculations",
    tag = "Archive",
    params(ListQuery),
    responses(
        (status = 200, description = "Archived calculations", body = Vec<Calculation>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_calculations<R: CalculationRepository>(
    State(service): State<Arc<CalculationService<R>>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Vec<Calculation>> {
    let Query(query) = query?;
    let calculations = service.list(query.limit).await?;
    Ok(Json(calculations))
}

/// Delete archived calculations by id
#[utoipa::path(
    delete,
    path = "/calculations",
    tag = "Archive",
    request_body = DeleteCalculations,
    responses(
        (status = 200, description = "Number of calculations removed", body = DeleteResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_calculations<R: CalculationRepository>(
    State(service): State<Arc<CalculationService<R>>>,
    ValidatedJson(body): ValidatedJson<DeleteCalculations>,
) -> ApiResult<DeleteResponse> {
    let deleted_count = service.delete(body.ids).await?;
    Ok(Json(DeleteResponse { deleted_count }))
}
