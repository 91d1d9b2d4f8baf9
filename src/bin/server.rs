//! REST API server for card validation against issuing-network definitions.
//!
//! # Usage
//!
//! ```bash
//! # Start server with the built-in networks
//! ccnetwork-server
//!
//! # With custom port and a definitions file
//! ccnetwork-server --port 8080 --networks networks.json
//!
//! # Definitions file from the environment
//! CC_NETWORK_FILE=networks.json ccnetwork-server
//! ```
//!
//! # Swagger UI
//!
//! Visit http://localhost:3000/swagger-ui/ for interactive API documentation.

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use cc_network::provider::{BuiltinProvider, JsonNetworkLoader};
use cc_network::{
    BatchSummary, CardNumber, CardValidator, NetworkDefinition, NetworkProvider, Outcome,
    ProviderError, Validation,
};

type SharedValidator = Arc<CardValidator<Box<dyn NetworkProvider>>>;

// ============================================================================
// OpenAPI Documentation
// ============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Card Network Validation API",
        version = "0.1.0",
        description = "Validates card numbers against configurable issuing-network definitions. No auth or rate limiting.",
        license(name = "MIT"),
        contact(name = "API Support")
    ),
    tags(
        (name = "Validation", description = "Card number validation endpoints"),
        (name = "Networks", description = "Loaded issuing-network definitions"),
        (name = "System", description = "Health and status endpoints")
    ),
    paths(
        validate_card,
        validate_batch,
        list_networks,
        health,
    ),
    components(schemas(
        ValidateRequest,
        ValidateResponse,
        BatchValidateRequest,
        BatchValidateResponse,
        BatchSummaryResponse,
        NetworkResponse,
        ErrorResponse,
        HealthResponse,
    ))
)]
struct ApiDoc;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({"card_number": "4111111111111111"}))]
struct ValidateRequest {
    /// Card number to validate. Digits only; separators are rejected.
    card_number: String,
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "network_name": "Visa",
    "is_valid": true,
    "message": "Visa",
    "last_four": "1111",
    "masked": "****-****-****-1111"
}))]
struct ValidateResponse {
    /// Identified network; absent when the input is malformed or no network matched
    network_name: Option<String>,
    /// True only if a network matched, the length is allowed and the Luhn check passed
    is_valid: bool,
    /// Network name, "Bad Request" or "Not Found"
    message: String,
    /// Last 4 digits of the card number
    #[serde(skip_serializing_if = "Option::is_none")]
    last_four: Option<String>,
    /// Masked card number in format ****-****-****-1234
    #[serde(skip_serializing_if = "Option::is_none")]
    masked: Option<String>,
    /// Why an identified card was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection: Option<String>,
}

impl ValidateResponse {
    fn new(card: &CardNumber, validation: &Validation) -> Self {
        let numeric = validation.outcome() != Outcome::BadRequest;
        Self {
            network_name: validation.network_name().map(str::to_string),
            is_valid: validation.is_valid(),
            message: validation.message().to_string(),
            last_four: numeric.then(|| card.last_four()),
            masked: numeric.then(|| card.masked()),
            rejection: validation.rejection().map(|r| r.to_string()),
        }
    }
}

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({"card_numbers": ["4111111111111111", "5500000000000004", "378282246310005"]}))]
struct BatchValidateRequest {
    /// List of card numbers to validate.
    card_numbers: Vec<String>,
}

#[derive(Serialize, ToSchema)]
struct BatchValidateResponse {
    /// Validation results for each card, in request order
    results: Vec<ValidateResponse>,
    /// Summary statistics
    summary: BatchSummaryResponse,
}

#[derive(Serialize, ToSchema)]
struct BatchSummaryResponse {
    /// Total cards processed
    total: usize,
    /// Identified and valid
    valid: usize,
    /// Identified but rejected
    invalid: usize,
    /// No network matched
    not_found: usize,
    /// Malformed input
    bad_request: usize,
}

impl From<BatchSummary> for BatchSummaryResponse {
    fn from(summary: BatchSummary) -> Self {
        Self {
            total: summary.total,
            valid: summary.valid,
            invalid: summary.invalid,
            not_found: summary.not_found,
            bad_request: summary.bad_request,
        }
    }
}

#[derive(Serialize, ToSchema)]
struct NetworkResponse {
    /// Network name
    name: String,
    /// Starting prefixes
    prefixes: Vec<u64>,
    /// Leading-digit range as min-max
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<String>,
    /// Allowed card lengths
    allowed_lengths: Vec<usize>,
}

impl From<&NetworkDefinition> for NetworkResponse {
    fn from(network: &NetworkDefinition) -> Self {
        Self {
            name: network.name().to_string(),
            prefixes: network.prefixes().to_vec(),
            range: network.range().map(|r| r.to_string()),
            allowed_lengths: network.allowed_lengths().to_vec(),
        }
    }
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    /// Error description
    error: String,
}

#[derive(Serialize, ToSchema)]
struct HealthResponse {
    /// Service status
    status: String,
    /// API version
    version: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn provider_error(err: ProviderError) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn status_for(outcome: Outcome) -> StatusCode {
    match outcome {
        Outcome::BadRequest => StatusCode::BAD_REQUEST,
        Outcome::NotFound => StatusCode::NOT_FOUND,
        Outcome::Ok => StatusCode::OK,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Validate a card number
#[utoipa::path(
    post,
    path = "/validate",
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "Network identified; see is_valid", body = ValidateResponse),
        (status = 400, description = "Card number is not a digit string", body = ValidateResponse),
        (status = 404, description = "No network matched", body = ValidateResponse),
        (status = 500, description = "Definitions could not be loaded", body = ErrorResponse)
    ),
    tag = "Validation"
)]
async fn validate_card(
    State(validator): State<SharedValidator>,
    Json(req): Json<ValidateRequest>,
) -> Result<(StatusCode, Json<ValidateResponse>), ApiError> {
    let card = CardNumber::new(req.card_number);
    let validation = validator.validate_card(&card).map_err(provider_error)?;

    Ok((
        status_for(validation.outcome()),
        Json(ValidateResponse::new(&card, &validation)),
    ))
}

/// Validate multiple card numbers
#[utoipa::path(
    post,
    path = "/validate/batch",
    request_body = BatchValidateRequest,
    responses(
        (status = 200, description = "Batch validation results", body = BatchValidateResponse),
        (status = 500, description = "Definitions could not be loaded", body = ErrorResponse)
    ),
    tag = "Validation"
)]
async fn validate_batch(
    State(validator): State<SharedValidator>,
    Json(req): Json<BatchValidateRequest>,
) -> Result<Json<BatchValidateResponse>, ApiError> {
    let cards: Vec<CardNumber> = req.card_numbers.into_iter().map(CardNumber::new).collect();
    let validations = validator.validate_batch(&cards).map_err(provider_error)?;

    let summary: BatchSummary = validations.iter().collect();
    let results = cards
        .iter()
        .zip(&validations)
        .map(|(card, validation)| ValidateResponse::new(card, validation))
        .collect();

    Ok(Json(BatchValidateResponse {
        results,
        summary: summary.into(),
    }))
}

/// List network definitions in matching order
#[utoipa::path(
    get,
    path = "/networks",
    responses(
        (status = 200, description = "Loaded networks", body = [NetworkResponse]),
        (status = 500, description = "Definitions could not be loaded", body = ErrorResponse)
    ),
    tag = "Networks"
)]
async fn list_networks(
    State(validator): State<SharedValidator>,
) -> Result<Json<Vec<NetworkResponse>>, ApiError> {
    let networks = validator.provider().networks().map_err(provider_error)?;
    Ok(Json(networks.iter().map(NetworkResponse::from).collect()))
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "System"
)]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Helpers
// ============================================================================

fn arg_value(name: &str) -> Option<String> {
    std::env::args().skip_while(|a| a != name).nth(1)
}

fn load_provider(path: Option<&Path>) -> Result<Box<dyn NetworkProvider>, ProviderError> {
    match path {
        Some(path) => {
            let provider = JsonNetworkLoader::from_file(path)?;
            tracing::info!(
                path = %path.display(),
                networks = provider.as_slice().len(),
                "loaded network definitions"
            );
            Ok(Box::new(provider))
        }
        None => {
            tracing::info!("using built-in network definitions");
            Ok(Box::new(BuiltinProvider))
        }
    }
}

fn app(validator: SharedValidator) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/validate", post(validate_card))
        .route("/validate/batch", post(validate_batch))
        .route("/networks", get(list_networks))
        .route("/health", get(health))
        .with_state(validator)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse args
    let port: u16 = arg_value("--port")
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let networks_file = arg_value("--networks").or_else(|| std::env::var("CC_NETWORK_FILE").ok());

    let provider = match load_provider(networks_file.as_deref().map(Path::new)) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::error!(error = %e, "failed to load network definitions");
            return ExitCode::FAILURE;
        }
    };

    let app = app(Arc::new(CardValidator::new(provider)));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}:{}/swagger-ui/", "localhost", port);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
