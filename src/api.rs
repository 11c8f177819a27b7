//! REST API server for Agrochain
//!
//! HTTP surface for the browser dashboard: chain inspection, transaction
//! submission and block sealing.

use axum::{
    extract::{Request, State},
    http::{self, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::ledger::{Block, Ledger};
use crate::pow::ProofOfWork;
use crate::transaction::Transaction;

const DEFAULT_API_PORT: u16 = 8080;

/// Shared node state: the ledger singleton plus API bookkeeping.
#[derive(Clone)]
pub struct Node {
    pub ledger: Arc<RwLock<Ledger>>,
    pow: ProofOfWork,
    api_stats: Arc<RwLock<ApiStats>>,
}

/// API statistics and monitoring
#[derive(Debug, Default)]
struct ApiStats {
    total_requests: u64,
    successful_requests: u64,
    failed_requests: u64,
    transactions_submitted: u64,
    blocks_sealed: u64,
    start_time: Option<Instant>,
}

impl ApiStats {
    fn new() -> Self {
        ApiStats {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    fn record_request(&mut self, success: bool) {
        self.total_requests += 1;
        if success {
            self.successful_requests += 1;
        } else {
            self.failed_requests += 1;
        }
    }
}

impl Node {
    /// Create a node owning a fresh ledger, with proof-of-work parameters
    /// taken from the ledger configuration.
    pub fn new(config: &LedgerConfig) -> Self {
        Self::with_ledger(Ledger::new(), config)
    }

    /// Create a node around an existing ledger instance. Useful for tests
    /// that pre-populate the chain.
    pub fn with_ledger(ledger: Ledger, config: &LedgerConfig) -> Self {
        Node {
            ledger: Arc::new(RwLock::new(ledger)),
            pow: ProofOfWork::new(config.difficulty, config.max_pow_iterations),
            api_stats: Arc::new(RwLock::new(ApiStats::new())),
        }
    }

    /// Get API statistics
    pub async fn get_stats(&self) -> ApiStatsResponse {
        let stats = self.api_stats.read().await;
        let uptime = stats.start_time.map(|t| t.elapsed().as_secs()).unwrap_or(0);

        ApiStatsResponse {
            total_requests: stats.total_requests,
            successful_requests: stats.successful_requests,
            failed_requests: stats.failed_requests,
            transactions_submitted: stats.transactions_submitted,
            blocks_sealed: stats.blocks_sealed,
            uptime_seconds: uptime,
        }
    }
}

// ============================================================================
// API Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    LedgerFault(LedgerError),
    InvalidInput(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::LedgerFault(e) => match e {
                LedgerError::ProofSearchExhausted(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            },
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError::LedgerFault(err)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body of `POST /api/add-transaction`. Every field is optional; missing
/// fields take the dashboard's historical placeholder values.
#[derive(Deserialize)]
pub struct AddTransactionRequest {
    #[serde(default = "default_farmer")]
    pub farmer: String,
    #[serde(default = "default_crop")]
    pub crop: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default = "default_location")]
    pub location: String,
}

fn default_farmer() -> String {
    "Unknown Farmer".to_string()
}

fn default_crop() -> String {
    "Unknown Crop".to_string()
}

fn default_location() -> String {
    "Unknown".to_string()
}

#[derive(Serialize)]
pub struct AddTransactionResponse {
    pub success: bool,
    pub message: String,
    pub transaction: Transaction,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub success: bool,
    pub block: Block,
}

#[derive(Serialize)]
pub struct ApiStatsResponse {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub transactions_submitted: u64,
    pub blocks_sealed: u64,
    pub uptime_seconds: u64,
}

// ============================================================================
// Middleware
// ============================================================================

/// Request statistics middleware
async fn stats_middleware(State(node): State<Arc<Node>>, req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    let success = response.status().is_success();
    let mut stats = node.api_stats.write().await;
    stats.record_request(success);

    response
}

/// Detailed request logging middleware. Logs method, path, status and
/// duration.
async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        path = %path,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "api.request"
    );

    response
}

// ============================================================================
// API Server
// ============================================================================

/// Build the API router with all endpoints (for testing)
pub fn build_api_router(node: Arc<Node>) -> Router {
    // CORS configuration - allow all origins with credentials
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(vec![
            http::Method::GET,
            http::Method::POST,
            http::Method::OPTIONS,
        ])
        .allow_headers(vec![http::header::CONTENT_TYPE])
        .allow_credentials(true);

    let api_routes = Router::new()
        // Ledger endpoints
        .route("/blockchain", get(get_blockchain))
        .route("/blockchain/transactions", get(get_transactions))
        .route("/blockchain/mine", post(mine_block))
        // Transaction submission
        .route("/add-transaction", post(add_transaction))
        // System endpoints
        .route("/health", get(health_check))
        .route("/stats", get(get_api_stats))
        // logging before stats so we always record timing
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(
            node.clone(),
            stats_middleware,
        ))
        .with_state(node);

    Router::new().nest("/api", api_routes).layer(cors)
}

/// Run the API server on the given port.
pub async fn run_api_server(node: Arc<Node>, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_api_router(node);

    let port = if port == 0 { DEFAULT_API_PORT } else { port };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// GET /api/blockchain — the full chain plus the flattened transaction view.
async fn get_blockchain(State(node): State<Arc<Node>>) -> impl IntoResponse {
    let ledger = node.ledger.read().await;
    Json(serde_json::json!({
        "success": true,
        "chain": ledger.chain(),
        "length": ledger.chain().len(),
        "transactions": ledger.all_transactions()
    }))
}

/// GET /api/blockchain/transactions — every sealed transaction, in
/// block-then-insertion order. Pending transactions are not included.
async fn get_transactions(State(node): State<Arc<Node>>) -> impl IntoResponse {
    let ledger = node.ledger.read().await;
    let transactions = ledger.all_transactions();
    Json(serde_json::json!({
        "success": true,
        "count": transactions.len(),
        "transactions": transactions
    }))
}

/// POST /api/add-transaction — buffer a sale record for the next block.
///
/// Policy change from the original dashboard: negative or non-finite
/// price/quantity are rejected with 400 instead of being accepted silently.
async fn add_transaction(
    State(node): State<Arc<Node>>,
    Json(req): Json<AddTransactionRequest>,
) -> Result<Json<AddTransactionResponse>, ApiError> {
    if !req.price.is_finite() || req.price < 0.0 {
        return Err(ApiError::InvalidInput(
            "price must be a non-negative number".to_string(),
        ));
    }
    if !req.quantity.is_finite() || req.quantity < 0.0 {
        return Err(ApiError::InvalidInput(
            "quantity must be a non-negative number".to_string(),
        ));
    }

    let mut ledger = node.ledger.write().await;
    let index =
        ledger.new_transaction(req.farmer, req.crop, req.price, req.quantity, req.location);
    let transaction = ledger
        .pending()
        .last()
        .cloned()
        .ok_or_else(|| ApiError::InternalError("pending buffer empty after push".to_string()))?;
    drop(ledger);

    {
        let mut stats = node.api_stats.write().await;
        stats.transactions_submitted += 1;
    }

    Ok(Json(AddTransactionResponse {
        success: true,
        message: format!("Transaction added to block {}", index),
        transaction,
    }))
}

/// POST /api/blockchain/mine — run the proof-of-work search and seal the
/// pending buffer into a new block.
///
/// The search runs on a blocking thread outside any lock; only a completed
/// search takes the write lock and appends. A failed or cancelled search
/// therefore never leaves a half-sealed block behind.
async fn mine_block(State(node): State<Arc<Node>>) -> Result<Json<MineResponse>, ApiError> {
    let last_proof = {
        let ledger = node.ledger.read().await;
        ledger.last_block().proof
    };

    let pow = node.pow.clone();
    let proof = tokio::task::spawn_blocking(move || pow.search(last_proof))
        .await
        .map_err(|e| ApiError::InternalError(format!("proof search task failed: {}", e)))??;

    let block = {
        let mut ledger = node.ledger.write().await;
        ledger.new_block(proof, None)?
    };

    {
        let mut stats = node.api_stats.write().await;
        stats.blocks_sealed += 1;
    }

    tracing::info!(index = block.index, proof = block.proof, "block sealed");

    Ok(Json(MineResponse {
        success: true,
        block,
    }))
}

async fn get_api_stats(State(node): State<Arc<Node>>) -> impl IntoResponse {
    let stats = node.get_stats().await;
    Json(stats)
}
