//! HTTP API Layer
//!
//! This crate provides the REST API for the insurance purchase flow using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Catalog browsing and purchase session endpoints
//! - **Sessions**: In-memory store of purchase flows, one per customer
//! - **Middleware**: Tracing and audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(catalog, config)?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod session;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
    middleware as axum_middleware,
};
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use core_kernel::PolicyTypeCode;
use domain_catalog::Catalog;
use domain_purchase::{FormValidator, PurchaseError};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::middleware::audit_middleware;
use crate::handlers::{catalog, health, sessions};
use crate::session::{InMemorySessionStore, SessionStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    /// Compiled field rules, one per policy type
    pub validators: Arc<HashMap<PolicyTypeCode, FormValidator>>,
    pub sessions: Arc<dyn SessionStore>,
    pub config: ApiConfig,
}

impl AppState {
    /// Builds state with an in-memory session store
    ///
    /// # Errors
    ///
    /// Returns `PurchaseError::InvalidPattern` if any field pattern in the
    /// catalog fails to compile
    pub fn new(catalog: Catalog, config: ApiConfig) -> Result<Self, PurchaseError> {
        Self::with_store(catalog, config, Arc::new(InMemorySessionStore::new()))
    }

    pub fn with_store(
        catalog: Catalog,
        config: ApiConfig,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self, PurchaseError> {
        let validators = catalog
            .policy_types()
            .iter()
            .map(|info| Ok((info.code.clone(), FormValidator::for_policy_type(info)?)))
            .collect::<Result<HashMap<_, _>, PurchaseError>>()?;

        Ok(Self {
            catalog: Arc::new(catalog),
            validators: Arc::new(validators),
            sessions,
            config,
        })
    }

    pub fn validator(&self, code: &str) -> Result<&FormValidator, ApiError> {
        self.validators
            .get(code)
            .ok_or_else(|| ApiError::NotFound(format!("Policy type not found: {}", code)))
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Catalog, session store and configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new().route("/health", get(health::health_check));

    // Catalog routes
    let catalog_routes = Router::new()
        .route("/policy-types", get(catalog::list_policy_types))
        .route("/policy-types/:code/providers", get(catalog::list_providers))
        .route("/providers/compare", post(catalog::compare_providers))
        .route("/providers/:id", get(catalog::get_provider));

    // Session routes
    let session_routes = Router::new()
        .route("/", post(sessions::create_session))
        .route("/:id", get(sessions::get_session).delete(sessions::delete_session))
        .route("/:id/actions", post(sessions::dispatch_action))
        .route("/:id/reset", post(sessions::reset_session))
        .route("/:id/quote", post(sessions::request_quote))
        .route("/:id/dependents", post(sessions::add_dependent_entry))
        .route(
            "/:id/dependents/:key",
            put(sessions::update_dependent_entry).delete(sessions::remove_dependent_entry),
        )
        .route("/:id/otp/send", post(sessions::send_otp))
        .route("/:id/otp/verify", post(sessions::verify_otp))
        .route("/:id/submit", post(sessions::submit_purchase));

    let api_routes = Router::new()
        .merge(catalog_routes)
        .nest("/sessions", session_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
