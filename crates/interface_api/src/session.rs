//! Purchase sessions and their in-memory store
//!
//! Each session owns one purchase flow behind an async `RwLock`, plus the
//! latest-wins quote and OTP coordinators for that flow. Simulated delays run
//! without holding the lock; results are written back only if they are still
//! the latest.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::RwLock;

use core_kernel::SessionId;
use domain_pricing::{PremiumCalculator, QuoteCoordinator};
use domain_purchase::{OtpVerifier, PurchaseFlow};

use crate::config::ApiConfig;

/// One customer's purchase in progress
#[derive(Debug)]
pub struct PurchaseSession {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub flow: RwLock<PurchaseFlow>,
    pub quotes: QuoteCoordinator,
    pub otp: OtpVerifier,
}

impl PurchaseSession {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            id: SessionId::new_v7(),
            created_at: Utc::now(),
            flow: RwLock::new(PurchaseFlow::new()),
            quotes: QuoteCoordinator::new(
                PremiumCalculator::new(config.tax_rate()),
                config.quote_latency(),
            ),
            otp: OtpVerifier::new(config.otp_code.clone(), config.otp_latency()),
        }
    }
}

/// Trait for storing and retrieving purchase sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: Arc<PurchaseSession>);
    async fn get(&self, id: &SessionId) -> Option<Arc<PurchaseSession>>;
    /// Returns whether a session was removed
    async fn remove(&self, id: &SessionId) -> bool;
    async fn len(&self) -> usize;
}

/// In-memory implementation of SessionStore
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<SessionId, Arc<PurchaseSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: Arc<PurchaseSession>) {
        self.sessions.insert(session.id, session);
    }

    async fn get(&self, id: &SessionId) -> Option<Arc<PurchaseSession>> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    async fn remove(&self, id: &SessionId) -> bool {
        self.sessions.remove(id).is_some()
    }

    async fn len(&self) -> usize {
        self.sessions.len()
    }
}
