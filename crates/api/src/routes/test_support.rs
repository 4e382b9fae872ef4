//! Shared fixtures for route tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{Router, response::Response};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use smokeduty_fx::{FxError, RateLookupService, RateProvider};
use smokeduty_shared::CurrencyCode;
use smokeduty_store::{FxCacheRepository, RateConfigRepository};
use tempfile::TempDir;

use crate::{AppState, create_router};

/// Provider returning a fixed rate, or failing when none is set.
pub struct StubProvider {
    rate: Option<Decimal>,
    calls: AtomicUsize,
}

#[async_trait]
impl RateProvider for StubProvider {
    fn name(&self) -> &'static str {
        "frankfurter"
    }

    async fn fetch(&self, _from: &CurrencyCode, to: &CurrencyCode) -> Result<Decimal, FxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rate.ok_or_else(|| FxError::MissingRate(to.to_string()))
    }
}

/// Application wired to temp files and a stub provider.
pub struct TestApp {
    pub state: AppState,
    pub provider: Arc<StubProvider>,
    pub dir: TempDir,
}

impl TestApp {
    pub fn new(rate: Option<Decimal>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(StubProvider {
            rate,
            calls: AtomicUsize::new(0),
        });
        let cache = Arc::new(FxCacheRepository::new(dir.path().join("fx_cache.json")));
        let fx = RateLookupService::new(Arc::clone(&provider) as Arc<dyn RateProvider>, cache);

        let state = AppState {
            rates: Arc::new(RateConfigRepository::new(dir.path().join("rates.json"))),
            fx: Arc::new(fx),
            local_currency: "JPY".parse().unwrap(),
        };
        Self {
            state,
            provider,
            dir,
        }
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    pub fn fetch_count(&self) -> usize {
        self.provider.calls.load(Ordering::SeqCst)
    }

    pub fn write_rates(&self, json: &str) {
        std::fs::write(self.dir.path().join("rates.json"), json).unwrap();
    }
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
