//! Bounded store of the most recent response per API request.

use super::ResponseStore;
use crate::models::HttpResponse;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Inner {
    responses: HashMap<String, HttpResponse>,
    /// Request ids ordered by last update, oldest first.
    order: VecDeque<String>,
}

/// Remembers the latest response of up to `limit` request ids.
///
/// Recording a response for an id already present replaces it and marks the
/// id as most recently used. When the limit is exceeded the least recently
/// updated id is evicted.
#[derive(Debug, Clone)]
pub struct LatestResponses {
    inner: Arc<Mutex<Inner>>,
    limit: usize,
}

impl LatestResponses {
    pub fn new(limit: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            limit: limit.max(1),
        }
    }

    /// Creates a store sized from the global configuration.
    pub fn from_config() -> Self {
        Self::new(crate::config::get_config().latest_response_limit)
    }

    /// Records `response` as the latest one for `response.api`.
    pub fn add(&self, response: HttpResponse) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        let id = response.api.clone();

        if inner.responses.insert(id.clone(), response).is_some() {
            inner.order.retain(|existing| existing != &id);
        }
        inner.order.push_back(id);

        while inner.order.len() > self.limit {
            if let Some(evicted) = inner.order.pop_front() {
                log::debug!("evicting latest response of {}", evicted);
                inner.responses.remove(&evicted);
            }
        }
    }

    /// Returns a copy of the latest response recorded for `id`.
    pub fn get(&self, id: &str) -> Option<HttpResponse> {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.responses.get(id).cloned())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|i| i.responses.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.responses.clear();
            inner.order.clear();
        }
    }
}

impl Default for LatestResponses {
    fn default() -> Self {
        Self::from_config()
    }
}

#[async_trait]
impl ResponseStore for LatestResponses {
    async fn latest_response(&self, request_id: &str) -> Option<HttpResponse> {
        self.get(request_id)
    }
}
