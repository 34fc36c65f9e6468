//! Pooled, pipelined HTTP sink.
//!
//! An [`ApiSink`] owns `numClients` reqwest clients. Each `send_batch` call
//! starts `numClients x pipelineFactor` workers that pull items from one
//! bounded queue and issue one request per item. The call returns once every
//! item has been attempted.

use crate::error::{DeliveryError, SinkError};
use crate::outcome::BatchOutcome;
use crate::BatchSink;
use async_trait::async_trait;
use loadtest_core::{ApiTarget, TargetKind};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, warn};

type WorkQueue = Mutex<mpsc::Receiver<(usize, Vec<u8>)>>;

/// Request template shared by every worker.
#[derive(Debug)]
struct RequestTemplate {
    url: Url,
    method: Method,
    headers: HeaderMap,
}

impl RequestTemplate {
    async fn drain(&self, client: &Client, queue: &WorkQueue) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        loop {
            let next = queue.lock().await.recv().await;
            let Some((index, body)) = next else {
                break;
            };
            outcome.attempted += 1;
            if let Err(e) = self.send_one(client, index, body).await {
                outcome.push_failure(e);
            }
        }
        outcome
    }

    async fn send_one(
        &self,
        client: &Client,
        index: usize,
        body: Vec<u8>,
    ) -> Result<(), DeliveryError> {
        let response = client
            .request(self.method.clone(), self.url.clone())
            .headers(self.headers.clone())
            .body(body)
            .send()
            .await
            .map_err(|e| DeliveryError::Request {
                index,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status {
                index,
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

/// HTTP sink for one API target.
#[derive(Debug)]
pub struct ApiSink {
    name: String,
    clients: Vec<Client>,
    pipeline: usize,
    request: Arc<RequestTemplate>,
}

impl ApiSink {
    /// Build the client pool for `target`.
    pub fn connect(name: &str, target: &ApiTarget) -> Result<Self, SinkError> {
        let url = Url::parse(&target.url).map_err(|e| SinkError::InvalidUrl {
            target: name.to_string(),
            url: target.url.clone(),
            reason: e.to_string(),
        })?;

        let method = Method::from_bytes(target.method.to_uppercase().as_bytes()).map_err(|_| {
            SinkError::InvalidMethod {
                target: name.to_string(),
                method: target.method.clone(),
            }
        })?;

        let headers = build_headers(name, target)?;

        let clients = (0..target.clients())
            .map(|_| {
                Client::builder()
                    .pool_max_idle_per_host(target.max_idle_per_host())
                    .timeout(target.timeout())
                    .build()
                    .map_err(|source| SinkError::Client {
                        target: name.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            sink = name,
            url = %url,
            method = %method,
            clients = clients.len(),
            pipeline = target.pipeline(),
            max_idle = target.max_idle(),
            max_idle_per_host = target.max_idle_per_host(),
            timeout_ms = target.timeout().as_millis() as u64,
            "API sink ready"
        );

        Ok(Self {
            name: name.to_string(),
            clients,
            pipeline: target.pipeline(),
            request: Arc::new(RequestTemplate { url, method, headers }),
        })
    }

    /// Concurrent senders per batch.
    pub fn worker_count(&self) -> usize {
        self.clients.len() * self.pipeline
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.request.headers
    }

    pub fn method(&self) -> &Method {
        &self.request.method
    }
}

fn build_headers(name: &str, target: &ApiTarget) -> Result<HeaderMap, SinkError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (key, value) in &target.headers {
        let invalid = |reason: String| SinkError::InvalidHeader {
            target: name.to_string(),
            name: key.clone(),
            reason,
        };
        let header_name =
            HeaderName::from_bytes(key.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

#[async_trait]
impl BatchSink for ApiSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> TargetKind {
        TargetKind::Api
    }

    async fn send_batch(&self, payloads: Vec<Vec<u8>>) -> BatchOutcome {
        if payloads.is_empty() {
            return BatchOutcome::default();
        }

        let workers = self.worker_count().min(payloads.len());
        let (tx, rx) = mpsc::channel(workers);
        let queue = Arc::new(Mutex::new(rx));

        let mut tasks = JoinSet::new();
        for worker in 0..workers {
            let client = self.clients[worker % self.clients.len()].clone();
            let request = Arc::clone(&self.request);
            let queue = Arc::clone(&queue);
            tasks.spawn(async move { request.drain(&client, &queue).await });
        }

        for item in payloads.into_iter().enumerate() {
            if tx.send(item).await.is_err() {
                break;
            }
        }
        drop(tx);

        let mut outcome = BatchOutcome::default();
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(part) => outcome.merge(part),
                Err(e) => warn!(sink = %self.name, "API sender task failed: {e}"),
            }
        }
        outcome
    }
}
