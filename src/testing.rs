//! In-process test doubles shared by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::broadcast::transaction::PendingTransaction;
use crate::error::{GatewayError, GatewayResult};
use crate::node::NodeRpc;
use crate::wallet::SigningService;

/// What a stubbed node does with one call.
pub enum StubReply {
    Reply(Value),
    Fail(String),
    /// Never answer; the call stays in flight.
    Hang,
}

/// Scriptable in-process node, recording every call it receives.
pub struct StubNode {
    handler: Box<dyn Fn(&str, &Value) -> StubReply + Send + Sync>,
    calls: Mutex<Vec<String>>,
}

impl StubNode {
    pub fn new(handler: impl Fn(&str, &Value) -> StubReply + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// How many times `method` was called.
    pub fn calls_to(&self, method: &str) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.iter().filter(|m| *m == method).count())
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

#[async_trait]
impl NodeRpc for StubNode {
    async fn call(&self, method: &str, params: Value) -> GatewayResult<Value> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(method.to_string());
        }
        match (self.handler)(method, &params) {
            StubReply::Reply(value) => Ok(value),
            StubReply::Fail(message) => Err(GatewayError::Remote(message)),
            StubReply::Hang => futures_util::future::pending().await,
        }
    }
}

/// Signing service double with a controllable lock.
pub struct StubSigner {
    locked: AtomicBool,
    allow_unlock: bool,
}

impl StubSigner {
    pub fn unlocked() -> Self {
        Self {
            locked: AtomicBool::new(false),
            allow_unlock: true,
        }
    }

    /// Locked, and `unlock` is refused.
    pub fn locked() -> Self {
        Self {
            locked: AtomicBool::new(true),
            allow_unlock: false,
        }
    }
}

#[async_trait]
impl SigningService for StubSigner {
    fn is_unlocked(&self) -> bool {
        !self.locked.load(Ordering::SeqCst)
    }

    async fn unlock(&self) -> GatewayResult<()> {
        if self.allow_unlock {
            self.locked.store(false, Ordering::SeqCst);
            Ok(())
        } else {
            Err(GatewayError::AuthRequired)
        }
    }

    async fn process_transaction(&self, tx: &mut PendingTransaction) -> GatewayResult<()> {
        if !self.is_unlocked() {
            return Err(GatewayError::AuthRequired);
        }
        tx.set_signatures(vec!["00".repeat(64)]);
        Ok(())
    }
}
