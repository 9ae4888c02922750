//! Gateway assembly and connection lifecycle.
//!
//! # Data Flow
//! ```text
//! connect(node_url)
//!     → node transport (single WebSocket connection)
//!     → GatewayCore (facade, fee injector, wallet, confirmation hub)
//!     → RPC server (spawned once per connection)
//!
//! close()
//!     → stop RPC server, close node connection, clear state
//! ```
//!
//! # Design Decisions
//! - connect is idempotent: repeated calls return the existing core and
//!   never re-register the exposed method table
//! - No singleton: independent connections are freely constructible
//! - close makes a subsequent connect possible

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::broadcast::{BroadcastCoordinator, ConfirmationHub, TransactionRef};
use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::node::{NodeRpc, WsNodeClient};
use crate::query::{FeeInjector, Operation, QueryFacade};
use crate::rpc;
use crate::wallet::{signing, AccountStore, KeyStore, SigningService};

/// The assembled gateway: every component bound to one node connection.
pub struct GatewayCore {
    facade: QueryFacade,
    fees: FeeInjector,
    keystore: Arc<KeyStore>,
    accounts: Arc<AccountStore>,
    hub: Arc<ConfirmationHub>,
}

impl GatewayCore {
    pub fn new(node: Arc<dyn NodeRpc>, keystore: Arc<KeyStore>) -> Self {
        let facade = QueryFacade::new(Arc::clone(&node));
        let fees = FeeInjector::new(facade.clone());
        let hub = Arc::new(ConfirmationHub::new(node));
        Self {
            facade,
            fees,
            keystore,
            accounts: Arc::new(AccountStore::new()),
            hub,
        }
    }

    pub fn facade(&self) -> &QueryFacade {
        &self.facade
    }

    pub fn fees(&self) -> &FeeInjector {
        &self.fees
    }

    pub fn keystore(&self) -> &Arc<KeyStore> {
        &self.keystore
    }

    pub fn accounts(&self) -> &Arc<AccountStore> {
        &self.accounts
    }

    pub fn confirmations(&self) -> &Arc<ConfirmationHub> {
        &self.hub
    }

    /// Broadcast operations as one transaction; one coordinator per call.
    pub async fn broadcast(&self, operations: Vec<Operation>) -> GatewayResult<TransactionRef> {
        let signer: Arc<dyn SigningService> = Arc::clone(&self.keystore) as _;
        BroadcastCoordinator::new(signer, Arc::clone(&self.hub))
            .broadcast(operations)
            .await
    }

    /// Sign a JSON object payload with the named account's key.
    pub async fn sign_json_object(
        &self,
        payload: &str,
        account_name: &str,
    ) -> GatewayResult<String> {
        signing::sign_json_object(&self.facade, &self.keystore, payload, account_name).await
    }
}

struct Connected {
    core: Arc<GatewayCore>,
    client: Arc<WsNodeClient>,
    shutdown: watch::Sender<bool>,
    server: JoinHandle<()>,
}

/// Owns the node connection and the local RPC exposure session.
pub struct GatewayConnection {
    config: GatewayConfig,
    inner: Mutex<Option<Connected>>,
}

impl GatewayConnection {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(None),
        }
    }

    /// Connect to the node and start the RPC exposure.
    ///
    /// Idempotent: when already connected, the existing core is
    /// returned and no second server or method table is created.
    pub async fn connect(&self, node_url: &str) -> GatewayResult<Arc<GatewayCore>> {
        let mut inner = self.inner.lock().await;
        if let Some(connected) = inner.as_ref() {
            tracing::debug!("Already connected");
            return Ok(Arc::clone(&connected.core));
        }

        let client = Arc::new(
            WsNodeClient::connect(
                node_url,
                Duration::from_secs(self.config.node.call_timeout_secs),
            )
            .await?,
        );
        let keystore = Arc::new(KeyStore::from_config(&self.config.wallet)?);
        let core = Arc::new(GatewayCore::new(
            Arc::clone(&client) as Arc<dyn NodeRpc>,
            keystore,
        ));

        // The account list is known once keys are loaded; publishing it
        // flips the store's readiness signal.
        core.accounts()
            .publish(core.keystore().account_names().to_vec());

        let listener = TcpListener::bind(&self.config.rpc.bind_address)
            .await
            .map_err(|e| {
                GatewayError::InvalidInput(format!(
                    "cannot bind RPC listener on {}: {}",
                    self.config.rpc.bind_address, e
                ))
            })?;
        let (shutdown, shutdown_rx) = watch::channel(false);
        let server_core = Arc::clone(&core);
        let server = tokio::spawn(async move {
            if let Err(e) = rpc::server::run(listener, server_core, shutdown_rx).await {
                tracing::error!(error = %e, "RPC server terminated");
            }
        });

        tracing::info!(
            node = %node_url,
            rpc = %self.config.rpc.bind_address,
            "Gateway connected"
        );
        *inner = Some(Connected {
            core: Arc::clone(&core),
            client,
            shutdown,
            server,
        });
        Ok(core)
    }

    /// Release the connection and the RPC exposure.
    pub async fn close(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(connected) = inner.take() {
            let _ = connected.shutdown.send(true);
            connected.client.close();
            let _ = connected.server.await;
            tracing::info!("Gateway closed");
        }
    }

    /// Whether a connection is currently held.
    pub async fn is_connected(&self) -> bool {
        self.inner.lock().await.is_some()
    }
}
