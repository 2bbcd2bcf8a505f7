use crate::error::BridgeError;
use crate::mailchimp_oauth::credentials::CredentialRecord;

use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use std::collections::HashMap;
use tracing::{debug, info};

/// Public messages handled by the credentials actor.
#[derive(Debug)]
pub enum CredentialsActorMessage {
    /// Store a record under its identity, replacing any previous one.
    Save(String, CredentialRecord, RpcReplyPort<()>),
    /// Look up the record for an identity.
    Get(String, RpcReplyPort<Option<CredentialRecord>>),
    /// Number of connected identities.
    Len(RpcReplyPort<usize>),
}

/// Handle for interacting with the credentials actor.
///
/// Records live only as long as the process; nothing is written to disk.
#[derive(Clone)]
pub struct CredentialsHandle {
    actor: ActorRef<CredentialsActorMessage>,
}

impl CredentialsHandle {
    /// Overwrite the record for `identity`. Returns once the write is visible
    /// to subsequent `get` calls.
    pub async fn save(
        &self,
        identity: impl Into<String>,
        record: CredentialRecord,
    ) -> Result<(), BridgeError> {
        let identity: String = identity.into();
        ractor::call!(self.actor, CredentialsActorMessage::Save, identity, record)
            .map_err(|e| BridgeError::StoreUnavailable(format!("Save RPC failed: {e}")))
    }

    pub async fn get(
        &self,
        identity: impl AsRef<str>,
    ) -> Result<Option<CredentialRecord>, BridgeError> {
        ractor::call!(
            self.actor,
            CredentialsActorMessage::Get,
            identity.as_ref().to_string()
        )
        .map_err(|e| BridgeError::StoreUnavailable(format!("Get RPC failed: {e}")))
    }

    pub async fn len(&self) -> Result<usize, BridgeError> {
        ractor::call!(self.actor, CredentialsActorMessage::Len)
            .map_err(|e| BridgeError::StoreUnavailable(format!("Len RPC failed: {e}")))
    }

    pub async fn is_empty(&self) -> Result<bool, BridgeError> {
        Ok(self.len().await? == 0)
    }
}

/// Internal state held by ractor-driven credentials actor
struct CredentialsActorState {
    records: HashMap<String, CredentialRecord>,
}

/// ractor-based credentials actor
struct CredentialsActor;

#[ractor::async_trait]
impl Actor for CredentialsActor {
    type Msg = CredentialsActorMessage;
    type State = CredentialsActorState;
    type Arguments = ();

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        _arguments: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        info!("CredentialsActor started with an empty in-memory store");
        Ok(CredentialsActorState {
            records: HashMap::new(),
        })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            CredentialsActorMessage::Save(identity, record, rp) => {
                let replaced = state.records.insert(identity.clone(), record).is_some();
                info!(email = %identity, replaced, "credential saved");
                let _ = rp.send(());
            }
            CredentialsActorMessage::Get(identity, rp) => {
                let record = state.records.get(&identity).cloned();
                debug!(email = %identity, found = record.is_some(), "credential lookup");
                let _ = rp.send(record);
            }
            CredentialsActorMessage::Len(rp) => {
                let _ = rp.send(state.records.len());
            }
        }
        Ok(())
    }
}

/// Spawn the credentials actor and return a handle.
pub async fn spawn() -> Result<CredentialsHandle, BridgeError> {
    let (actor, _jh) = Actor::spawn(None, CredentialsActor, ())
        .await
        .map_err(|e| BridgeError::StoreUnavailable(format!("spawn failed: {e}")))?;
    Ok(CredentialsHandle { actor })
}
