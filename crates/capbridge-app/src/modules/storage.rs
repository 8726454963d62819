use std::sync::Arc;

use capbridge_ipc::catalog::storage::{Delete, Get, Has, Set};
use capbridge_ipc::{ChannelRegistry, HandlerError, RegistryError};
use serde_json::Value;

use crate::storage::PersistedStore;

pub(super) fn register(
    registry: &mut ChannelRegistry,
    store: &Arc<PersistedStore>,
) -> Result<(), RegistryError> {
    let s = store.clone();
    registry.register_request_handler::<Get, _, _>(move |(key,)| get(s.clone(), key))?;

    let s = store.clone();
    registry
        .register_request_handler::<Set, _, _>(move |(key, value)| set(s.clone(), key, value))?;

    let s = store.clone();
    registry.register_request_handler::<Delete, _, _>(move |(key,)| delete(s.clone(), key))?;

    let s = store.clone();
    registry.register_request_handler::<Has, _, _>(move |(key,)| has(s.clone(), key))?;

    Ok(())
}

async fn get(store: Arc<PersistedStore>, key: String) -> Result<Option<Value>, HandlerError> {
    Ok(store.get(&key))
}

/// Acked even when the file write fails; the store logs and keeps memory.
async fn set(store: Arc<PersistedStore>, key: String, value: Value) -> Result<(), HandlerError> {
    store.set(&key, value);
    Ok(())
}

async fn delete(store: Arc<PersistedStore>, key: String) -> Result<(), HandlerError> {
    store.delete(&key);
    Ok(())
}

async fn has(store: Arc<PersistedStore>, key: String) -> Result<bool, HandlerError> {
    Ok(store.has(&key))
}
