//! Channel handlers, one module per namespace.

mod storage;
mod system;
mod window;

use capbridge_ipc::{ChannelRegistry, RegistryError};

use crate::context::HostContext;

pub fn register_all(
    registry: &mut ChannelRegistry,
    ctx: &HostContext,
) -> Result<(), RegistryError> {
    window::register(registry, ctx.window())?;
    storage::register(registry, ctx.storage())?;
    system::register(registry, ctx.system())?;
    Ok(())
}
