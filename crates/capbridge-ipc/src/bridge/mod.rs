//! Capability bridge: the fixed API object and how it is installed.

mod install;
mod script;
mod session;
mod surface;


pub use install::{
    is_valid_key, CapabilityBridge, InstallStrategy, Installation, MemoryRendererContext,
    RendererContext,
};
pub use script::{bootstrap_script, js_deliver_frame, RECEIVE_FN};
pub use session::SessionToken;
pub use surface::{api_surface, Method, MethodKind, Namespace, NAMESPACES};
