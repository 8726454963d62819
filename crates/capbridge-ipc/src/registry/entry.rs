use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};
use serde_json::Value;
use tracing::{error, warn};

use crate::catalog::{ListenerChannel, RequestChannel};
use crate::errors::HandlerError;
use crate::protocol::{decode_args, ErrorCode, RemoteError};

/// Reply value of a request; `None` means the reply carries no value.
pub type RequestResult = Result<Option<Value>, RemoteError>;

pub(super) type RequestFn = Arc<dyn Fn(Value) -> BoxFuture<'static, RequestResult> + Send + Sync>;
pub(super) type ListenerFn = Arc<dyn Fn(Value) + Send + Sync>;

pub(super) enum Entry {
    Request { handler: RequestFn, name: &'static str },
    Listener { handler: ListenerFn, name: &'static str },
}

impl Entry {
    pub(super) fn name(&self) -> &'static str {
        match self {
            Entry::Request { name, .. } | Entry::Listener { name, .. } => name,
        }
    }
}

/// Wrap a typed request handler: decode arguments, run the handler with
/// panics caught, encode the output. Every path ends in a value or a
/// [`RemoteError`].
pub(super) fn wrap_request<C, F, Fut>(handler: F) -> Entry
where
    C: RequestChannel,
    F: Fn(C::Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<C::Output, HandlerError>> + Send + 'static,
{
    let name = std::any::type_name::<F>();
    let channel = C::CHANNEL.id();
    let handler = Arc::new(handler);

    let wrapped: RequestFn = Arc::new(move |raw: Value| {
        let handler = Arc::clone(&handler);
        async move {
            let args: C::Args = match decode_args(raw) {
                Ok(args) => args,
                Err(e) => {
                    warn!(channel, handler = name, error = %e, "bad arguments");
                    return Err(RemoteError::new(
                        ErrorCode::BadArguments,
                        channel,
                        e.to_string(),
                    ));
                }
            };

            // The call happens inside the async block so a panic while
            // building the future is caught too.
            let outcome = AssertUnwindSafe(async move { (*handler)(args).await })
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(output)) => C::encode_output(output).map_err(|e| {
                    error!(channel, handler = name, error = %e, "failed to encode reply");
                    RemoteError::new(ErrorCode::HandlerFailed, channel, e.to_string())
                }),
                Ok(Err(e)) => {
                    error!(channel, handler = name, error = %e, "request handler failed");
                    Err(RemoteError::new(
                        ErrorCode::HandlerFailed,
                        channel,
                        e.to_string(),
                    ))
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!(channel, handler = name, panic = %message, "request handler panicked");
                    Err(RemoteError::new(ErrorCode::HandlerPanicked, channel, message))
                }
            }
        }
        .boxed()
    });

    Entry::Request {
        handler: wrapped,
        name,
    }
}

/// Wrap a typed listener. Failures and panics are logged and go nowhere
/// else.
pub(super) fn wrap_listener<C, F>(handler: F) -> Entry
where
    C: ListenerChannel,
    F: Fn(C::Args) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    let name = std::any::type_name::<F>();
    let channel = C::CHANNEL.id();

    let wrapped: ListenerFn = Arc::new(move |raw: Value| {
        let args: C::Args = match decode_args(raw) {
            Ok(args) => args,
            Err(e) => {
                warn!(channel, handler = name, error = %e, "bad arguments for listener");
                return;
            }
        };
        match panic::catch_unwind(AssertUnwindSafe(|| handler(args))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(channel, handler = name, error = %e, "listener failed"),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(channel, handler = name, panic = %message, "listener panicked");
            }
        }
    });

    Entry::Listener {
        handler: wrapped,
        name,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
