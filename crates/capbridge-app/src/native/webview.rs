use std::borrow::Cow;
use std::sync::Arc;

use capbridge_ipc::bridge::SessionToken;
use capbridge_ipc::transport::FrameSender;
use tracing::{debug, warn};
use wry::http::header::{HeaderValue, CONTENT_TYPE};
use wry::http::{Response, StatusCode};
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use crate::context::HostContext;
use crate::window::renderer::{
    on_window_open, NavigationPolicy, RendererAssets, RendererSource, WindowOpenDecision, PROTOCOL,
};

/// Build the renderer webview filling `window`.
///
/// `bootstrap` is the capability bridge script; `None` means installation
/// failed and the renderer runs without a capability surface. Only frames
/// stamped with `token` reach the host.
pub fn build<W: wry::raw_window_handle::HasWindowHandle>(
    window: &W,
    ctx: &Arc<HostContext>,
    source: &RendererSource,
    bootstrap: Option<String>,
    token: SessionToken,
    to_host: FrameSender,
) -> Result<WebView, wry::Error> {
    let mut builder = WebViewBuilder::new()
        .with_devtools(ctx.config().dev.enabled)
        .with_url(source.start_url());

    if let Some(script) = bootstrap {
        builder = builder.with_initialization_script(&script);
    }

    builder = attach_ipc_handler(builder, token, to_host);
    builder = attach_navigation_handler(builder, source.navigation_policy());
    builder = attach_window_open_handler(builder, ctx.clone());
    builder = attach_page_load_handler(builder, ctx.clone());

    if let RendererSource::Packaged(dir) = source {
        builder = attach_custom_protocol(builder, Arc::new(RendererAssets::new(dir.clone())));
    }

    builder.build(window)
}

fn attach_ipc_handler(
    builder: WebViewBuilder<'_>,
    token: SessionToken,
    to_host: FrameSender,
) -> WebViewBuilder<'_> {
    builder.with_ipc_handler(move |request| {
        let body = request.into_body();
        if !token.authenticate(&body) {
            warn!(body_len = body.len(), "IPC message rejected: missing or wrong session token");
            return;
        }
        if to_host.send(body).is_err() {
            debug!("IPC message dropped, host loop stopped");
        }
    })
}

fn attach_navigation_handler(
    builder: WebViewBuilder<'_>,
    policy: NavigationPolicy,
) -> WebViewBuilder<'_> {
    builder.with_navigation_handler(move |url| policy.allows(&url))
}

fn attach_window_open_handler(
    builder: WebViewBuilder<'_>,
    ctx: Arc<HostContext>,
) -> WebViewBuilder<'_> {
    builder.with_new_window_req_handler(move |url| {
        if let WindowOpenDecision::OpenExternally(url) = on_window_open(&url) {
            if let Err(e) = ctx.system().desktop().open_external(&url) {
                warn!(url = %url, error = %e, "failed to open link externally");
            }
        }
        false
    })
}

/// First finished load stands in for ready-to-show.
fn attach_page_load_handler(
    builder: WebViewBuilder<'_>,
    ctx: Arc<HostContext>,
) -> WebViewBuilder<'_> {
    builder.with_on_page_load_handler(move |event, url| {
        if let PageLoadEvent::Finished = event {
            debug!(url = %url, "renderer loaded");
            if let Err(e) = ctx.window().ready_to_show() {
                warn!(error = %e, "failed to show window");
            }
        }
    })
}

fn attach_custom_protocol(
    builder: WebViewBuilder<'_>,
    assets: Arc<RendererAssets>,
) -> WebViewBuilder<'_> {
    builder.with_custom_protocol(PROTOCOL.to_string(), move |_id, request| {
        let path = request.uri().path().to_string();
        match assets.resolve(&path) {
            Some((mime, data)) => {
                let mut response = Response::new(data);
                response
                    .headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static(mime));
                response
            }
            None => {
                warn!(path = %path, "custom protocol: asset not found");
                let mut response = Response::new(Cow::Borrowed(&b"Not Found"[..]));
                *response.status_mut() = StatusCode::NOT_FOUND;
                response
            }
        }
    })
}
