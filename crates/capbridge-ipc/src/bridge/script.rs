//! JavaScript bootstrap injected into a webview renderer.
//!
//! The script captures the webview's raw `window.ipc.postMessage` in a
//! closure, builds the capability object from [`api_surface`], and installs
//! it under the configured key. The host delivers frames back by evaluating
//! [`js_deliver_frame`]. Both directions carry the [`SessionToken`]; the
//! receive hook drops calls that do not.

use std::fmt::Write;

use super::install::InstallStrategy;
use super::session::SessionToken;
use super::surface::{api_surface, MethodKind};

/// Global function the host calls with each outgoing frame.
pub const RECEIVE_FN: &str = "__capbridge_receive";

const RUNTIME: &str = r#"
  if (!window.ipc || typeof window.ipc.postMessage !== 'function') {
    console.error('[capbridge] IPC primitive unavailable; capability API not installed');
    return;
  }
  var post = window.ipc.postMessage.bind(window.ipc);
  var stringify = JSON.stringify;
  var parse = JSON.parse;
  var nextId = 1;
  var pending = new Map();
  var listeners = Object.create(null);

  function slice(args, arity) {
    return Array.prototype.slice.call(args, 0, arity);
  }
  function postFrame(frame) {
    frame.token = token;
    post(stringify(frame));
  }
  function invoke(channel, arity, args) {
    var list = slice(args, arity);
    return new Promise(function (resolve, reject) {
      var id = nextId++;
      pending.set(id, { resolve: resolve, reject: reject });
      postFrame({ type: 'invoke', id: id, channel: channel, args: list });
    });
  }
  function send(channel, arity, args) {
    postFrame({ type: 'send', channel: channel, args: slice(args, arity) });
  }
  function subscribe(channel, callback) {
    if (typeof callback !== 'function') return;
    (listeners[channel] = listeners[channel] || []).push(callback);
  }
  function receive(stamp, raw) {
    if (stamp !== token) return;
    var frame = typeof raw === 'string' ? parse(raw) : raw;
    if (frame.type === 'reply') {
      var waiter = pending.get(frame.id);
      if (!waiter) return;
      pending.delete(frame.id);
      if (frame.ok) {
        waiter.resolve(frame.value);
      } else {
        var err = new Error(frame.error.message);
        err.code = frame.error.code;
        err.channel = frame.error.channel;
        waiter.reject(err);
      }
    } else if (frame.type === 'push') {
      (listeners[frame.channel] || []).slice().forEach(function (cb) {
        try { cb(frame.payload); } catch (e) { console.error(e); }
      });
    }
  }
"#;

/// Page script keeps the webview's `window.ipc` unless it is shadowed.
const HIDE_IPC: &str = r#"  try {
    Object.defineProperty(window, 'ipc', {
      value: undefined,
      writable: false,
      configurable: false,
      enumerable: false
    });
  } catch (error) {
    console.warn('[capbridge] raw IPC primitive left reachable; unstamped frames are refused');
  }
"#;

/// Render the bootstrap for `strategy`, installing under `key`. The key must
/// already be a valid identifier.
pub fn bootstrap_script(strategy: InstallStrategy, key: &str, token: &SessionToken) -> String {
    let key_js = js_string(key);
    let mut out = String::from("(function () {\n  'use strict';\n");
    let _ = writeln!(out, "  var token = {};", js_string(token.as_str()));
    out.push_str(RUNTIME);
    let _ = writeln!(
        out,
        "  Object.defineProperty(window, {}, {{ value: receive, writable: false, \
         configurable: false, enumerable: false }});",
        js_string(RECEIVE_FN)
    );
    out.push_str(&api_object());

    match strategy {
        InstallStrategy::ContextBridge => {
            out.push_str(HIDE_IPC);
            let _ = write!(
                out,
                r#"  try {{
    if (Object.prototype.hasOwnProperty.call(window, {key_js})) {{
      throw new Error({key_js} + ' is already defined');
    }}
    Object.keys(api).forEach(function (ns) {{ Object.freeze(api[ns]); }});
    Object.defineProperty(window, {key_js}, {{
      value: Object.freeze(api),
      writable: false,
      configurable: false,
      enumerable: true
    }});
  }} catch (error) {{
    console.error('[capbridge] failed to install capability API', error);
  }}
"#
            );
        }
        InstallStrategy::SharedGlobal => {
            let _ = write!(
                out,
                r#"  console.warn('[capbridge] context isolation disabled; {SHARED_WARNING}');
  window[{key_js}] = api;
"#
            );
        }
    }
    out.push_str("})();\n");
    out
}

/// Script that hands one host frame to the renderer runtime.
pub fn js_deliver_frame(frame: &str, token: &SessionToken) -> String {
    format!(
        "window[{}] && window[{}]({}, {});",
        js_string(RECEIVE_FN),
        js_string(RECEIVE_FN),
        js_string(token.as_str()),
        js_string(frame)
    )
}

fn api_object() -> String {
    let mut out = String::from("  var api = {\n");
    for ns in api_surface() {
        let _ = writeln!(out, "    {}: {{", ns.name);
        for method in &ns.methods {
            let body = match method.kind {
                MethodKind::Invoke(ch) => format!(
                    "function () {{ return invoke({}, {}, arguments); }}",
                    js_string(ch.id()),
                    ch.arity()
                ),
                MethodKind::Send(ch) => format!(
                    "function () {{ send({}, {}, arguments); }}",
                    js_string(ch.id()),
                    ch.arity()
                ),
                MethodKind::Subscribe(push) => format!(
                    "function (callback) {{ subscribe({}, callback); }}",
                    js_string(push.id())
                ),
            };
            let _ = writeln!(out, "      {}: {},", method.name, body);
        }
        out.push_str("    },\n");
    }
    out.push_str("  };\n");
    out
}

const SHARED_WARNING: &str = "capability API attached to the shared global scope";

fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}
