mod cli;

use std::process::ExitCode;

use capbridge_app::{logging, serve, HostContext, HostServices};
use capbridge_common::CapbridgeError;
use capbridge_config::CapbridgeConfig;
use capbridge_ipc::transport;
use capbridge_platform::paths;

fn main() -> ExitCode {
    logging::install_panic_hook();

    let args = cli::parse();

    let loaded = capbridge_config::load_config(args.config.as_deref());
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => CapbridgeConfig::default(),
    };
    if args.dev {
        config.dev.enabled = true;
    }

    logging::init(args.log_level.as_deref(), &config, paths::log_dir().ok());
    tracing::info!("capbridge v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    if let Err(e) = &loaded {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    if args.print_bootstrap {
        let bridge = capbridge_ipc::CapabilityBridge::from_config(&config.bridge);
        let token = capbridge_ipc::bridge::SessionToken::generate();
        return match bridge.bootstrap_script(&token) {
            Ok(script) => {
                println!("{script}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("Cannot build bootstrap script: {e}");
                ExitCode::FAILURE
            }
        };
    }

    if let Err(e) = paths::ensure_dirs() {
        tracing::warn!("Failed to create directories: {e}");
    }

    let result = if args.stdio {
        run_stdio(config)
    } else {
        run_window(config)
    };

    match result {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("capbridge exited with an error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Serve the bridge over stdin/stdout with a headless window.
fn run_stdio(config: CapbridgeConfig) -> Result<(), CapbridgeError> {
    let runtime = tokio::runtime::Runtime::new()?;
    let services = HostServices::headless(&config)?;
    let ctx = HostContext::new(config, services);

    runtime.block_on(async {
        ctx.window().ready_to_show()?;
        tracing::info!("Serving bridge on stdio");
        serve(&ctx, transport::stdio())
            .await
            .map_err(|e| CapbridgeError::Bridge(e.to_string()))
    })?;

    ctx.shutdown();
    Ok(())
}

#[cfg(feature = "native")]
fn run_window(config: CapbridgeConfig) -> Result<(), CapbridgeError> {
    capbridge_app::native::run(config)
}

#[cfg(not(feature = "native"))]
fn run_window(_config: CapbridgeConfig) -> Result<(), CapbridgeError> {
    Err(CapbridgeError::Other(
        "built without the `native` feature; run with --stdio".into(),
    ))
}
