//! # gardenhubd — garden monitor daemon
//!
//! Composition root that wires all adapters together and runs the control
//! loop.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise logging
//! - Connect the MQTT publisher and put the bounded telemetry queue in front
//!   of it
//! - Build the simulated sensors and the control loop
//! - Handle graceful shutdown (SIGTERM/SIGINT): finish the current cycle,
//!   drain the queue, disconnect from the broker
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use gardenhub_adapter_mqtt::MqttPublisher;
use gardenhub_adapter_virtual::virtual_sensors;
use gardenhub_app::control_loop::ControlLoop;
use gardenhub_app::telemetry_queue::TelemetryQueue;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let loop_config = config.control_loop_config()?;

    // Telemetry
    let publisher = Arc::new(MqttPublisher::connect(
        &config.telemetry.endpoint,
        &loop_config.device,
        &config.mqtt,
    )?);
    let (queue, worker) =
        TelemetryQueue::spawn(Arc::clone(&publisher), config.telemetry.queue_capacity);

    // Control loop
    let control = ControlLoop::new(loop_config, virtual_sensors(), queue)?;
    let (stop, stopped) = watch::channel(false);
    let mut control = tokio::spawn(control.run(stopped));

    let outcome = tokio::select! {
        joined = &mut control => joined,
        () = shutdown_signal() => {
            tracing::info!("shutdown signal received, finishing current cycle");
            let _ = stop.send(true);
            control.await
        }
    };

    // The queue handle went away with the loop; let the worker drain.
    if let Err(err) = worker.await {
        tracing::warn!(%err, "telemetry worker did not finish cleanly");
    }
    if let Err(err) = publisher.shutdown().await {
        tracing::warn!(%err, "failed to disconnect from broker");
    }

    outcome??;
    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
