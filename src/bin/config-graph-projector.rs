// Copyright (c) 2025 - Cowboy AI, Inc.
//! Configuration Graph Projector Service
//!
//! Consumes configuration change notifications from NATS JetStream and
//! projects them into Neo4j.
//!
//! - Events → JetStream → Consumer → ChangeEventHandler → Neo4jGraphStore
//!
//! Each message payload is a trigger envelope `{"invokingEvent": "..."}`.
//! Graph failures NAK the message so it is redelivered (upserts are
//! idempotent); undecodable messages are terminated.
//!
//! Run with: cargo run --bin config-graph-projector --features neo4j,nats
//!
//! Prerequisites:
//! 1. NATS server running (NATS_URL, default: localhost:4222)
//! 2. Neo4j reachable (NEO4J_URI, NEO4J_USER, NEO4J_PASSWORD)

use anyhow::{Context, Result};
use async_nats::jetstream;
use cim_config_graph::{
    adapters::Neo4jGraphStore, ChangeEventHandler, GraphStore, ProjectorConfig,
};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("🚀 Starting configuration graph projector");

    let config = ProjectorConfig::from_env().context("Invalid projector configuration")?;
    info!("📋 Configuration loaded:");
    info!("  - NATS URL: {}", config.nats_url);
    info!("  - Stream: {} ({})", config.stream_name, config.subject);
    info!("  - Consumer: {}", config.consumer_name);
    info!("  - Neo4j URI: {}", config.graph.uri);

    // Connect to the graph once for the lifetime of the process
    let store = Neo4jGraphStore::connect(config.graph.clone())
        .await
        .context("Failed to connect to Neo4j")?;
    store
        .initialize()
        .await
        .context("Failed to initialize Neo4j schema")?;
    let handler = ChangeEventHandler::new(Arc::new(store));
    info!("✅ Graph store ready");

    info!("🔌 Connecting to NATS at {}", config.nats_url);
    let client = async_nats::connect(&config.nats_url)
        .await
        .context("Failed to connect to NATS")?;
    let jetstream = jetstream::new(client);

    let stream = match jetstream.get_stream(&config.stream_name).await {
        Ok(stream) => {
            info!("✅ Found existing stream: {}", config.stream_name);
            stream
        }
        Err(_) => {
            info!("📝 Stream '{}' not found, creating...", config.stream_name);
            jetstream
                .create_stream(jetstream::stream::Config {
                    name: config.stream_name.clone(),
                    subjects: vec![config.subject.clone()],
                    max_age: Duration::from_secs(7 * 24 * 60 * 60),
                    ..Default::default()
                })
                .await
                .context("Failed to create stream")?
        }
    };

    let consumer = match stream.get_consumer(&config.consumer_name).await {
        Ok(consumer) => {
            info!("✅ Found existing consumer: {}", config.consumer_name);
            consumer
        }
        Err(_) => {
            info!("📝 Consumer '{}' not found, creating...", config.consumer_name);
            stream
                .create_consumer(jetstream::consumer::pull::Config {
                    durable_name: Some(config.consumer_name.clone()),
                    ack_policy: jetstream::consumer::AckPolicy::Explicit,
                    ..Default::default()
                })
                .await
                .context("Failed to create consumer")?
        }
    };

    info!("🎧 Starting event consumption...");
    let messages = consumer
        .stream()
        .max_messages_per_batch(10)
        .messages()
        .await
        .context("Failed to start consuming messages")?;

    tokio::pin!(messages);

    let mut event_count = 0u64;
    let mut error_count = 0u64;

    while let Some(message) = messages.next().await {
        let msg = match message {
            Ok(msg) => msg,
            Err(e) => {
                error_count += 1;
                error!("❌ Error receiving message: {} (total errors: {})", e, error_count);
                tokio::time::sleep(Duration::from_secs(1)).await;
                continue;
            }
        };

        debug!("📨 Received message from subject: {}", msg.subject);

        match handler.handle_invocation(&msg.payload).await {
            Ok(report) => {
                event_count += 1;
                debug!("✅ Applied {} graph ops (total events: {})", report.len(), event_count);
                if let Err(e) = msg.ack().await {
                    error!("⚠️ Failed to acknowledge message: {}", e);
                }
            }
            Err(e) if e.is_permanent() => {
                error_count += 1;
                error!("❌ Rejecting undecodable event: {} (total errors: {})", e, error_count);
                // Redelivery cannot fix a malformed event
                if let Err(e) = msg.ack_with(jetstream::AckKind::Term).await {
                    error!("⚠️ Failed to terminate message: {}", e);
                }
            }
            Err(e) => {
                error_count += 1;
                error!("❌ Failed to project event: {} (total errors: {})", e, error_count);
                if let Err(e) = msg.ack_with(jetstream::AckKind::Nak(None)).await {
                    error!("⚠️ Failed to NAK message: {}", e);
                }
            }
        }

        if (event_count + error_count) % 100 == 0 {
            info!(
                "📊 Statistics: {} events processed, {} errors",
                event_count, error_count
            );
        }
    }

    warn!("⚠️ Message stream ended unexpectedly");
    Ok(())
}
