//! Demo 002: Document scanner lifecycle with busy states and errors.
//!
//! Walks the full document-scanner vocabulary: device enumeration, a
//! busy scan cycle, a save, and a recoverable device error, all driven
//! by a scripted frame over the gateway.
//!
//! Run with: cargo run --example 002_document_scanner

mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use futures_util::SinkExt;
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

use capture_widget_host::{FrameGateway, FrameHost, MessageBus, NullContainer, WidgetKind};

/// Event script the fake frame plays, in order.
fn frame_script() -> Vec<Value> {
    vec![
        json!({ "type": "DWT_INITIALIZED" }),
        json!({ "type": "DWT_DEVICES_LOADED", "devices": ["EPSON DS-530", "Fujitsu fi-7160"] }),
        json!({ "type": "DWT_LOADING", "loading": true }),
        json!({ "type": "DWT_STATUS", "message": "Scanning page 3 of 3" }),
        json!({ "type": "DWT_SCAN_COMPLETE", "imageCount": 3 }),
        json!({ "type": "DWT_SAVE_COMPLETE", "filename": "scan-042.pdf" }),
        json!({ "type": "DWT_ERROR", "message": "Feeder cover open" }),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    common::init_logging();

    let bus = Arc::new(MessageBus::new());
    let gateway = FrameGateway::bind(Arc::clone(&bus))
        .await
        .context("binding frame gateway")?;

    let host = FrameHost::new(
        WidgetKind::DocumentScanner,
        Arc::clone(&bus),
        common::demo_resources(),
    );
    host.mount(&NullContainer).context("mounting widget")?;

    let frame_url = gateway.ws_url();
    let frame = tokio::spawn(async move {
        let (mut ws, _) = tokio_tungstenite::connect_async(frame_url)
            .await
            .expect("frame connect");

        for event in frame_script() {
            ws.send(Message::Text(event.to_string().into()))
                .await
                .expect("send event");
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
    });

    host.wait_until_ready(Duration::from_secs(5))
        .await
        .context("waiting for scanner readiness")?;

    frame.await.context("frame task")?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let snapshot = host.snapshot();
    println!("state:    {}", snapshot.state);
    println!("devices:  {:?}", snapshot.devices);
    println!("result:   {:?}", snapshot.last_result);
    println!("status:   {}", snapshot.status_message);
    println!("busy:     {}", snapshot.is_busy);

    host.unmount(&NullContainer);
    gateway.shutdown();

    Ok(())
}
