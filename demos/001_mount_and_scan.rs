//! Demo 001: Mount a barcode widget and receive a scan result.
//!
//! A scripted stand-in plays the embedded frame: it connects to the
//! gateway like a real widget would and emits the initialization and
//! result events over the wire.
//!
//! Run with: cargo run --example 001_mount_and_scan

mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use futures_util::SinkExt;
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;

use capture_widget_host::{FrameGateway, FrameHost, MessageBus, NullContainer, WidgetKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    common::init_logging();

    // One process-wide bus, bridged to frames over a localhost WebSocket.
    let bus = Arc::new(MessageBus::new());
    let gateway = FrameGateway::bind(Arc::clone(&bus))
        .await
        .context("binding frame gateway")?;
    println!("gateway listening on {}", gateway.ws_url());

    // Mount the barcode widget.
    let host = FrameHost::new(WidgetKind::Barcode, Arc::clone(&bus), common::demo_resources());
    let widget_id = host.mount(&NullContainer).context("mounting widget")?;
    println!("mounted barcode widget {widget_id} (state: {})", host.state());

    // A scripted frame: connects like the real widget script and speaks
    // the same wire vocabulary.
    let frame_url = gateway.ws_url();
    let frame = tokio::spawn(async move {
        let (mut ws, _) = tokio_tungstenite::connect_async(frame_url)
            .await
            .expect("frame connect");

        let init = json!({ "type": "BARCODE_INITIALIZED" }).to_string();
        ws.send(Message::Text(init.into())).await.expect("send init");

        tokio::time::sleep(Duration::from_millis(200)).await;

        let result = json!({
            "type": "BARCODE_RESULT",
            "data": { "format": "QR_CODE", "text": "https://example.com/ticket/42" }
        })
        .to_string();
        ws.send(Message::Text(result.into())).await.expect("send result");
    });

    // Wait for readiness, then for the result to land.
    let snapshot = host
        .wait_until_ready(Duration::from_secs(5))
        .await
        .context("waiting for widget readiness")?;
    println!("widget ready (state: {})", snapshot.state);

    frame.await.context("frame task")?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    match host.snapshot().last_result {
        Some(result) => println!("scan result:\n{result}"),
        None => println!("no result received"),
    }

    host.unmount(&NullContainer);
    gateway.shutdown();
    println!("unmounted (state: {})", host.state());

    Ok(())
}
