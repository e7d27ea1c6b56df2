//! Bus dispatch benchmark suite.
//!
//! Benchmarks message delivery at different subscriber counts:
//! - Subscriber counts: 1, 8, 64
//! - Accepted vs. filtered-out messages
//!
//! Run with: cargo bench --bench dispatch
//! Results saved to: target/criterion/

use std::hint::black_box;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::json;

use capture_widget_host::{MessageBus, RawMessage, SubscriptionFilter, WidgetKind};

// ============================================================================
// Benchmark Parameters
// ============================================================================

const SUBSCRIBER_COUNTS: &[usize] = &[1, 8, 64];

// ============================================================================
// Fixtures
// ============================================================================

fn bus_with_subscribers(count: usize, kind: WidgetKind) -> (Arc<MessageBus>, Arc<AtomicUsize>) {
    let bus = Arc::new(MessageBus::new());
    let delivered = Arc::new(AtomicUsize::new(0));

    for _ in 0..count {
        let delivered = Arc::clone(&delivered);
        bus.subscribe(
            SubscriptionFilter::for_kind(kind),
            Box::new(move |_event| {
                delivered.fetch_add(1, Ordering::Relaxed);
            }),
        );
    }

    (bus, delivered)
}

fn accepted_message() -> RawMessage {
    RawMessage::new(json!({ "type": "DWT_SCAN_COMPLETE", "imageCount": 3 }))
}

fn filtered_message() -> RawMessage {
    RawMessage::new(json!({ "type": "BARCODE_RESULT", "data": { "text": "x" } }))
}

fn malformed_message() -> RawMessage {
    RawMessage::new(json!({ "payload": "no type tag" }))
}

// ============================================================================
// Benchmark: Accepted Delivery
// ============================================================================

fn bench_accepted_delivery(c: &mut Criterion) {
    let mut group = c.benchmark_group("accepted_delivery");

    for &count in SUBSCRIBER_COUNTS {
        let (bus, _delivered) = bus_with_subscribers(count, WidgetKind::DocumentScanner);

        group.bench_with_input(BenchmarkId::new("publish", count), &count, |b, _| {
            b.iter(|| bus.publish(black_box(accepted_message())));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Filter Rejection
// ============================================================================

fn bench_filter_rejection(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_rejection");

    for &count in SUBSCRIBER_COUNTS {
        let (bus, _delivered) = bus_with_subscribers(count, WidgetKind::DocumentScanner);

        group.bench_with_input(BenchmarkId::new("foreign_kind", count), &count, |b, _| {
            b.iter(|| bus.publish(black_box(filtered_message())));
        });

        group.bench_with_input(BenchmarkId::new("malformed", count), &count, |b, _| {
            b.iter(|| bus.publish(black_box(malformed_message())));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Subscription Churn
// ============================================================================

fn bench_subscription_churn(c: &mut Criterion) {
    c.bench_function("subscribe_unsubscribe", |b| {
        let bus = MessageBus::new();
        b.iter(|| {
            let id = bus.subscribe(
                SubscriptionFilter::for_kind(WidgetKind::Barcode),
                Box::new(|_| {}),
            );
            bus.unsubscribe(black_box(&id));
        });
    });
}

// ============================================================================
// Entry Point
// ============================================================================

criterion_group!(
    benches,
    bench_accepted_delivery,
    bench_filter_rejection,
    bench_subscription_churn
);
criterion_main!(benches);
