//! flatmsg - Codec Demo & Latency Report
//!
//! Encode contoh pesan, tampilkan layout bytes-nya, lalu ukur latency
//! encode/decode. Set `RUST_LOG=flatmsg=trace` untuk melihat log codec.

use std::time::Instant;

use flatmsg::protocol::{decode, encode, encoded_len, Encoder, Message};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("flatmsg=info")),
        )
        .init();

    println!("📦 flatmsg - Flat Binary Message Codec");
    println!("======================================\n");

    show_layout();
    show_rejections();
    benchmark_codec();

    println!("\n✅ Done!");
}

fn show_layout() {
    println!("📐 Wire Layout");
    println!("--------------");

    let msg = Message::new()
        .with_header("a", "1")
        .with_payload(vec![0xFF, 0x00]);

    match encode(&msg) {
        Ok(bytes) => {
            println!("  headers: {{\"a\": \"1\"}}, payload: [FF 00]");
            println!("  encoded ({} bytes): {}", bytes.len(), hex(&bytes));
            match decode(&bytes) {
                Ok(decoded) => println!("  decoded equal: {}\n", decoded == msg),
                Err(e) => println!("  decode failed: {e}\n"),
            }
        }
        Err(e) => println!("  encode failed: {e}\n"),
    }
}

fn show_rejections() {
    println!("🚫 Limit Enforcement");
    println!("--------------------");

    let mut too_many = Message::new();
    for i in 0..64 {
        too_many.insert_header(format!("h{i}"), "x");
    }
    let oversized = Message::new().with_header("big", "ü".repeat(512));
    let huge_payload = Message::new().with_payload(vec![0u8; 256 * 1024 + 1]);

    for (label, msg) in [
        ("64 headers", &too_many),
        ("1024-byte value", &oversized),
        ("256KiB + 1 payload", &huge_payload),
    ] {
        match encode(msg) {
            Ok(_) => println!("  {label}: unexpectedly accepted"),
            Err(e) => println!("  {label}: {e}"),
        }
    }

    match decode(&[0x01, 0x00, 0x05, b'a']) {
        Ok(_) => println!("  truncated input: unexpectedly accepted\n"),
        Err(e) => println!("  truncated input: {e}\n"),
    }
}

fn benchmark_codec() {
    println!("📊 Codec Benchmark");
    println!("------------------");

    const ITERATIONS: usize = 1_000_000;
    const PAYLOAD_SIZE: usize = 64;

    let mut msg = Message::new().with_payload(vec![0u8; PAYLOAD_SIZE]);
    for i in 0..4 {
        msg.insert_header(format!("x-header-{i}"), format!("value-{i}"));
    }

    let mut encoder = Encoder::new(encoded_len(&msg));

    // Benchmark encode
    let start = Instant::now();
    for _ in 0..ITERATIONS {
        if encoder.encode(&msg).is_err() {
            println!("  encode failed");
            return;
        }
    }
    let encode_duration = start.elapsed();

    let encoded_data = encoder.as_bytes().to_vec();

    // Benchmark decode
    let start = Instant::now();
    for _ in 0..ITERATIONS {
        if decode(&encoded_data).is_err() {
            println!("  decode failed");
            return;
        }
    }
    let decode_duration = start.elapsed();

    let encode_ns = encode_duration.as_nanos() as f64 / ITERATIONS as f64;
    let decode_ns = decode_duration.as_nanos() as f64 / ITERATIONS as f64;

    println!("  Message size: {} bytes", encoded_data.len());
    println!("  Operations: {}", ITERATIONS);
    println!(
        "  Encode latency: {:.2} ns/op ({:.3} μs/op)",
        encode_ns,
        encode_ns / 1000.0
    );
    println!(
        "  Decode latency: {:.2} ns/op ({:.3} μs/op)",
        decode_ns,
        decode_ns / 1000.0
    );
    println!(
        "  Encode throughput: {:.2} M msgs/sec",
        ITERATIONS as f64 / encode_duration.as_secs_f64() / 1_000_000.0
    );
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
