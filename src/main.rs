use std::env;
use std::process::ExitCode;
use std::thread;

use tailcast::{Broadcaster, Latencies, Receiver, mono_time_ns};
use tracing_subscriber::EnvFilter;

const DEFAULT_RECEIVERS: usize = 4;
const DEFAULT_MESSAGES: usize = 100_000;

#[derive(Debug, Clone, Copy)]
enum Mode {
    /// Receivers read the broadcaster directly.
    Fanout,
    /// Receivers consume through `read_chan` adapters.
    Chan,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("tailcast-bench", String::as_str);
    let mode = match args.get(1).map(String::as_str) {
        Some("fanout") => Mode::Fanout,
        Some("chan") => Mode::Chan,
        _ => {
            eprintln!("Usage: {program} fanout|chan");
            eprintln!("  TAILCAST_RECEIVERS  receiver threads (default {DEFAULT_RECEIVERS})");
            eprintln!("  TAILCAST_MESSAGES   values published (default {DEFAULT_MESSAGES})");
            return ExitCode::FAILURE;
        }
    };

    let receivers = match env_usize("TAILCAST_RECEIVERS", DEFAULT_RECEIVERS) {
        Ok(n) => n,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    let messages = match env_usize("TAILCAST_MESSAGES", DEFAULT_MESSAGES) {
        Ok(n) => n,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(?mode, receivers, messages, "starting bench");
    run(mode, receivers, messages)
}

fn env_usize(name: &str, default: usize) -> Result<usize, String> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("{name}={raw:?} is not a count: {e}")),
        Err(_) => Ok(default),
    }
}

fn run(mode: Mode, receivers: usize, messages: usize) -> ExitCode {
    let bc = Broadcaster::new();

    // Listen before the writer starts so every receiver sees all messages.
    let readers: Vec<_> = (0..receivers)
        .map(|i| {
            let rx = bc.listen();
            thread::Builder::new()
                .name(format!("reader-{i}"))
                .spawn(move || match mode {
                    Mode::Fanout => read_direct(&rx, messages),
                    Mode::Chan => read_via_chan(&rx, messages),
                })
        })
        .collect();

    let writer = thread::Builder::new()
        .name(String::from("writer"))
        .spawn(move || write_timestamps(&bc, messages));

    let mut failed = false;
    match writer.map(|h| h.join()) {
        Ok(Ok(mut lat)) => lat.print_csv("write"),
        _ => failed = true,
    }
    for (i, reader) in readers.into_iter().enumerate() {
        match reader.map(|h| h.join()) {
            Ok(Ok(mut lat)) => lat.print_csv(&format!("read-{i}")),
            _ => {
                eprintln!("reader-{i} failed");
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Publishes `messages` timestamps and returns the cost of each `write`.
fn write_timestamps(bc: &Broadcaster<u64>, messages: usize) -> Latencies {
    let mut lat = Latencies::with_capacity(messages);
    for _ in 0..messages {
        let ts0 = mono_time_ns();
        bc.write(ts0);
        lat.record(ts0, mono_time_ns());
    }
    lat
}

fn read_direct(rx: &Receiver<u64>, messages: usize) -> Latencies {
    let mut lat = Latencies::with_capacity(messages);
    for sent in rx.iter().take(messages) {
        lat.record(sent, mono_time_ns());
    }
    lat
}

fn read_via_chan(rx: &Receiver<u64>, messages: usize) -> Latencies {
    let mut lat = Latencies::with_capacity(messages);
    let (values, stop) = match rx.read_chan() {
        Ok(adapter) => adapter,
        Err(e) => {
            tracing::error!(error = %e, "read_chan adapter failed to start");
            return lat;
        }
    };
    for sent in values.iter().take(messages) {
        lat.record(sent, mono_time_ns());
    }
    stop.stop();
    lat
}
