// Shared harness for the integration tests in this directory.
//
// Every test binary gets one patient server backed by in-memory storage.
// It runs on a dedicated OS thread with its own Tokio runtime, because each
// `#[tokio::test]` builds (and tears down) a runtime of its own.
use std::{
    net::{SocketAddr, TcpStream},
    sync::{
        OnceLock,
        atomic::{AtomicU64, Ordering},
        mpsc,
    },
    time::Duration,
};

use patient_server::Settings;

// Base URL of the shared server, set once on first use.
static BASE_URL: OnceLock<String> = OnceLock::new();
// Tests share the server's storage, so every phone number, doctor id and slot
// id a test uses is drawn from this counter to keep tests independent.
static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

// Start the shared server if needed and return its base URL.
pub fn ensure_server() -> &'static str {
    BASE_URL.get_or_init(|| {
        let addr = spawn_server();
        wait_until_accepting(addr);
        format!("http://{addr}")
    })
}

pub fn unique_key() -> u64 {
    NEXT_KEY.fetch_add(1, Ordering::Relaxed)
}

// Ten digits, so it passes phone number validation.
pub fn unique_phone_number() -> String {
    format!("9{:09}", unique_key())
}

// Bind an ephemeral port on the server thread and hand the address back.
fn spawn_server() -> SocketAddr {
    let (addr_tx, addr_rx) = mpsc::channel();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("test runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind ephemeral test port");
            let addr = listener.local_addr().expect("get local addr");
            addr_tx.send(addr).expect("test harness stopped waiting");

            patient_server::run(listener, Settings::in_memory())
                .await
                .expect("server failed");
        });
    });

    addr_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("server did not report its address")
}

// Confirm the socket accepts connections before the first request is sent.
fn wait_until_accepting(addr: SocketAddr) {
    for _ in 0..100 {
        if TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}
