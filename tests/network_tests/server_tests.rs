//! Tests for the TCP server
//!
//! Each test binds to an ephemeral loopback port and talks to the server
//! the way `nc` would: one request per connection.

use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rf433d::config::Config;
use rf433d::network::{self, Server, ShutdownHandle};
use rf433d::protocol::Reply;
use rf433d::transmit::{RecordingTransmitter, TransmitLine};
use rf433d::{Result, SwitchController, SwitchError};

// =============================================================================
// Helper Functions
// =============================================================================

const TIMEOUT: Duration = Duration::from_secs(5);

struct RunningServer {
    addr: SocketAddr,
    shutdown: ShutdownHandle,
    handle: JoinHandle<Result<()>>,
    recorder: RecordingTransmitter,
}

fn start_server() -> RunningServer {
    let recorder = RecordingTransmitter::new();
    let config = Config::builder()
        .listen_addr("127.0.0.1:0")
        .deferred_enabled(false)
        .read_timeout_ms(2000)
        .build();
    let controller =
        SwitchController::new(config.clone(), TransmitLine::new(recorder.clone())).unwrap();
    let mut server = Server::bind(config, controller).unwrap();

    let addr = server.local_addr();
    let shutdown = server.shutdown_handle();
    let handle = thread::spawn(move || server.run());

    RunningServer {
        addr,
        shutdown,
        handle,
        recorder,
    }
}

fn stop(server: RunningServer) {
    server.shutdown.trigger();
    server.handle.join().unwrap().unwrap();
}

fn send_raw(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(TIMEOUT)).unwrap();
    stream.write_all(request).unwrap();
    stream.shutdown(Shutdown::Write).unwrap();

    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).unwrap();
    reply
}

// =============================================================================
// Request/Reply Tests
// =============================================================================

#[test]
fn test_on_request_over_tcp() {
    let server = start_server();

    assert_eq!(send_raw(server.addr, b"100001161\n"), b"1".to_vec());
    assert_eq!(server.recorder.frames().len(), 1);

    stop(server);
}

#[test]
fn test_state_survives_across_connections() {
    let server = start_server();

    assert_eq!(send_raw(server.addr, b"202021"), b"1".to_vec());
    assert_eq!(send_raw(server.addr, b"202022"), b"1".to_vec());
    assert_eq!(send_raw(server.addr, b"202020"), b"0".to_vec());
    assert_eq!(send_raw(server.addr, b"202022"), b"0".to_vec());

    stop(server);
}

#[test]
fn test_bad_requests_reply_failure_and_server_continues() {
    let server = start_server();

    assert_eq!(send_raw(server.addr, b"9000011611"), b"2".to_vec());
    assert_eq!(send_raw(server.addr, b"100"), b"2".to_vec());
    assert_eq!(send_raw(server.addr, b"100001162"), b"0".to_vec());

    stop(server);
}

#[test]
fn test_client_helper() {
    let server = start_server();
    let addr = server.addr.to_string();

    assert_eq!(
        network::request(&addr, b"100001080", TIMEOUT).unwrap(),
        Reply::State(false)
    );
    assert_eq!(
        network::request(&addr, b"201171", TIMEOUT).unwrap(),
        Reply::Failure
    );

    stop(server);
}

#[test]
fn test_client_disconnect_without_request_is_not_fatal() {
    let server = start_server();

    drop(TcpStream::connect(server.addr).unwrap());
    assert_eq!(send_raw(server.addr, b"100001161"), b"1".to_vec());

    stop(server);
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_bind_failure_is_reported() {
    let first = start_server();

    let config = Config::builder()
        .listen_addr(first.addr.to_string())
        .build();
    let controller =
        SwitchController::new(config.clone(), TransmitLine::new(RecordingTransmitter::new()))
            .unwrap();

    assert!(matches!(
        Server::bind(config, controller),
        Err(SwitchError::Network(_))
    ));

    stop(first);
}

#[test]
fn test_shutdown_handle_stops_idle_server() {
    let server = start_server();
    assert!(!server.shutdown.is_triggered());

    stop(server);
}
