// tests/integration/test_helpers.rs

//! Test helpers and utilities for integration tests

use super::fixtures::layout;
use minesweeper::config::Config;
use minesweeper::core::board::Board;
use minesweeper::core::state::ServerState;
use minesweeper::server;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Upper bound on any single wait in these tests.
pub const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// A server running in the background on an ephemeral localhost port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: Arc<ServerState>,
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    /// Starts a server on a board with the given bomb layout.
    pub async fn start(rows: &[&str]) -> Self {
        Self::with_config(test_config(), rows).await
    }

    /// Starts a server with a custom configuration. Host and port are forced
    /// to an ephemeral localhost port.
    pub async fn with_config(mut config: Config, rows: &[&str]) -> Self {
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::new("warn"))
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();

        config.host = "127.0.0.1".to_string();
        config.port = 0;
        let board = Board::from_layout(&layout(rows)).expect("Invalid test layout");
        let ctx = server::setup_with_board(config, board)
            .await
            .expect("Failed to set up test server");
        let addr = ctx.local_addr().expect("Listener has no local address");
        let state = ctx.state.clone();
        let shutdown_tx = ctx.shutdown_handle();
        let handle = tokio::spawn(server::serve(ctx));

        Self {
            addr,
            state,
            shutdown_tx,
            handle,
        }
    }

    /// Connects a new client and consumes its welcome banner.
    pub async fn connect(&self) -> (TestClient, String) {
        let mut client = TestClient::connect(self.addr).await;
        let welcome = client.read_line().await;
        (client, welcome)
    }

    /// Waits until the server reports exactly `expected` connected players.
    pub async fn wait_for_players(&self, expected: usize) {
        let waited = tokio::time::timeout(IO_TIMEOUT, async {
            while self.state.players.current() != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(
            waited.is_ok(),
            "expected {expected} players, server reports {}",
            self.state.players.current()
        );
    }

    /// Requests a graceful shutdown and returns the server's exit result.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        let _ = self.shutdown_tx.send(());
        tokio::time::timeout(IO_TIMEOUT, self.handle)
            .await
            .expect("Server did not shut down in time")
            .expect("Server task panicked")
    }
}

/// Default configuration for tests.
pub fn test_config() -> Config {
    Config::default()
}

/// The welcome banner for the given live player count.
pub fn welcome(players: usize) -> String {
    format!(
        "Welcome to Minesweeper. {players} people are playing including you. Type 'help' for help."
    )
}

/// A line-oriented client speaking the game protocol.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr)
            .await
            .expect("Failed to connect to test server");
        let (read_half, writer) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer,
        }
    }

    /// Sends one line, appending the `\n` terminator.
    pub async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("Failed to write to server");
    }

    /// Writes raw bytes, returning the error instead of panicking so callers
    /// can send input the server is expected to reject.
    pub async fn send_raw(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.writer.write_all(bytes).await
    }

    /// Asserts the server dropped the connection. A reset counts too, since
    /// the server may close with unread input still queued.
    pub async fn expect_disconnected(&mut self) {
        let mut line = String::new();
        let read = tokio::time::timeout(IO_TIMEOUT, self.reader.read_line(&mut line))
            .await
            .expect("Timed out waiting for the server to drop the connection");
        match read {
            Ok(0) => {}
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionReset => {}
            Ok(_) => panic!("expected the connection to drop, got {line:?}"),
            Err(e) => panic!("unexpected error while waiting for disconnect: {e}"),
        }
    }

    /// Reads one line without its terminator. Panics on EOF or timeout.
    pub async fn read_line(&mut self) -> String {
        let mut line = String::new();
        let read = tokio::time::timeout(IO_TIMEOUT, self.reader.read_line(&mut line))
            .await
            .expect("Timed out waiting for a line")
            .expect("Failed to read from server");
        assert!(read > 0, "server closed the connection unexpectedly");
        assert!(line.ends_with('\n'), "reply {line:?} is not newline-terminated");
        line.pop();
        line
    }

    /// Reads a full board render of `size` rows.
    pub async fn read_board(&mut self, size: usize) -> Vec<String> {
        let mut rows = Vec::with_capacity(size);
        for _ in 0..size {
            rows.push(self.read_line().await);
        }
        rows
    }

    /// Sends a command and reads the board render it produces.
    pub async fn command_board(&mut self, line: &str, size: usize) -> Vec<String> {
        self.send(line).await;
        self.read_board(size).await
    }

    /// Asserts the server closes the connection without sending anything more.
    pub async fn expect_closed(&mut self) {
        let mut line = String::new();
        let read = tokio::time::timeout(IO_TIMEOUT, self.reader.read_line(&mut line))
            .await
            .expect("Timed out waiting for the server to close the connection");
        match read {
            Ok(0) => {}
            Ok(_) => panic!("expected the connection to close, got {line:?}"),
            Err(e) => panic!("expected a clean close, got {e}"),
        }
    }
}
