// tests/integration/concurrency_test.rs

//! Tests for many clients sharing one board at the same time.

use super::fixtures::{CHECKERED_4X4, OPEN_8X8};
use super::test_helpers::TestServer;
use futures::future::join_all;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_digs_on_disjoint_squares() {
    let server = TestServer::start(CHECKERED_4X4).await;
    let (mut a, _) = server.connect().await;
    let (mut b, _) = server.connect().await;

    let (_, _) = tokio::join!(a.command_board("dig 0 1", 4), b.command_board("dig 2 2", 4));

    let (mut observer, _) = server.connect().await;
    assert_eq!(
        observer.command_board("look", 4).await,
        vec!["- --", "----", "-- -", "----"]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_client_sees_every_flag() {
    let server = TestServer::start(OPEN_8X8).await;

    let mut clients = Vec::new();
    for _ in 0..8 {
        clients.push(server.connect().await.0);
    }
    server.wait_for_players(8).await;

    join_all(
        clients
            .iter_mut()
            .enumerate()
            .map(|(row, client)| async move {
                client.command_board(&format!("flag {row} {row}"), 8).await
            }),
    )
    .await;

    let expected: Vec<String> = (0..8)
        .map(|row| {
            (0..8)
                .map(|col| if row == col { 'F' } else { '-' })
                .collect()
        })
        .collect();
    for client in &mut clients {
        assert_eq!(client.command_board("look", 8).await, expected);
    }
    assert_eq!(server.state.stats.get_total_commands(), 16);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_renders_are_never_torn_during_cascade() {
    let server = TestServer::start(OPEN_8X8).await;
    let (mut digger, _) = server.connect().await;
    let (mut watcher, _) = server.connect().await;

    let watch = async {
        let mut renders = Vec::new();
        for _ in 0..20 {
            renders.push(watcher.command_board("look", 8).await);
        }
        renders
    };
    let (_, renders) = tokio::join!(digger.command_board("dig 4 4", 8), watch);

    // The single dig reveals the whole open board at once, so every snapshot
    // is either entirely untouched or entirely dug.
    for render in renders {
        let glyphs: String = render.concat();
        assert!(
            glyphs.chars().all(|c| c == '-') || glyphs.chars().all(|c| c == ' '),
            "torn render: {render:?}"
        );
    }
}
