//! Scenario tests for the connection layer.
//!
//! A scripted fake simulator runs on the other end of an in-memory pipe (or
//! a loopback socket) and records every frame the agent sends.

use super::*;
use crate::config::ConnectionConfig;
use crate::protocol::commands::Team;
use crate::protocol::{PlayMode, TeamSide, encode, read_frame, write_frame};
use crate::{AgentError, Severity};
use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt, DuplexStream, duplex};
use tokio::net::TcpListener;
use tracing_subscriber::fmt::MakeWriter;

const TICK: &str = "(time (now 1.00))(GS (t 0.00) (pm BeforeKickOff))";

fn config(settle_cycles: u32) -> ConnectionConfig {
    ConnectionConfig { settle_cycles, ..ConnectionConfig::agent() }
}

/// Plays the simulator side of the handshake and returns what it received.
async fn handshake_server(mut server: DuplexStream, first_state: String, settle_cycles: u32) -> Vec<String> {
    let mut received = Vec::new();

    received.push(read_frame(&mut server).await.unwrap());
    write_frame(&mut server, "(time (now 0.00))").await.unwrap();

    received.push(read_frame(&mut server).await.unwrap());
    write_frame(&mut server, "(time (now 0.02))").await.unwrap();

    received.push(read_frame(&mut server).await.unwrap());
    write_frame(&mut server, &first_state).await.unwrap();

    received.push(read_frame(&mut server).await.unwrap());
    for _ in 0..settle_cycles {
        write_frame(&mut server, TICK).await.unwrap();
        received.push(read_frame(&mut server).await.unwrap());
    }

    received
}

fn first_state(unum: u8, side: &str) -> String {
    format!("(time (now 0.04))(GS (unum {unum}) (team {side}) (t 0.00) (pm BeforeKickOff))")
}

#[tokio::test]
async fn assigned_id_handshake() {
    let (client, server) = duplex(64 * 1024);
    let server = tokio::spawn(handshake_server(server, first_state(3, "left"), 100));

    let mut connection = AgentConnection::from_stream(client, &config(100));
    let identity = connection.init_robot("0", "Newbies", 1.0, 2.0, 3.0).await.unwrap();
    let received = server.await.unwrap();

    assert_eq!(identity.player_id, 3);
    assert_eq!(identity.team_side, TeamSide::Left);
    assert_eq!(identity.team_name, "Newbies");
    assert_eq!(identity.beam, crate::beam::beam_pose(3).unwrap());
    assert_eq!(connection.identity(), Some(&identity));

    assert_eq!(received[0], "(scene rsg/agent/nao/nao.rsg)(syn)");
    assert_eq!(received[1], "(init (unum 0)(teamname Newbies))(syn)");
    assert_eq!(received[2], "(syn)");
    assert_eq!(received[3], "(beam -1 2 0)(syn)");
    assert_eq!(received.len(), 4 + 100);
    assert!(received[4..].iter().all(|m| m == "(syn)"));
}

#[tokio::test]
async fn explicit_id_handshake_keeps_supplied_pose() {
    let (client, server) = duplex(64 * 1024);
    let server = tokio::spawn(handshake_server(server, first_state(5, "right"), 2));

    let mut connection = AgentConnection::from_stream(client, &config(2));
    let identity = connection.init_robot("5", "Newbies", 1.0, 2.0, 3.0).await.unwrap();
    let received = server.await.unwrap();

    assert_eq!(identity.player_id, 5);
    assert_eq!(identity.team_side, TeamSide::Right);
    assert_eq!(received[1], "(init (unum 5)(teamname Newbies))(syn)");
    assert_eq!(received[3], "(beam 1 2 3)(syn)");
}

#[tokio::test]
async fn identity_is_resolved_once() {
    let (client, server) = duplex(64 * 1024);
    let server = tokio::spawn(handshake_server(server, first_state(4, "left"), 0));

    let mut connection = AgentConnection::from_stream(client, &config(0));
    connection.init_robot("4", "Newbies", -1.0, -2.0, 0.0).await.unwrap();
    server.await.unwrap();

    let err = connection.init_robot("4", "Newbies", -1.0, -2.0, 0.0).await.unwrap_err();
    assert!(matches!(err, AgentError::Handshake { .. }));
}

#[tokio::test]
async fn missing_game_state_fails_handshake() {
    let (client, server) = duplex(64 * 1024);
    let server = tokio::spawn(handshake_server(server, "(time (now 0.04))".to_string(), 0));

    let mut connection = AgentConnection::from_stream(client, &config(0));
    let err = connection.init_robot("0", "Newbies", 0.0, 0.0, 0.0).await.unwrap_err();
    assert!(matches!(err, AgentError::Handshake { .. }));
    assert!(connection.identity().is_none());
    drop(connection);
    server.abort();
}

#[tokio::test]
async fn beam_needs_identity_and_resends_pose() {
    let (client, server) = duplex(64 * 1024);
    let server = tokio::spawn(handshake_server(server, first_state(9, "left"), 0));

    let mut connection = AgentConnection::from_stream(client, &config(0));
    assert!(matches!(connection.send_beam_message().await, Err(AgentError::Handshake { .. })));

    connection.init_robot("0", "Newbies", 0.0, 0.0, 0.0).await.unwrap();
    let received = server.await.unwrap();
    assert_eq!(received[3], "(beam -4 0 0)(syn)");
    assert_eq!(connection.beam_command().unwrap(), "(beam -4 0 0)");
}

#[tokio::test(start_paused = true)]
async fn receive_bound_turns_silence_into_timeout() {
    let (client, _server) = duplex(1024);
    let timeout = Duration::from_millis(500);
    let mut connection = AgentConnection::from_stream(client, &ConnectionConfig::agent().with_receive_timeout(timeout));

    let err = connection.get_server_message().await.unwrap_err();
    assert!(matches!(err, AgentError::Timeout { duration } if duration == timeout));
    assert!(err.is_fatal());
}

#[tokio::test(start_paused = true)]
async fn timeout_inside_a_frame_breaks_the_connection() {
    let (client, mut server) = duplex(1024);
    let config = ConnectionConfig::agent().with_receive_timeout(Duration::from_millis(500));
    let mut connection = AgentConnection::from_stream(client, &config);

    let frame = encode("(time (now 1.00))").unwrap();
    server.write_all(&frame[..6]).await.unwrap();

    let err = connection.get_server_message().await.unwrap_err();
    assert!(matches!(err, AgentError::Timeout { .. }));
    assert!(connection.is_broken());

    // The rest arrives, followed by a whole frame. None of it may be read.
    server.write_all(&frame[6..]).await.unwrap();
    write_frame(&mut server, "(syn)").await.unwrap();
    connection.set_receive_timeout(None);

    let err = connection.get_server_message().await.unwrap_err();
    assert!(matches!(err, AgentError::Connection { .. }));
    assert!(err.is_fatal());
    assert!(matches!(connection.send_agent_message("(syn)").await, Err(AgentError::Connection { .. })));
}

#[tokio::test(start_paused = true)]
async fn timeout_between_frames_also_stops_the_connection() {
    let (client, mut server) = duplex(1024);
    let config = ConnectionConfig::agent().with_receive_timeout(Duration::from_millis(20));
    let mut connection = AgentConnection::from_stream(client, &config);

    write_frame(&mut server, "M1").await.unwrap();
    assert_eq!(connection.get_server_message().await.unwrap(), "M1");
    assert!(!connection.is_broken());

    assert!(matches!(connection.get_server_message().await, Err(AgentError::Timeout { .. })));
    write_frame(&mut server, "M2").await.unwrap();
    assert!(matches!(connection.get_server_message().await, Err(AgentError::Connection { .. })));
}

#[tokio::test]
async fn closed_server_is_fatal() {
    let (client, server) = duplex(1024);
    drop(server);
    let mut connection = AgentConnection::from_stream(client, &ConnectionConfig::agent());

    let err = connection.get_server_message().await.unwrap_err();
    assert_eq!(err.severity(), Severity::Fatal);

    let err = connection.send_agent_message("(syn)").await.unwrap_err();
    assert!(matches!(err, AgentError::Connection { .. }));
}

#[tokio::test]
async fn tcp_agent_connection_preserves_order_and_framing() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        for text in ["M1", "M2", "M3"] {
            write_frame(&mut socket, text).await.unwrap();
        }
        let mut raw = [0u8; 9];
        socket.read_exact(&mut raw).await.unwrap();
        raw
    });

    let mut connection = AgentConnection::connect("127.0.0.1", port).await.unwrap();
    assert_eq!(connection.endpoint(), format!("127.0.0.1:{port}"));
    for expected in ["M1", "M2", "M3"] {
        assert_eq!(connection.get_server_message().await.unwrap(), expected);
    }
    connection.send_agent_message("(syn)").await.unwrap();

    assert_eq!(&server.await.unwrap(), b"\x00\x00\x00\x05(syn)");
}

#[tokio::test]
async fn refused_connection_is_an_establishment_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = AgentConnection::connect("127.0.0.1", port).await.err().expect("nothing listens");
    assert!(matches!(err, AgentError::Establishment { .. }));
    assert!(err.to_string().contains(&port.to_string()));
}

#[tokio::test]
async fn trainer_commands_use_agent_framing() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        for _ in 0..4 {
            received.push(read_frame(&mut socket).await.unwrap());
        }
        received
    });

    let mut trainer = TrainerCommands::new(TrainerConnection::connect("127.0.0.1", port).await.unwrap());
    trainer.drop_ball().await.unwrap();
    trainer.kick_off(Team::Left).await.unwrap();
    trainer.beam_ball_on_ground(2.5, 0.0).await.unwrap();
    trainer.set_play_mode(PlayMode::PlayOn).await.unwrap();

    assert_eq!(
        server.await.unwrap(),
        [
            "(dropBall)",
            "(kickOff Left)",
            "(ball (pos 2.5 0 0.042) (vel 0 0 0))",
            "(playMode PlayOn)",
        ]
    );
}

/// Collects formatted log output for assertions.
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn trainer_connect_logs_the_endpoint_once() {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let accept = tokio::spawn(async move { listener.accept().await.map(|(socket, _)| socket) });

    let trainer = TrainerConnection::connect("127.0.0.1", port).await.unwrap();
    let _socket = accept.await.unwrap().unwrap();

    let endpoint = format!("127.0.0.1:{port}");
    assert_eq!(trainer.endpoint(), endpoint);
    assert_eq!(capture.text().lines().filter(|line| line.contains(&endpoint)).count(), 1);
}

#[tokio::test]
async fn kick_off_without_a_side() {
    let mut trainer = TrainerCommands::new(TrainerConnection::from_stream(Vec::new(), "memory"));
    trainer.kick_off_any().await.unwrap();
    trainer.kick_off(Team::Right).await.unwrap();

    let mut wire = Cursor::new(trainer.into_inner().into_inner());
    assert_eq!(read_frame(&mut wire).await.unwrap(), "(kickOff None)");
    assert_eq!(read_frame(&mut wire).await.unwrap(), "(kickOff Right)");
}

#[tokio::test]
async fn trainer_frames_are_bit_identical() {
    let mut trainer = TrainerConnection::from_stream(Vec::new(), "memory");
    trainer.send_trainer_message("(dropBall)").await.unwrap();
    let mut agent_side = Vec::new();
    write_frame(&mut agent_side, "(dropBall)").await.unwrap();

    assert_eq!(trainer.into_inner(), agent_side);
}

/// A writer whose peer has gone away.
struct ClosedPipe;

impl AsyncWrite for ClosedPipe {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, _buf: &[u8]) -> Poll<io::Result<usize>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer closed")))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[tokio::test]
async fn trainer_send_failure_is_degraded() {
    let mut trainer = TrainerCommands::new(TrainerConnection::from_stream(ClosedPipe, "closed"));

    let err = trainer.drop_ball().await.unwrap_err();
    assert!(matches!(err, AgentError::TrainerSend { .. }));
    assert_eq!(err.severity(), Severity::Degraded);

    // The connection stays usable for later attempts.
    assert!(trainer.move_rotate_player(Team::Left, 2, 2.0, 0.0, 0.375, -90.0).await.is_err());
    assert_eq!(trainer.connection().endpoint(), "closed");
}
