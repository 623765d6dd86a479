#![cfg(feature = "std")]

use rand::{rngs::SmallRng, SeedableRng};
use seabattle::{
    client::play_game, run_session, InMemoryTransport, LineTransport, ProtocolClient,
    ServerMessage, Session, SessionPhase, Side,
};

#[tokio::test]
async fn pair_delivers_lines_in_order() -> anyhow::Result<()> {
    let (mut a, mut b) = InMemoryTransport::pair();
    a.send_line("one").await?;
    a.send_line("two").await?;
    assert_eq!(b.recv_line().await?, Some("one".to_string()));
    assert_eq!(b.recv_line().await?, Some("two".to_string()));

    drop(a);
    assert_eq!(b.recv_line().await?, None);
    assert!(b.send_line("anyone?").await.is_err());
    Ok(())
}

#[tokio::test]
async fn session_answers_in_order_and_closes_on_eof() -> anyhow::Result<()> {
    let (mut server_end, mut client_end) = InMemoryTransport::pair();
    client_end.send_line("SHOOT 1 1").await?;
    client_end.send_line("JOIN_GAME Ann").await?;

    let server = tokio::spawn(async move {
        let mut session = Session::new(SmallRng::seed_from_u64(5));
        let phase = run_session(&mut server_end, &mut session).await?;
        anyhow::Ok((phase, session.player_name().map(str::to_string)))
    });

    assert_eq!(
        client_end.recv_line().await?,
        Some("ERROR join the game before shooting".to_string())
    );
    assert_eq!(client_end.recv_line().await?, Some("GAME_STARTED 0".to_string()));
    drop(client_end);

    let (phase, name) = server.await??;
    assert_eq!(phase, SessionPhase::Closed);
    assert_eq!(name.as_deref(), Some("Ann"));
    Ok(())
}

#[tokio::test]
async fn quit_ends_the_session() -> anyhow::Result<()> {
    let (mut server_end, mut client_end) = InMemoryTransport::pair();
    let server = tokio::spawn(async move {
        let mut session = Session::new(SmallRng::seed_from_u64(6));
        run_session(&mut server_end, &mut session).await
    });

    let mut client = ProtocolClient::new(client_end);
    assert_eq!(client.join("Ann").await?, Side::First);
    client.quit().await?;
    assert_eq!(server.await??, SessionPhase::Closed);
    assert_eq!(client.next_message().await?, None);
    Ok(())
}

#[tokio::test]
async fn full_game_over_in_memory() -> anyhow::Result<()> {
    let (mut server_end, client_end) = InMemoryTransport::pair();
    let server = tokio::spawn(async move {
        let mut session = Session::new(SmallRng::seed_from_u64(7));
        let phase = run_session(&mut server_end, &mut session).await?;
        anyhow::Ok((phase, session.engine().winner()))
    });

    let mut client = ProtocolClient::new(client_end);
    let mut rng = SmallRng::seed_from_u64(8);
    let winner = play_game(&mut client, "Ann", &mut rng).await?;

    let (phase, engine_winner) = server.await??;
    assert_eq!(phase, SessionPhase::Finished);
    assert_eq!(engine_winner, Some(winner));
    assert_eq!(client.next_message().await?, None);
    Ok(())
}

#[tokio::test]
async fn errors_do_not_end_the_session() -> anyhow::Result<()> {
    let (mut server_end, client_end) = InMemoryTransport::pair();
    let server = tokio::spawn(async move {
        let mut session = Session::new(SmallRng::seed_from_u64(9));
        run_session(&mut server_end, &mut session).await
    });

    let mut client = ProtocolClient::new(client_end);
    client.shoot(0, 0).await?;
    assert!(matches!(
        client.next_message().await?,
        Some(ServerMessage::Error(_))
    ));
    assert_eq!(client.join("Ann").await?, Side::First);
    client.ready().await?;
    client.quit().await?;
    assert_eq!(server.await??, SessionPhase::Closed);
    Ok(())
}
