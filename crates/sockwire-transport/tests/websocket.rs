//! WebSocket transport against a real `tokio-tungstenite` client.

#[cfg(feature = "websocket")]
mod websocket {
    use std::sync::Arc;
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use sockwire_transport::{
        Connection, Transport, TransportError, WebSocketConnection,
        WebSocketTransport,
    };
    use tokio_tungstenite::tungstenite::Message;

    type Client = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn accept_one() -> (WebSocketConnection, Client) {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("bound address");

        let accepting =
            tokio::spawn(async move { transport.accept().await });
        let (client, _) =
            tokio_tungstenite::connect_async(format!("ws://{addr}"))
                .await
                .expect("client should connect");
        let conn = accepting
            .await
            .expect("accept task")
            .expect("accept should succeed");
        (conn, client)
    }

    async fn next_text(client: &mut Client) -> String {
        let msg = tokio::time::timeout(Duration::from_secs(2), client.next())
            .await
            .expect("frame in time")
            .expect("stream open")
            .expect("valid frame");
        msg.into_text().expect("text frame").as_str().to_owned()
    }

    #[tokio::test]
    async fn test_frames_flow_in_both_directions() {
        let (conn, mut client) = accept_one().await;

        conn.send_frame(r#"42["hello",1]"#).await.unwrap();
        assert_eq!(next_text(&mut client).await, r#"42["hello",1]"#);

        client.send(Message::text("2")).await.unwrap();
        assert_eq!(conn.recv_frame().await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_send_is_not_held_up_by_pending_recv() {
        let (conn, mut client) = accept_one().await;
        let conn = Arc::new(conn);

        let reader = Arc::clone(&conn);
        let pending = tokio::spawn(async move { reader.recv_frame().await });
        tokio::time::sleep(Duration::from_millis(50)).await;

        tokio::time::timeout(Duration::from_secs(2), conn.send_frame("2"))
            .await
            .expect("send should not wait for the reader")
            .expect("send should succeed");
        assert_eq!(next_text(&mut client).await, "2");

        client.send(Message::text("3")).await.unwrap();
        let got = pending.await.unwrap().unwrap();
        assert_eq!(got.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_binary_frames_must_be_utf8() {
        let (conn, mut client) = accept_one().await;

        client
            .send(Message::Binary(b"3/chat".to_vec().into()))
            .await
            .unwrap();
        assert_eq!(conn.recv_frame().await.unwrap().as_deref(), Some("3/chat"));

        client
            .send(Message::Binary(vec![0xff, 0xfe].into()))
            .await
            .unwrap();
        assert!(matches!(
            conn.recv_frame().await,
            Err(TransportError::NotText(_))
        ));
    }

    #[tokio::test]
    async fn test_recv_is_none_after_peer_close() {
        let (conn, mut client) = accept_one().await;

        client.close(None).await.unwrap();
        assert!(conn.recv_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_close_reaches_the_peer() {
        let (conn, mut client) = accept_one().await;

        conn.close().await.unwrap();
        let next = tokio::time::timeout(Duration::from_secs(2), client.next())
            .await
            .expect("close in time");
        assert!(matches!(next, Some(Ok(Message::Close(_))) | None));
    }

    #[tokio::test]
    async fn test_accept_fails_after_shutdown() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .unwrap();

        transport.shutdown().await.unwrap();
        assert!(matches!(
            transport.accept().await,
            Err(TransportError::Shutdown)
        ));
        // The listener is gone, and stays gone.
        assert!(matches!(
            transport.local_addr(),
            Err(TransportError::Shutdown)
        ));
        assert!(matches!(
            transport.accept().await,
            Err(TransportError::Shutdown)
        ));
    }

    #[tokio::test]
    async fn test_shutdown_handle_wakes_pending_accept() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .unwrap();
        let handle = transport.shutdown_handle();

        let accepting =
            tokio::spawn(async move { transport.accept().await.err() });
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.shutdown();

        let err = tokio::time::timeout(Duration::from_secs(2), accepting)
            .await
            .expect("accept should return after shutdown")
            .unwrap();
        assert!(matches!(err, Some(TransportError::Shutdown)));
    }
}
