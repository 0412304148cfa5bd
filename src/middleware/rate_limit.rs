use axum::{http::StatusCode, Json};
use serde_json::json;

/// Checks a session-keyed message quota stored in Redis.
///
/// Uses the INCR + EXPIRE strategy:
/// - Increments a counter for `key`
/// - On first increment, sets TTL to `window_secs`
/// - Returns 429 if counter exceeds `max_messages`
pub async fn check_message_quota(
    redis: &mut redis::aio::MultiplexedConnection,
    key: &str,
    max_messages: u64,
    window_secs: u64,
) -> Result<(), (StatusCode, Json<serde_json::Value>)> {
    let count: u64 = redis::cmd("INCR")
        .arg(key)
        .query_async(redis)
        .await
        .unwrap_or(0);

    if count == 1 {
        // Set TTL only on first increment to avoid resetting the window on each message
        let _: Result<(), _> = redis::cmd("EXPIRE")
            .arg(key)
            .arg(window_secs)
            .query_async(redis)
            .await;
    }

    if count > max_messages {
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "Has alcanzado el límite de mensajes gratuitos. Vuelve a intentarlo más tarde." })),
        ));
    }

    Ok(())
}

/// Gives a quota slot back when the message never reached the bot.
/// Best-effort: a DECR landing after the window expired only under-counts.
pub async fn refund_message_quota(redis: &mut redis::aio::MultiplexedConnection, key: &str) {
    let _: Result<i64, _> = redis::cmd("DECR").arg(key).query_async(redis).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Minimal RESP server backing a single counter: INCR/DECR move it,
    /// EXPIRE answers 1, everything else (connection setup) answers +OK.
    async fn spawn_counter_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut counter: i64 = 0;
            let mut buf: Vec<u8> = Vec::new();
            let mut chunk = [0u8; 512];
            loop {
                let n = match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => n,
                };
                buf.extend_from_slice(&chunk[..n]);
                while let Some((command, rest)) = next_command(&buf) {
                    let reply = match command.as_str() {
                        "INCR" => {
                            counter += 1;
                            format!(":{counter}\r\n")
                        }
                        "DECR" => {
                            counter -= 1;
                            format!(":{counter}\r\n")
                        }
                        "EXPIRE" => ":1\r\n".to_string(),
                        _ => "+OK\r\n".to_string(),
                    };
                    if socket.write_all(reply.as_bytes()).await.is_err() {
                        return;
                    }
                    buf = rest;
                }
            }
        });
        format!("redis://{addr}")
    }

    /// Parse one complete RESP array; returns the command name and the
    /// unconsumed remainder, or None if the buffer holds a partial command.
    fn next_command(buf: &[u8]) -> Option<(String, Vec<u8>)> {
        let text = std::str::from_utf8(buf).ok()?;
        let mut lines = text.split_inclusive("\r\n");
        let header = lines.next()?;
        if !header.ends_with("\r\n") || !header.starts_with('*') {
            return None;
        }
        let argc: usize = header[1..header.len() - 2].parse().ok()?;
        let mut consumed = header.len();
        let mut name = None;
        for i in 0..argc {
            let len_line = lines.next()?;
            if !len_line.ends_with("\r\n") {
                return None;
            }
            consumed += len_line.len();
            let arg_line = lines.next()?;
            if !arg_line.ends_with("\r\n") {
                return None;
            }
            consumed += arg_line.len();
            if i == 0 {
                name = Some(arg_line[..arg_line.len() - 2].to_uppercase());
            }
        }
        Some((name?, buf[consumed..].to_vec()))
    }

    #[tokio::test]
    async fn quota_denies_after_limit() {
        let url = spawn_counter_server().await;
        let client = redis::Client::open(url).unwrap();
        let mut conn = client.get_multiplexed_async_connection().await.unwrap();

        assert!(check_message_quota(&mut conn, "chat:quota:s1", 2, 60).await.is_ok());
        assert!(check_message_quota(&mut conn, "chat:quota:s1", 2, 60).await.is_ok());

        let denied = check_message_quota(&mut conn, "chat:quota:s1", 2, 60).await;
        assert_eq!(denied.unwrap_err().0, StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn refunded_message_does_not_consume_quota() {
        let url = spawn_counter_server().await;
        let client = redis::Client::open(url).unwrap();
        let mut conn = client.get_multiplexed_async_connection().await.unwrap();

        // One message consumed, then the relay fails and gives it back
        assert!(check_message_quota(&mut conn, "chat:quota:s2", 2, 60).await.is_ok());
        refund_message_quota(&mut conn, "chat:quota:s2").await;

        // The full quota of 2 is still available
        assert!(check_message_quota(&mut conn, "chat:quota:s2", 2, 60).await.is_ok());
        assert!(check_message_quota(&mut conn, "chat:quota:s2", 2, 60).await.is_ok());
    }
}
