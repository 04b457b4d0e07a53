//! TCP command server

use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::protocol::{Command, Response};

/// Trait that the application implements to execute remote commands
pub trait CommandHandler: Send + Sync + 'static {
    fn handle_command(&mut self, cmd: Command) -> Response;
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Command server handle - keep this alive to keep the server running
pub struct CommandServer {
    local_addr: Option<SocketAddr>,
    _handle: tokio::task::JoinHandle<()>,
}

impl CommandServer {
    /// Start the command server on 127.0.0.1:`port`.
    /// The handler is called for each incoming command.
    /// Returns immediately -- server runs in background.
    pub fn start(handler: Arc<Mutex<dyn CommandHandler>>, port: u16) -> Self {
        let handle = tokio::spawn(async move {
            let addr = format!("127.0.0.1:{}", port);
            let listener = match TcpListener::bind(&addr).await {
                Ok(l) => {
                    log::info!("Command server listening on {}", addr);
                    l
                }
                Err(e) => {
                    log::error!("Failed to bind command server on {}: {}", addr, e);
                    return;
                }
            };
            accept_loop(listener, handler).await;
        });

        Self {
            local_addr: None,
            _handle: handle,
        }
    }

    /// Bind first, then serve in the background. Port 0 picks a free port.
    pub async fn bind(
        handler: Arc<Mutex<dyn CommandHandler>>,
        addr: &str,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await.map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;
        let local_addr = listener.local_addr().ok();
        log::info!("Command server listening on {:?}", local_addr);
        let handle = tokio::spawn(accept_loop(listener, handler));
        Ok(Self {
            local_addr,
            _handle: handle,
        })
    }

    /// Bound address, when known
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }
}

async fn accept_loop(listener: TcpListener, handler: Arc<Mutex<dyn CommandHandler>>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                log::info!("Remote client connected from {}", peer);
                let handler = handler.clone();
                tokio::spawn(async move {
                    handle_connection(stream, handler).await;
                    log::info!("Remote client disconnected: {}", peer);
                });
            }
            Err(e) => {
                log::error!("Command server accept error: {}", e);
            }
        }
    }
}

async fn handle_connection(
    stream: tokio::net::TcpStream,
    handler: Arc<Mutex<dyn CommandHandler>>,
) {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => break, // Connection closed
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let response = match serde_json::from_str::<Command>(trimmed) {
                    Ok(cmd) => {
                        log::debug!("Remote command: {:?}", cmd);
                        let mut h = handler.lock().await;
                        h.handle_command(cmd)
                    }
                    Err(e) => Response::error(format!("Invalid command JSON: {}", e)),
                };

                let mut resp_json = serde_json::to_string(&response).unwrap_or_else(|e| {
                    format!(
                        "{{\"status\":\"error\",\"message\":\"Serialize error: {}\"}}",
                        e
                    )
                });
                resp_json.push('\n');

                if let Err(e) = writer.write_all(resp_json.as_bytes()).await {
                    log::error!("Command server write error: {}", e);
                    break;
                }
                if let Err(e) = writer.flush().await {
                    log::error!("Command server flush error: {}", e);
                    break;
                }
            }
            Err(e) => {
                log::error!("Command server read error: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpStream;

    struct Counter {
        undos: u32,
    }

    impl CommandHandler for Counter {
        fn handle_command(&mut self, cmd: Command) -> Response {
            match cmd {
                Command::Ping => Response::pong(),
                Command::Undo => {
                    self.undos += 1;
                    Response::edit(true)
                }
                _ => Response::error("unsupported"),
            }
        }
    }

    async fn round_trip(stream: &mut BufReader<TcpStream>, line: &str) -> serde_json::Value {
        stream.get_mut().write_all(line.as_bytes()).await.unwrap();
        stream.get_mut().write_all(b"\n").await.unwrap();
        let mut reply = String::new();
        stream.read_line(&mut reply).await.unwrap();
        serde_json::from_str(&reply).unwrap()
    }

    #[tokio::test]
    async fn test_serves_commands_over_tcp() {
        let counter = Arc::new(Mutex::new(Counter { undos: 0 }));
        let handler: Arc<Mutex<dyn CommandHandler>> = counter.clone();
        let server = CommandServer::bind(handler, "127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();

        let mut stream = BufReader::new(TcpStream::connect(addr).await.unwrap());

        let pong = round_trip(&mut stream, r#"{"cmd":"Ping"}"#).await;
        assert_eq!(pong["data"]["message"], "pong");

        let undo = round_trip(&mut stream, r#"{"cmd":"Undo"}"#).await;
        assert_eq!(undo["status"], "ok");
        assert_eq!(undo["data"]["applied"], true);

        let bad = round_trip(&mut stream, "not json").await;
        assert_eq!(bad["status"], "error");

        assert_eq!(counter.lock().await.undos, 1);
    }
}
