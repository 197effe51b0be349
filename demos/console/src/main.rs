//! Minimal terminal front-end for the dropfour client.
//!
//! Connects to a server, re-renders the board whenever the server pushes a
//! state update, and reads commands from stdin:
//!
//! ```text
//! place <col> | new | state | quit
//! ```
//!
//! Server endpoint comes from `DROPFOUR_HOST` / `DROPFOUR_PORT`
//! (default `localhost:8080`). Set `RUST_LOG=dropfour_client=debug` to see
//! the connection diagnostics.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use dropfour_client::{ClientConfig, GameClient, GameSession, Stage, Token};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let host = std::env::var("DROPFOUR_HOST")
        .unwrap_or_else(|_| "localhost".to_string());
    let port = std::env::var("DROPFOUR_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let client = GameClient::connect(ClientConfig::for_endpoint(&host, port));
    let mut updates = client.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("connecting to ws://{host}:{port}/websocket");
    println!("commands: place <col> | new | state | quit");

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let session = updates.borrow_and_update().clone();
                print!("{}", render(&session));
                if session.terminated {
                    break;
                }
            }
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                if !handle_line(&client, line.trim()) {
                    break;
                }
            }
        }
    }

    client.close().await;
}

/// Runs one input line. Returns `false` when the user quits.
fn handle_line(client: &GameClient, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let result = match (parts.next(), parts.next()) {
        (None, _) => return true,
        (Some("quit"), _) => return false,
        (Some("new"), _) => client.new_game(),
        (Some("state"), _) => client.request_state(),
        (Some("place"), Some(col)) => match col.parse() {
            Ok(col) => client.place(col),
            Err(_) => {
                println!("usage: place <col>");
                return true;
            }
        },
        _ => {
            println!("commands: place <col> | new | state | quit");
            return true;
        }
    };
    if let Err(e) = result {
        println!("{e}");
    }
    true
}

fn render(session: &GameSession) -> String {
    let mut out = String::new();

    if session.terminated {
        out.push_str("session closed by server\n");
        return out;
    }

    match session.stage {
        Stage::NotStarted => {
            out.push_str("not started - waiting for an opponent\n");
        }
        Stage::InProgress => {
            render_board(session, &mut out);
            if session.my_turn {
                out.push_str("your move\n");
            } else {
                out.push_str("waiting for the opponent\n");
            }
        }
        Stage::Won => {
            render_board(session, &mut out);
            // The final snapshot leaves `turn` on the winning token.
            if session.my_turn {
                out.push_str("game over - you won!\n");
            } else {
                out.push_str("game over - you lost\n");
            }
        }
    }
    out
}

fn render_board(session: &GameSession, out: &mut String) {
    let board = &session.board;
    for row in 0..board.rows() {
        for col in 0..board.columns() {
            out.push(match board.cell(col, row) {
                Some(Token::Red) => 'R',
                Some(Token::Yellow) => 'Y',
                None => '.',
            });
            out.push(' ');
        }
        out.push('\n');
    }
    for col in 0..board.columns() {
        out.push_str(&format!("{col} "));
    }
    out.push('\n');
}
