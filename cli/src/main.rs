//! Headless room client and ops CLI.
//!
//! Speaks the same wire protocol as the browser client: join first, then
//! room messages. `watch` runs the full join/history reconciliation sequence
//! against a live hub; `draw` and `clear` commit single events, which makes
//! the tool useful for smoke-testing a deployment without a browser.

use canvas::camera::Point;
use canvas::engine::shape_between;
use canvas::input::Tool;
use clap::{Args, Parser, Subcommand};
use futures_util::SinkExt;
use shapes::{Envelope, RoomEvent, encode_envelope};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

mod history;
mod session;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket send failed: {0}")]
    WsSend(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket read failed: {0}")]
    WsRead(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket closed by the hub")]
    WsClosed,
    #[error("invalid point `{0}`; expected X,Y")]
    InvalidPoint(String),
    #[error("the selected tool draws nothing")]
    NothingToDraw,
}

#[derive(Parser, Debug)]
#[command(name = "sketchroom", about = "Sketchroom room client and ops CLI")]
struct Cli {
    /// Hub websocket endpoint.
    #[arg(long, env = "SKETCHROOM_WS_URL", default_value = "ws://127.0.0.1:8080/ws")]
    ws_url: String,

    /// Persistence service base URL, for history fetches.
    #[arg(long, env = "SKETCHROOM_HTTP_URL", default_value = "http://127.0.0.1:3001")]
    http_url: String,

    /// Room to join.
    #[arg(long, env = "SKETCHROOM_ROOM")]
    room: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    ws_url: String,
    http_url: String,
    room: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Join the room and stream its canvas to stdout.
    Watch,
    /// Commit one shape drawn between two points.
    Draw(DrawCommand),
    /// Broadcast the clear sentinel to the room.
    Clear,
}

#[derive(Args, Debug)]
struct DrawCommand {
    #[command(subcommand)]
    command: DrawSubcommand,
}

#[derive(Subcommand, Debug)]
enum DrawSubcommand {
    Rect(DrawArgs),
    Circle(DrawArgs),
    Pencil(DrawArgs),
}

#[derive(Args, Debug)]
struct DrawArgs {
    /// Press point as `X,Y`.
    #[arg(long)]
    from: String,

    /// Release point as `X,Y`.
    #[arg(long)]
    to: String,

    /// Stroke color (CSS color string).
    #[arg(long, default_value = "rgba(255, 255, 255)")]
    stroke: String,

    /// Fill color; omit to draw stroke-only.
    #[arg(long)]
    fill: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = CliContext { ws_url: cli.ws_url, http_url: cli.http_url, room: cli.room };

    match cli.command {
        Command::Watch => session::run(&ctx).await,
        Command::Draw(draw) => run_draw(&ctx, draw).await,
        Command::Clear => run_clear(&ctx).await,
    }
}

async fn run_draw(ctx: &CliContext, draw: DrawCommand) -> Result<(), CliError> {
    let (tool, args) = match draw.command {
        DrawSubcommand::Rect(args) => (Tool::Rect, args),
        DrawSubcommand::Circle(args) => (Tool::Circle, args),
        DrawSubcommand::Pencil(args) => (Tool::Pencil, args),
    };

    let from = parse_point(&args.from)?;
    let to = parse_point(&args.to)?;
    let Some(shape) = shape_between(tool, from, to, &args.stroke, args.fill.as_deref()) else {
        return Err(CliError::NothingToDraw);
    };

    let mut ws = connect_and_join(&ctx.ws_url, &ctx.room).await?;
    let event = RoomEvent::Shape(shape.clone());
    send_text(&mut ws, encode_envelope(&Envelope::message(ctx.room.as_str(), &event))).await?;
    ws.close(None).await.unwrap_or_default();

    println!("committed {}", session::describe(&shape));
    Ok(())
}

async fn run_clear(ctx: &CliContext) -> Result<(), CliError> {
    let mut ws = connect_and_join(&ctx.ws_url, &ctx.room).await?;
    send_text(&mut ws, encode_envelope(&Envelope::message(ctx.room.as_str(), &RoomEvent::Clear))).await?;
    ws.close(None).await.unwrap_or_default();

    println!("clear sent to room {}", ctx.room);
    Ok(())
}

// =============================================================================
// TRANSPORT HELPERS
// =============================================================================

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Open the socket and send the join message — the logical first application
/// message on every new connection.
async fn connect_and_join(ws_url: &str, room: &str) -> Result<WsStream, CliError> {
    let (mut ws, _) = connect_async(ws_url)
        .await
        .map_err(|e| CliError::WsConnect(Box::new(e)))?;
    send_text(&mut ws, encode_envelope(&Envelope::join(room))).await?;
    Ok(ws)
}

async fn send_text(ws: &mut WsStream, text: String) -> Result<(), CliError> {
    ws.send(Message::Text(text.into()))
        .await
        .map_err(|e| CliError::WsSend(Box::new(e)))
}

fn parse_point(raw: &str) -> Result<Point, CliError> {
    let Some((x, y)) = raw.split_once(',') else {
        return Err(CliError::InvalidPoint(raw.to_owned()));
    };
    let x: f64 = x.trim().parse().map_err(|_| CliError::InvalidPoint(raw.to_owned()))?;
    let y: f64 = y.trim().parse().map_err(|_| CliError::InvalidPoint(raw.to_owned()))?;
    Ok(Point::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_point_accepts_plain_and_spaced_pairs() {
        assert_eq!(parse_point("100,100").expect("valid"), Point::new(100.0, 100.0));
        assert_eq!(parse_point(" -3.5 , 8 ").expect("valid"), Point::new(-3.5, 8.0));
    }

    #[test]
    fn parse_point_rejects_garbage() {
        assert!(matches!(parse_point("100"), Err(CliError::InvalidPoint(_))));
        assert!(matches!(parse_point("a,b"), Err(CliError::InvalidPoint(_))));
    }
}
