//! Interactive player
//!
//! Reads one command per line from stdin while the player runs:
//!
//! | Input        | Action                          |
//! |--------------|---------------------------------|
//! | `p`          | play / pause                    |
//! | `s SECS`     | seek within the current entry   |
//! | `o R C`      | open reciter `R`, chapter `C`   |
//! | `i`          | print the now-playing line      |
//! | `c`          | close the player                |
//! | `q`          | close and quit                  |

use std::sync::Arc;
use std::time::Duration;
use tilawa_core::ReciterId;
use tilawa_playback::{
    DeviceEventSink, HeadlessDevice, LocalSourceRegistry, PlaybackSnapshot, PlaybackState,
    PlayerHandle, PlayerService, PlaylistResolver, SessionEvent, SessionManager,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use super::AppContext;
use crate::error::Result;

#[derive(Debug, PartialEq)]
enum Input {
    Toggle,
    Seek(f64),
    Open(ReciterId, u16),
    Info,
    Close,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    let mut parts = line.split_whitespace();
    let input = match parts.next()? {
        "p" => Input::Toggle,
        "s" => Input::Seek(parts.next()?.parse().ok()?),
        "o" => {
            let reciter = ReciterId::new(parts.next()?);
            Input::Open(reciter, parts.next()?.parse().ok()?)
        }
        "i" => Input::Info,
        "c" => Input::Close,
        "q" => Input::Quit,
        _ => return None,
    };
    Some(input)
}

fn status_line(snapshot: &PlaybackSnapshot) -> String {
    match (&snapshot.track, snapshot.display_title()) {
        (Some(track), Some(title)) => format!(
            "[{:?}] {} - {}  {}",
            snapshot.state,
            track.reciter_name,
            title,
            snapshot.clock()
        ),
        _ => format!("[{:?}]", snapshot.state),
    }
}

/// Run the interactive player until `q` or end of input
pub async fn run(ctx: &AppContext, initial: Option<(ReciterId, u16)>) -> Result<()> {
    let store = ctx.open_store().await?;
    let registry = LocalSourceRegistry::new();

    let (sink, device_events) = DeviceEventSink::channel();
    let device = HeadlessDevice::new(
        sink,
        registry.clone(),
        ctx.config.device.entry_seconds,
        Duration::from_millis(ctx.config.device.tick_ms),
    );
    let resolver = PlaylistResolver::new(
        Arc::clone(&ctx.catalog),
        Arc::new(store),
        registry.clone(),
        ctx.config.playback.clone(),
    );
    let manager = SessionManager::new(Arc::clone(&ctx.catalog), registry, device);
    let (player, task) = PlayerService::spawn(manager, Arc::new(resolver), device_events);

    println!("p: play/pause  s SECS: seek  o RECITER CHAPTER: open  i: info  c: close  q: quit");

    if let Some((reciter_id, chapter_number)) = initial {
        open(&player, reciter_id, chapter_number).await;
    }

    let mut events = player.events();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Some(Input::Toggle) => player.toggle_play_pause()?,
                    Some(Input::Seek(seconds)) => player.seek(seconds)?,
                    Some(Input::Open(reciter_id, chapter_number)) => {
                        open(&player, reciter_id, chapter_number).await;
                    }
                    Some(Input::Info) => println!("{}", status_line(&player.snapshot())),
                    Some(Input::Close) => player.close_player()?,
                    Some(Input::Quit) => break,
                    None if line.trim().is_empty() => {}
                    None => println!("Unknown command: {}", line.trim()),
                }
            }
            event = events.recv() => match event {
                Ok(event) => report(&player, &event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Dropped session events");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    player.shutdown()?;
    if let Err(e) = task.await {
        tracing::warn!(error = %e, "Player task ended abnormally");
    }
    Ok(())
}

async fn open(player: &PlayerHandle, reciter_id: ReciterId, chapter_number: u16) {
    if let Err(e) = player.play_track(reciter_id, chapter_number).await {
        println!("Can't open: {}", e);
    }
}

fn report(player: &PlayerHandle, event: &SessionEvent) {
    match event {
        SessionEvent::TrackChanged { .. } | SessionEvent::VerseChanged { .. } => {
            println!("{}", status_line(&player.snapshot()));
        }
        SessionEvent::StateChanged { state } => {
            if matches!(state, PlaybackState::Paused | PlaybackState::Idle) {
                println!("[{:?}]", state);
            }
        }
        SessionEvent::PlaybackFailed { message } => println!("Playback failed: {}", message),
        SessionEvent::BookCompleted { reciter_id } => {
            println!("Finished the recitation by {}", reciter_id);
        }
        SessionEvent::PositionUpdate { .. } => {}
    }
}
