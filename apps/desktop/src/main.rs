use anyhow::Result;
use clap::Parser;
use client_core::{DraftListClient, ViewState};
use shared::domain::Game;
use tokio::sync::watch;

#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the drafts API.
    #[arg(long, default_value = "http://127.0.0.1:8081/api")]
    api_base: String,
    /// Trigger one manual refresh after the initial load settles.
    #[arg(long)]
    refresh: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let client = DraftListClient::over_http(args.api_base);
    let mut states = client.subscribe_states();

    println!("Loading drafts...");
    let initial = wait_for_settled(&mut states).await?;
    print_state(&initial);

    if args.refresh {
        let mut busy = client.subscribe_busy();
        client.refresh();
        println!("Refreshing...");
        let refreshed = wait_for_settled(&mut states).await?;
        print_state(&refreshed);

        // The control stays busy for its cooldown window even when the fetch
        // settles sooner.
        while *busy.borrow_and_update() {
            busy.changed().await?;
        }
        println!("Refresh control ready again.");
    }

    Ok(())
}

async fn wait_for_settled(states: &mut watch::Receiver<ViewState>) -> Result<ViewState> {
    loop {
        let state = states.borrow_and_update().clone();
        if !state.is_loading() {
            return Ok(state);
        }
        states.changed().await?;
    }
}

fn print_state(state: &ViewState) {
    match state {
        ViewState::Loading => println!("Loading drafts..."),
        ViewState::Loaded { drafts } if drafts.is_empty() => {
            println!("No drafts available. Seed new ones via the API.");
        }
        ViewState::Loaded { drafts } => {
            for draft in drafts {
                print_draft(draft);
            }
        }
        ViewState::Error { message } => println!("{message}"),
    }
}

fn print_draft(draft: &Game) {
    let players = if draft.players.is_empty() {
        "TBD".to_string()
    } else {
        draft.players.join(", ")
    };
    println!("#{} {}", draft.id.0, draft.title);
    println!("  {}", draft.description);
    println!("  Players: {players}");
}
