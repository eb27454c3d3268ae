use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use location_recommender::config::Config;
use location_recommender::models::{
    ChatTurn, Popularity, RecommendationResult, SearchState, Sender,
};
use location_recommender::search::SearchController;
use location_recommender::state::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't interleave with rendered results
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    tracing::info!("Recommendation API: {}", config.api_base_url);
    tracing::info!("Chat backend: {}", config.chat_base_url);

    let session = Session::new(config).context("Failed to create session")?;

    spawn_search_view("search", session.recommendations.subscribe());
    spawn_search_view("tag", session.tag_search.subscribe());
    spawn_search_view("all", session.all_locations.subscribe());
    spawn_chat_view(session.chat.subscribe());

    print_help();

    // Refetch and clear apply to whichever search view was used last
    let mut active: SearchController = session.recommendations.clone();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Empty => {}
            Command::Help => print_help(),
            Command::Quit => break,
            Command::Search(text) => {
                active = session.recommendations.clone();
                let session = session.clone();
                tokio::spawn(async move {
                    session.recommend(&text).await;
                });
            }
            Command::Tag(tag) => {
                active = session.tag_search.clone();
                let session = session.clone();
                tokio::spawn(async move {
                    session.search_by_tag(&tag).await;
                });
            }
            Command::All => {
                active = session.all_locations.clone();
                let ctl = active.clone();
                tokio::spawn(async move {
                    ctl.load_all().await;
                });
            }
            Command::Refetch => {
                let ctl = active.clone();
                tokio::spawn(async move {
                    if ctl.refetch().await.is_none() && ctl.last_request().is_none() {
                        println!("Nothing to refetch yet.");
                    }
                });
            }
            Command::Clear => active.clear(),
            Command::Chat(message) => {
                let chat = session.chat.clone();
                tokio::spawn(async move {
                    chat.send(&message).await;
                });
            }
        }
    }

    Ok(())
}

enum Command {
    Empty,
    Help,
    Quit,
    Search(String),
    Tag(String),
    All,
    Refetch,
    Clear,
    Chat(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Self::Search(line.to_string());
        };
        let (cmd, arg) = rest.split_once(' ').unwrap_or((rest, ""));
        let arg = arg.trim().to_string();
        match cmd {
            "tag" => Self::Tag(arg),
            "all" => Self::All,
            "refetch" => Self::Refetch,
            "clear" => Self::Clear,
            "chat" => Self::Chat(arg),
            "quit" | "exit" => Self::Quit,
            _ => Self::Help,
        }
    }
}

fn print_help() {
    println!("Type a query to get recommendations, e.g. `beach`, `hiking`, `whales`.");
    println!("  /tag <tag>      search by exact tag");
    println!("  /all            list every location");
    println!("  /refetch        repeat the last search");
    println!("  /clear          reset the last used view");
    println!("  /chat <message> talk to the travel assistant");
    println!("  /quit");
}

fn spawn_search_view(label: &'static str, mut rx: watch::Receiver<SearchState>) {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            render_search(label, &state);
        }
    });
}

fn spawn_chat_view(mut rx: watch::Receiver<Vec<ChatTurn>>) {
    tokio::spawn(async move {
        let mut shown = 0;
        while rx.changed().await.is_ok() {
            let turns = rx.borrow_and_update().clone();
            for turn in turns.iter().skip(shown) {
                match turn.sender {
                    Sender::User => println!("  you > {}", turn.text),
                    Sender::Bot => println!("  bot > {}", turn.text),
                }
            }
            shown = turns.len();
        }
    });
}

fn render_search(label: &str, state: &SearchState) {
    match state {
        SearchState::Idle => println!("[{label}] cleared"),
        SearchState::Loading => println!("[{label}] loading..."),
        SearchState::Error { message } => println!("[{label}] error: {message}"),
        SearchState::Success(found) => {
            if found.results.is_empty() {
                println!("[{label}] no locations found");
                return;
            }
            println!(
                "[{label}] {} of {} result(s)",
                found.results.len(),
                found.total_results
            );
            if !found.message.is_empty() {
                println!("  {}", found.message);
            }
            for (idx, place) in found.results.iter().enumerate() {
                println!("{}", render_place(idx, place));
            }
        }
    }
}

fn render_place(idx: usize, place: &RecommendationResult) -> String {
    let rank = place.rank.map(|r| r as usize).unwrap_or(idx + 1);
    let mut line = format!("  {rank}. {} ({})", place.name, place.location);
    if let Some(score) = place.similarity_score {
        line.push_str(&format!(" {:.0}% match", score * 100.0));
    }
    line.push_str(&format!(" [{}]", popularity_label(place.popularity)));
    if !place.tags.is_empty() {
        line.push_str(&format!("\n     tags: {}", place.tags.join(", ")));
    }
    if let Some(best_for) = place.best_for.as_ref().filter(|b| !b.is_empty()) {
        line.push_str(&format!("\n     best for: {}", best_for.join(", ")));
    }
    if let Some(snippet) = &place.description_snippet {
        line.push_str(&format!("\n     {snippet}"));
    }
    line
}

fn popularity_label(popularity: Popularity) -> &'static str {
    match popularity {
        Popularity::VeryHigh => "very popular",
        Popularity::High => "popular",
        Popularity::Medium => "moderately visited",
        Popularity::Low => "off the beaten path",
        Popularity::Unknown => "popularity unknown",
    }
}
