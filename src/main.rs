use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use itertools::Itertools;
use log::info;
use memory_match::events::Channel;
use memory_match::game::{
    DeckShuffler, FileStore, GameEngine, RandomShuffler, Settings, SystemClock,
};
use memory_match::model::{
    GameEngineCommand, GameEngineEvent, Outcome, RankingEntry, SessionSnapshot, DECK_COLUMNS,
};
use memory_match::Destroyable;

const TICK_INTERVAL: Duration = Duration::from_secs(1);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

enum Input {
    Line(String),
    Tick,
    Closed,
}

fn init_logging() {
    env_logger::init();
}

fn render_board(snapshot: &SessionSnapshot) {
    println!();
    for row in snapshot.tiles.chunks(DECK_COLUMNS) {
        let line = row
            .iter()
            .map(|tile| match tile.card_id {
                Some(card_id) if tile.is_solved => format!("{:^17}", format!("*{}*", card_id.label())),
                Some(card_id) => format!("{:^17}", card_id.label()),
                None => format!("{:^17}", format!("[{}]", tile.position)),
            })
            .join("|");
        println!("|{}|", line);
    }
    println!(
        "Failed attempts: {}   Time: {}s   {:?}",
        snapshot.attempts, snapshot.elapsed_seconds, snapshot.phase
    );
}

fn render_leaderboard(entries: &[RankingEntry]) {
    println!("Ranking");
    println!("{:>3} {:>10} {:>9}", "#", "Time (s)", "Failures");
    if entries.is_empty() {
        println!("  No games recorded.");
    }
    for (index, entry) in entries.iter().enumerate() {
        println!("{:>3} {:>10} {:>9}", index + 1, entry.elapsed_seconds, entry.attempts);
    }
}

fn print_help() {
    println!("<n>: reveal tile n   r: new game   b: ranking   j: state as json   q: quit");
}

fn spawn_input_threads() -> mpsc::Receiver<Input> {
    let (sender, receiver) = mpsc::channel();

    let line_sender = sender.clone();
    thread::spawn(move || {
        for line in io::stdin().lock().lines().map_while(Result::ok) {
            if line_sender.send(Input::Line(line)).is_err() {
                return;
            }
        }
        let _ = line_sender.send(Input::Closed);
    });

    thread::spawn(move || loop {
        thread::sleep(TICK_INTERVAL);
        if sender.send(Input::Tick).is_err() {
            break;
        }
    });

    receiver
}

fn main() {
    init_logging();

    let data_dir = Settings::data_dir();
    let settings = Settings::load(&data_dir);
    let shuffler: Box<dyn DeckShuffler> = match Settings::seed_from_env() {
        Some(seed) => Box::new(RandomShuffler::seeded(seed)),
        None => Box::new(RandomShuffler::from_entropy()),
    };
    info!("Data directory: {}", data_dir.display());

    let (command_emitter, command_observer) = Channel::<GameEngineCommand>::new();
    let (event_emitter, event_observer) = Channel::<GameEngineEvent>::new();
    let latest = Rc::new(std::cell::RefCell::new(None::<SessionSnapshot>));

    let latest_handler = latest.clone();
    let _render_subscription = event_observer.subscribe(move |event| match event {
        GameEngineEvent::SessionUpdated(snapshot) => {
            render_board(snapshot);
            latest_handler.replace(Some(snapshot.clone()));
        }
        GameEngineEvent::SessionFinished { outcome, entry } => match (outcome, entry) {
            (Outcome::Won, Some(entry)) => println!(
                "Congratulations! Finished in {}s with {} failed attempts. Press r to play again.",
                entry.elapsed_seconds, entry.attempts
            ),
            (Outcome::Lost, _) => println!("Too many failed attempts. Press r to try again."),
            _ => (),
        },
        GameEngineEvent::LeaderboardUpdated(entries) => render_leaderboard(entries),
        _ => (),
    });

    let engine = GameEngine::new(
        command_observer,
        event_emitter,
        settings,
        Box::new(FileStore::new(&data_dir)),
        shuffler,
        Box::new(SystemClock::new()),
    );

    if Settings::is_debug_mode() {
        println!("{}", engine.borrow().deck());
    }
    print_help();
    render_leaderboard(engine.borrow().leaderboard());
    let initial = engine.borrow().snapshot();
    render_board(&initial);
    latest.replace(Some(initial));

    let inputs = spawn_input_threads();
    loop {
        let _ = io::stdout().flush();
        match inputs.recv_timeout(POLL_INTERVAL) {
            Ok(Input::Tick) => command_emitter.emit(GameEngineCommand::Tick),
            Ok(Input::Closed) => break,
            Ok(Input::Line(line)) => match line.trim() {
                "q" | "quit" => break,
                "r" | "reset" => command_emitter.emit(GameEngineCommand::Reset),
                "b" | "ranking" => command_emitter.emit(GameEngineCommand::ReloadLeaderboard),
                "j" | "json" => {
                    if let Some(snapshot) = latest.borrow().as_ref() {
                        match snapshot.to_json() {
                            Ok(json) => println!("{}", json),
                            Err(err) => eprintln!("Could not serialize state: {}", err),
                        }
                    }
                }
                input => match input.parse::<usize>() {
                    Ok(position) => command_emitter.emit(GameEngineCommand::RevealTile(position)),
                    Err(_) => print_help(),
                },
            },
            Err(RecvTimeoutError::Timeout) => command_emitter.emit(GameEngineCommand::Poll),
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    engine.borrow_mut().destroy();
}
