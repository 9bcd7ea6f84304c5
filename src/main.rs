#![warn(clippy::perf)]
#![warn(clippy::unwrap_used)]

use std::io::{self, BufRead, Write};

use guessgame::{
    logging,
    page::{ElementId, MemoryPage, Page},
    session::{clock::SystemClock, IdGenerator},
    App, Config, Event, Key, Outcome, Propagation, Verdict,
};
use thisslime::TracingError;

use tracing::{debug, info};

type ConsoleApp = App<MemoryPage, SystemClock, IdGenerator>;

const HELP: &str = "\
commands:
  start             start a new round
  hint              reveal the next hint
  type <text>       type into the answer field
  suggest <name>    show an autocomplete suggestion
  tab               accept the suggestion
  enter             press enter
  right | wrong     judge the current answer
  resize <height>   resize the window
  stats             show timers and accuracy
  quit";

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    logging::init_tracing(&config.logs.filter);
    info!(?config, "config loaded");

    let session = guessgame::GameSession::with_strategy(
        config.session.id_strategy,
        config.session.id_bits,
    );
    let mut app = App::new(session, MemoryPage::game_screen(900), config.ui);
    app.handle(Event::Load)?;

    println!("{HELP}");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        app.handle(Event::Tick)?;

        let (command, rest) = line
            .trim()
            .split_once(' ')
            .unwrap_or((line.trim(), ""));

        match command {
            "" => {}
            "quit" | "exit" => break,
            "help" => println!("{HELP}"),
            _ => {
                if let Err(err) = run(&mut app, command, rest.trim()) {
                    err.trace();
                    return Err(err.into());
                }
            }
        }
    }

    print_stats(&app);
    Ok(())
}

fn run(app: &mut ConsoleApp, command: &str, arg: &str) -> guessgame::Result<()> {
    match command {
        "start" => start(app)?,
        "hint" => {
            if let Outcome::Hint { game_id, hint_id } = app.handle(Event::RevealHint)? {
                println!("round {game_id}: hint #{hint_id}");
            }
        }
        "type" => {
            app.page_mut().set_value(ElementId::AnswerBox, arg);
        }
        "suggest" => {
            let page = app.page_mut();
            page.set_value(ElementId::PredictionBox, arg);
            page.set_content(ElementId::Prediction, arg);
        }
        "tab" => {
            app.handle(Event::KeyDown(Key::Tab))?;
            println!("answer: {}", app.current_answer());
        }
        "enter" => {
            // the start button's own handler begins the round
            if app.handle(Event::KeyDown(Key::Enter))? == Outcome::Key(Propagation::Stop) {
                start(app)?;
            }
        }
        "right" => {
            app.handle(Event::Answer(Verdict::Correct))?;
            println!("correct: {}", app.current_answer());
        }
        "wrong" => {
            app.handle(Event::Answer(Verdict::Wrong))?;
            println!("wrong: {}", app.current_answer());
        }
        "resize" => match arg.parse() {
            Ok(height) => {
                app.page_mut().resize(height);
                app.handle(Event::Resize)?;
            }
            Err(_) => println!("not a height: {arg}"),
        },
        "stats" => print_stats(app),
        other => {
            debug!(command = other, "unknown command");
            println!("unknown command `{other}`, try `help`");
        }
    }

    Ok(())
}

fn start(app: &mut ConsoleApp) -> guessgame::Result<()> {
    if let Outcome::Round(game_id) = app.handle(Event::StartRound)? {
        println!("round {game_id} started");
    }

    Ok(())
}

fn print_stats(app: &ConsoleApp) {
    let session = app.session();
    let stats = session.stats();

    let accuracy = stats
        .accuracy()
        .map_or_else(|| "-".to_owned(), |ratio| format!("{:.0}%", ratio * 100.0));

    println!(
        "round {} | game {} | app {} | {}/{} correct ({accuracy})",
        session.game_id(),
        session.game_time(),
        session.app_time(),
        stats.correct(),
        stats.total(),
    );
}
