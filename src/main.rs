use std::time::Duration;

use clap::Parser;
use color_eyre::Result;

use proctop::app::{App, DEFAULT_REFRESH_SECS, REFRESH_MAX_SECS, REFRESH_MIN_SECS};
use proctop::event::{Event, EventHandler};
use proctop::stats::reader::ProcReader;
use proctop::ui;

#[derive(Parser)]
#[command(
    name = "proctop",
    about = "Live CPU/memory utilization with a ranked process table"
)]
struct Cli {
    /// Initial refresh interval in seconds (1-10)
    #[arg(long, default_value_t = DEFAULT_REFRESH_SECS,
          value_parser = clap::value_parser!(u64).range(REFRESH_MIN_SECS..=REFRESH_MAX_SECS))]
    refresh: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // The only fatal error: the accounting source is unavailable at startup.
    let reader = ProcReader::open()?;

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, reader, cli.refresh).await;

    ratatui::restore();

    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    reader: ProcReader,
    refresh_secs: u64,
) -> Result<()> {
    let mut app = App::new(reader, refresh_secs);
    let mut tick_secs = app.refresh_secs;
    let mut events = EventHandler::new(Duration::from_secs(tick_secs));

    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        if let Some(event) = events.next().await {
            let mut should_draw = false;
            match event {
                Event::Key(key) => {
                    if key.kind == crossterm::event::KeyEventKind::Press {
                        let action = app.map_key(key);
                        app.dispatch(action);
                        should_draw = true;
                    }
                }
                Event::Tick => {
                    app.refresh_data();
                    should_draw = true;
                }
                Event::Resize => {
                    should_draw = true;
                }
            }

            // A +/- command changes the cadence in place; the one input
            // pump stays alive so no pending keystroke is lost to a
            // superseded reader.
            if app.refresh_secs != tick_secs {
                tick_secs = app.refresh_secs;
                events.set_tick_rate(Duration::from_secs(tick_secs));
            }

            if should_draw {
                terminal.draw(|frame| ui::draw(frame, &app))?;
            }
        }
    }

    Ok(())
}
