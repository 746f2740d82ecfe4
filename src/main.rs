use std::io;
use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use crossterm::cursor;
use crossterm::event;
use crossterm::execute;
use crossterm::queue;
use crossterm::style;
use crossterm::terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lifegrid::app::App;
use lifegrid::config::Config;
use lifegrid::events::AppEvent;
use lifegrid::events::Event;
use lifegrid::io::convert_event;
use lifegrid::render::Canvas;
use lifegrid::render::status_line;
use lifegrid::scheduler::ClockScheduler;

const FRAMERATE: u32 = 60;
const FRAMETIME: Duration = Duration::from_millis(1_000 / FRAMERATE as u64);

const HELP: &str = "space play/pause  n step  c clear  r random  +/- speed  arrows+enter or mouse edit  q quit";

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so that they can be redirected away from the board
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env();
    info!(?config, "starting");

    let mut app = App::new(config, ClockScheduler::new()).context("Failed to create board")?;

    terminal::enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        terminal::EnterAlternateScreen,
        event::EnableMouseCapture,
        cursor::Hide
    )
    .context("Failed to set up terminal")?;

    let res = run(&mut app, &mut stdout);

    // Restore the terminal even when the loop failed
    execute!(
        stdout,
        cursor::Show,
        event::DisableMouseCapture,
        terminal::LeaveAlternateScreen
    )?;
    terminal::disable_raw_mode()?;

    res
}

fn run(app: &mut App<ClockScheduler>, stdout: &mut io::Stdout) -> anyhow::Result<()> {
    let (cols, rows) = terminal::size().context("Failed to read terminal size")?;
    app.handle(Event::AppEvent(AppEvent::Resize { cols, rows }));

    let mut canvas = Canvas::new(app.config().cell);
    let mut dirty = true;

    while !app.should_exit() {
        if dirty {
            draw(app, &mut canvas, stdout)?;
            dirty = false;
        }

        // Wake up for whichever comes first: the next frame or the next generation
        let timeout = app
            .controller()
            .scheduler()
            .until_due()
            .map_or(FRAMETIME, |due| due.min(FRAMETIME));

        if event::poll(timeout)? {
            if let Some(event) = convert_event(event::read()?) {
                app.handle(event);
                dirty = true;
            }
        }

        if app.tick() {
            dirty = true;
        }
    }

    Ok(())
}

fn draw(app: &App<ClockScheduler>, canvas: &mut Canvas, stdout: &mut io::Stdout) -> io::Result<()> {
    let controller = app.controller();

    // The cursor only matters while the board can be edited
    let marker = (!controller.is_playing()).then(|| app.cursor());
    let frame = canvas.render(controller.grid(), marker);

    queue!(
        stdout,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;

    for line in frame.lines() {
        queue!(stdout, style::Print(line), cursor::MoveToNextLine(1))?;
    }

    queue!(
        stdout,
        style::Print(status_line(controller)),
        cursor::MoveToNextLine(1),
        style::Print(HELP),
    )?;

    stdout.flush()
}
