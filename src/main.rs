use std::fs::{self, File};
use std::io::{self, Write, stdout};
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, MouseEventKind},
    execute, terminal,
};
use log::{info, warn};
use rand::rngs::ThreadRng;

use flappy_scene::audio::Audio;
use flappy_scene::config::GameConfig;
use flappy_scene::engine::{Input, Stage};
use flappy_scene::render::{self, PixelBuf};
use flappy_scene::session::GameSession;
use flappy_scene::storage::JsonFileStore;

const FRAME: Duration = Duration::from_millis(33); // ~30 fps

/// Logs go to a file: stdout and stderr belong to the game screen.
fn init_logging(dir: &Path) {
    let file = fs::create_dir_all(dir).and_then(|_| File::create(dir.join("flappy-scene.log")));
    // without a log file, stay silent rather than write over the screen
    if let Ok(file) = file {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
}

type Game = Stage<GameSession<JsonFileStore, ThreadRng>>;

fn run(out: &mut impl Write, stage: &mut Game) -> flappy_scene::Result<()> {
    let audio = Audio::try_new();

    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2);
    let mut inputs = Vec::new();
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => inputs.push(Input::Flap),
                    _ => {}
                },
                Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
                    inputs.push(Input::Flap);
                }
                Event::Resize(c, r) => buf.resize(c as usize, r as usize * 2),
                _ => {}
            }
        }

        // Update
        let now = Instant::now();
        let cues = stage.frame(now - last, inputs.drain(..));
        last = now;
        if let Some(audio) = &audio {
            for cue in cues {
                audio.play(cue);
            }
        }

        // Render
        render::draw(stage.scene(), &mut buf);
        buf.render(out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

fn main() -> flappy_scene::Result<()> {
    let dir = JsonFileStore::default_dir();
    init_logging(&dir);

    let config = GameConfig::load_or_default(&dir.join("config.json"));
    let store = JsonFileStore::open(dir.join("store.json"))?;
    info!("using store {}", store.path().display());
    let mut stage = Stage::new(GameSession::new(config, store, rand::thread_rng()));

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    // from here on every exit path goes through cleanup
    let result = execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        event::EnableMouseCapture,
    )
    .map_err(flappy_scene::Error::from)
    .and_then(|()| run(&mut out, &mut stage));

    let cleanup = |out: &mut io::Stdout| -> io::Result<()> {
        execute!(
            out,
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    };
    if let Err(e) = cleanup(&mut out) {
        warn!("could not restore the terminal: {e}");
        terminal::disable_raw_mode()?;
    }

    info!("quit after {} runs", stage.scene().runs());
    result
}
