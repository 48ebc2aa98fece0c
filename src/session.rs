//! The game loop controller.

use log::{debug, info, warn};
use rand::Rng;

use crate::config::GameConfig;
use crate::engine::{Context, Cue, Input, Scene};
use crate::physics::{Body, Physics};
use crate::storage::{self, KeyValueStore};
use crate::timer::TimerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    GameOver,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    /// Visual tilt in degrees, positive is nose down.
    pub angle: f32,
    /// Set when the run ends; the renderer draws the bird red.
    pub hit: bool,
}

impl Player {
    fn spawn(config: &GameConfig) -> Self {
        Self {
            body: Body::new(
                config.bird_x,
                config.height / 2.0,
                config.bird_width,
                config.bird_height,
                (0.5, 0.5),
            ),
            angle: 0.0,
            hit: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Pipe {
    pub body: Body,
    pub scored: bool,
}

impl Pipe {
    fn new(x: f32, y: f32, config: &GameConfig, origin: (f32, f32)) -> Self {
        let mut body = Body::new(x, y, config.pipe_width, config.pipe_height, origin);
        body.allow_gravity = false;
        body.vx = -config.pipe_speed;
        Self {
            body,
            scored: false,
        }
    }
}

/// Top and bottom pipe around one gap. Each half scores half a point.
#[derive(Clone, Debug)]
pub struct PipePair {
    pub top: Pipe,
    pub bottom: Pipe,
}

impl PipePair {
    /// Top edge of the gap.
    pub fn gap_top(&self) -> f32 {
        self.top.body.bounds().bottom
    }

    pub fn gap_bottom(&self) -> f32 {
        self.bottom.body.bounds().top
    }

    fn off_screen(&self) -> bool {
        self.top.body.bounds().right < 0.0 && self.bottom.body.bounds().right < 0.0
    }
}

/// Score counted in half points so "is it whole" is exact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score {
    halves: u32,
}

impl Score {
    pub fn add_half(&mut self) {
        self.halves += 1;
    }

    pub fn is_whole(&self) -> bool {
        self.halves % 2 == 0
    }

    /// Completed points, rounding a pending half down.
    pub fn points(&self) -> u32 {
        self.halves / 2
    }

    pub fn value(&self) -> f32 {
        self.halves as f32 / 2.0
    }
}

pub struct GameSession<K, R> {
    config: GameConfig,
    physics: Physics,
    player: Player,
    pipes: Vec<PipePair>,
    score: Score,
    /// Only changes when `score` lands on a whole number.
    displayed_score: u32,
    high_score: u32,
    state: State,
    runs: u32,
    store: K,
    rng: R,
}

impl<K, R> GameSession<K, R> {
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn displayed_score(&self) -> u32 {
        self.displayed_score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Number of runs started, including the current one.
    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Direct body access for tests that need to stage a position.
    #[doc(hidden)]
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn pipes(&self) -> &[PipePair] {
        &self.pipes
    }

    #[doc(hidden)]
    pub fn pipes_mut(&mut self) -> &mut Vec<PipePair> {
        &mut self.pipes
    }

    pub fn physics_paused(&self) -> bool {
        self.physics.paused
    }
}

impl<K: KeyValueStore, R: Rng> GameSession<K, R> {
    /// Reads the persisted high score once; runs start when the session is
    /// handed to a `Stage`.
    pub fn new(config: GameConfig, store: K, rng: R) -> Self {
        let high_score = storage::load_high_score(&store);
        info!("loaded high score {high_score}");
        Self {
            physics: Physics::new(config.gravity),
            player: Player::spawn(&config),
            pipes: Vec::new(),
            score: Score::default(),
            displayed_score: 0,
            high_score,
            state: State::Running,
            runs: 0,
            store,
            rng,
            config,
        }
    }

    fn initialize(&mut self, ctx: &mut Context) {
        self.state = State::Running;
        self.score = Score::default();
        self.displayed_score = 0;
        self.pipes.clear();
        self.player = Player::spawn(&self.config);
        ctx.timers
            .add_loop(TimerId::SpawnPipes, self.config.spawn_interval());
        self.physics.resume();
        self.runs += 1;
        info!("run {} started", self.runs);
    }

    fn spawn_pipes(&mut self) {
        let (lo, hi) = self.config.gap_range();
        let gap_top = self.rng.gen_range(lo..=hi) as f32;
        let x = self.config.width;

        let top = Pipe::new(x, gap_top, &self.config, (0.0, 1.0));
        let bottom = Pipe::new(x, gap_top + self.config.gap_height, &self.config, (0.0, 0.0));
        debug!("spawned pipes with gap at {gap_top}");
        self.pipes.push(PipePair { top, bottom });
    }

    fn flap(&mut self, ctx: &mut Context) {
        if self.state != State::Running {
            return;
        }
        self.player.body.vy = self.config.flap_velocity;
        ctx.play(Cue::Jump);
    }

    fn game_over(&mut self, ctx: &mut Context) {
        if self.state == State::GameOver {
            return;
        }
        self.state = State::GameOver;
        ctx.play(Cue::GameOver);
        self.physics.pause();
        ctx.timers.remove(TimerId::SpawnPipes);
        self.player.hit = true;

        let points = self.score.points();
        info!("run {} over with score {}", self.runs, self.score.value());
        if points > self.high_score {
            self.high_score = points;
            info!("new high score {points}");
            if let Err(e) = storage::save_high_score(&mut self.store, points) {
                warn!("could not persist high score: {e}");
            }
        }

        ctx.timers
            .add_once(TimerId::Restart, self.config.restart_delay());
    }
}

impl<K: KeyValueStore, R: Rng> Scene for GameSession<K, R> {
    fn init(&mut self, ctx: &mut Context) {
        self.initialize(ctx);
    }

    fn on_input(&mut self, input: Input, ctx: &mut Context) {
        match input {
            Input::Flap => self.flap(ctx),
        }
    }

    fn on_timer(&mut self, id: TimerId, ctx: &mut Context) {
        match id {
            TimerId::SpawnPipes if self.state == State::Running => self.spawn_pipes(),
            TimerId::SpawnPipes => {}
            TimerId::Restart => self.initialize(ctx),
        }
    }

    fn step_physics(&mut self, dt: f32) -> bool {
        if self.physics.paused {
            return false;
        }
        self.physics.step(&mut self.player.body, dt);
        for pair in &mut self.pipes {
            self.physics.step(&mut pair.top.body, dt);
            self.physics.step(&mut pair.bottom.body, dt);
        }

        let bird = self.player.body.bounds();
        self.pipes.iter().any(|pair| {
            bird.overlaps(&pair.top.body.bounds()) || bird.overlaps(&pair.bottom.body.bounds())
        })
    }

    fn on_collision(&mut self, ctx: &mut Context) {
        self.game_over(ctx);
    }

    fn on_tick(&mut self, _dt: f32, ctx: &mut Context) {
        if self.state != State::Running {
            return;
        }

        self.player.angle = (self.player.body.vy / self.config.tilt_divisor).min(self.config.max_tilt);

        self.pipes.retain(|pair| !pair.off_screen());

        let bird_x = self.player.body.x;
        for pair in &mut self.pipes {
            for pipe in [&mut pair.top, &mut pair.bottom] {
                if pipe.scored || pipe.body.bounds().right >= bird_x {
                    continue;
                }
                pipe.scored = true;
                self.score.add_half();
                if self.score.is_whole() {
                    ctx.play(Cue::Score);
                    self.displayed_score = self.score.points();
                }
            }
        }

        let y = self.player.body.y;
        if y < 0.0 || y > self.config.height {
            debug!("player left the viewport at y={y}");
            self.game_over(ctx);
        }
    }
}
