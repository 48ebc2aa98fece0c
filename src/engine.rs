//! Scene host.
//!
//! A `Stage` owns one `Scene` and drives it frame by frame. Within a frame the
//! order is fixed: queued input, then for each physics sub-step due timers,
//! physics, collision, update. Callbacks never interleave with each other.

use std::time::Duration;

use log::debug;

use crate::timer::{TimerId, Timers};

/// Player input delivered between frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    /// Pointer press or the flap key.
    Flap,
}

/// Sound effects requested by the scene, played by the host after the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Jump,
    Score,
    GameOver,
}

/// What a scene may touch outside itself during a callback.
#[derive(Debug, Default)]
pub struct Context {
    pub timers: Timers,
    cues: Vec<Cue>,
}

impl Context {
    pub fn play(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}

pub trait Scene {
    fn init(&mut self, ctx: &mut Context);
    fn on_input(&mut self, input: Input, ctx: &mut Context);
    fn on_timer(&mut self, id: TimerId, ctx: &mut Context);
    /// Integrates all bodies over `dt`. Returns true when the player overlaps
    /// an obstacle afterwards.
    fn step_physics(&mut self, dt: f32) -> bool;
    fn on_collision(&mut self, ctx: &mut Context);
    fn on_tick(&mut self, dt: f32, ctx: &mut Context);
}

/// Longest single integration step. Pipes move 3.2px and a falling bird well
/// under its own height per step, so nothing tunnels through a pipe.
pub const MAX_STEP: Duration = Duration::from_millis(16);

/// Longer frames (a stall, a suspended process) are cut to this.
pub const MAX_FRAME: Duration = Duration::from_millis(250);

pub struct Stage<S: Scene> {
    scene: S,
    ctx: Context,
}

impl<S: Scene> Stage<S> {
    pub fn new(mut scene: S) -> Self {
        let mut ctx = Context::default();
        scene.init(&mut ctx);
        Self { scene, ctx }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Runs one frame and returns the cues it produced.
    ///
    /// `dt` is capped at [`MAX_FRAME`] and split into steps of at most
    /// [`MAX_STEP`]; timers, physics, collision and update run once per step.
    /// A zero `dt` still runs one step.
    pub fn frame<I>(&mut self, dt: Duration, inputs: I) -> Vec<Cue>
    where
        I: IntoIterator<Item = Input>,
    {
        for input in inputs {
            self.scene.on_input(input, &mut self.ctx);
        }

        if dt > MAX_FRAME {
            debug!("frame of {dt:?} cut to {MAX_FRAME:?}");
        }
        let mut left = dt.min(MAX_FRAME);
        loop {
            let step = left.min(MAX_STEP);
            self.step(step);
            left -= step;
            if left.is_zero() {
                break;
            }
        }

        self.ctx.drain_cues()
    }

    fn step(&mut self, dt: Duration) {
        for id in self.ctx.timers.advance(dt) {
            debug!("timer {id:?} fired");
            self.scene.on_timer(id, &mut self.ctx);
        }

        let secs = dt.as_secs_f32();
        if self.scene.step_physics(secs) {
            self.scene.on_collision(&mut self.ctx);
        }

        self.scene.on_tick(secs, &mut self.ctx);
    }
}
