use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerId {
    SpawnPipes,
    Restart,
}

#[derive(Debug)]
struct Timer {
    id: TimerId,
    /// Time left until the next fire.
    remaining: Duration,
    /// `Some` for repeating timers.
    period: Option<Duration>,
}

/// Frame-driven timers. Nothing fires on its own; `advance` reports which
/// timers came due during the elapsed delta.
#[derive(Debug, Default)]
pub struct Timers {
    timers: Vec<Timer>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_loop(&mut self, id: TimerId, period: Duration) {
        self.insert(Timer {
            id,
            remaining: period,
            period: Some(period),
        });
    }

    pub fn add_once(&mut self, id: TimerId, delay: Duration) {
        self.insert(Timer {
            id,
            remaining: delay,
            period: None,
        });
    }

    pub fn remove(&mut self, id: TimerId) {
        self.timers.retain(|t| t.id != id);
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Advances every timer by `dt` and returns the ids that fired, earliest
    /// first. A repeating timer fires once per elapsed period.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerId> {
        // (time into this delta at which it fired, id)
        let mut fired: Vec<(Duration, TimerId)> = Vec::new();

        self.timers.retain_mut(|t| {
            let mut at = Duration::ZERO;
            let mut left = dt;
            loop {
                if t.remaining > left {
                    t.remaining -= left;
                    return true;
                }
                at += t.remaining;
                left -= t.remaining;
                fired.push((at, t.id));
                match t.period {
                    // zero-length periods would spin forever
                    Some(p) if !p.is_zero() => t.remaining = p,
                    _ => return false,
                }
            }
        });

        fired.sort_by_key(|(at, _)| *at);
        fired.into_iter().map(|(_, id)| id).collect()
    }

    fn insert(&mut self, timer: Timer) {
        self.remove(timer.id);
        self.timers.push(timer);
    }
}
