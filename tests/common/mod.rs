use asphalt_sim::{InputState, Session, SessionConfig, TickReport};

/// Nominal frame length used to timestamp scripted ticks
pub const FRAME_MS: f64 = 1000.0 / 60.0;

pub const IDLE: InputState = InputState::DEFAULT;

pub const ACCELERATE: InputState = InputState {
    accelerate: true,
    ..InputState::DEFAULT
};

pub const TURBO: InputState = InputState {
    accelerate: true,
    boost_modifier: true,
    ..InputState::DEFAULT
};

pub const NITRO: InputState = InputState {
    accelerate: true,
    nitro: true,
    ..InputState::DEFAULT
};

pub const BRAKE: InputState = InputState {
    brake: true,
    ..InputState::DEFAULT
};

pub const REVERSE: InputState = InputState {
    reverse: true,
    ..InputState::DEFAULT
};

/// Scripted list of controls, one entry per tick
#[derive(Clone, Debug, Default)]
pub struct ControlSeq {
    controls: Vec<InputState>,
}

impl ControlSeq {
    pub const fn new() -> Self {
        Self {
            controls: Vec::new(),
        }
    }

    pub fn add(mut self, controls: InputState, duration: u64) -> Self {
        assert!(duration > 0);
        for _ in 0..duration {
            self.controls.push(controls);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    /// Holds the last entry once the script runs out
    pub fn get_controls_at_tick(&self, tick: usize) -> InputState {
        self.controls
            .get(tick)
            .or_else(|| self.controls.last())
            .copied()
            .unwrap_or_default()
    }

    /// Runs the whole script, calling `check` after every tick
    pub fn run(&self, session: &mut Session, mut check: impl FnMut(&Session, &TickReport)) {
        for tick in 0..self.len() {
            session.set_controls(self.get_controls_at_tick(tick));
            let report = session.step(tick as f64 * FRAME_MS);
            check(session, &report);
        }
    }
}

pub fn seeded_session() -> Session {
    Session::new(SessionConfig {
        rng_seed: Some(42),
        ..SessionConfig::DEFAULT
    })
    .unwrap()
}
