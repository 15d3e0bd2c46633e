/// Session orchestrator.
///
/// `Game` owns the world state, the RNG and the outside collaborators. The
/// frame scheduler calls `advance` once per display refresh; everything the
/// pure core reports through `GameState::events` is forwarded here to the
/// audio notifier and the score store. Collaborator failures are logged and
/// otherwise ignored.

use rand::Rng;
use tracing::{info, warn};

use crate::compute::{init_state, next_level, return_to_menu, start_game, tick, toggle_pause};
use crate::entities::{GameEvent, GameState, GameStatus, Intent};
use crate::store::ScoreStore;

/// Discrete, edge-triggered input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Start, restart, or continue to the next level depending on status.
    Confirm,
    /// Toggle pause while a level is running.
    Pause,
    /// Leave to the title screen.
    Menu,
}

/// Input sampled once per frame.
#[derive(Clone, Debug, Default)]
pub struct InputFrame {
    pub intent: Intent,
    pub actions: Vec<Action>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Collect,
    Hit,
    LevelComplete,
    GameOver,
}

/// Fire-and-forget sound output.
pub trait AudioNotifier {
    fn notify(&mut self, cue: SoundCue);
}

/// Audio sink that discards every cue.
#[derive(Debug, Default)]
pub struct Silent;

impl AudioNotifier for Silent {
    fn notify(&mut self, _cue: SoundCue) {}
}

pub struct Game<R, S, A> {
    state: GameState,
    rng: R,
    store: S,
    audio: A,
}

impl<R: Rng, S: ScoreStore, A: AudioNotifier> Game<R, S, A> {
    /// Read the persisted best score (absent or unreadable counts as zero)
    /// and sit on the title screen.
    pub fn new(mut rng: R, store: S, audio: A) -> Self {
        let best = store.load_best().unwrap_or_else(|err| {
            warn!(%err, "could not read best score");
            0
        });
        let state = init_state(best, &mut rng);
        Self { state, rng, store, audio }
    }

    /// Read-only snapshot for rendering.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[doc(hidden)]
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle this frame's actions, then run one simulation step.
    /// Events raised during the call stay readable on the state afterwards.
    pub fn advance(&mut self, input: &InputFrame, dt_ms: f32) {
        self.state.events.clear();
        let mut raised = Vec::new();
        for &action in &input.actions {
            self.apply_action(action);
            raised.append(&mut self.state.events);
        }
        self.state = tick(&self.state, &input.intent, dt_ms, &mut self.rng);
        self.dispatch_events();
        raised.append(&mut self.state.events);
        self.state.events = raised;
    }

    pub fn apply_action(&mut self, action: Action) {
        let status = self.state.status;
        self.state = match (action, status) {
            (Action::Confirm, GameStatus::Start | GameStatus::GameOver) => {
                start_game(&self.state, &mut self.rng)
            }
            (Action::Confirm, GameStatus::LevelComplete) => next_level(&self.state, &mut self.rng),
            (Action::Pause, GameStatus::Playing | GameStatus::Paused) => toggle_pause(&self.state),
            (
                Action::Menu,
                GameStatus::Paused | GameStatus::GameOver | GameStatus::LevelComplete,
            ) => return_to_menu(&self.state, &mut self.rng),
            _ => return,
        };
        if self.state.status != status {
            info!(from = ?status, to = ?self.state.status, "status changed");
        }
        self.dispatch_events();
    }

    fn dispatch_events(&mut self) {
        for event in std::mem::take(&mut self.state.events) {
            let cue = match event {
                GameEvent::Collected(_) => Some(SoundCue::Collect),
                GameEvent::Hit => Some(SoundCue::Hit),
                GameEvent::LevelComplete(_) => Some(SoundCue::LevelComplete),
                GameEvent::GameOver { score, new_best } => {
                    if new_best {
                        if let Err(err) = self.store.save_best(score) {
                            warn!(%err, score, "could not persist best score");
                        }
                    }
                    Some(SoundCue::GameOver)
                }
                GameEvent::LevelLoaded(_) | GameEvent::Victory => None,
            };
            if let Some(cue) = cue {
                self.audio.notify(cue);
            }
            self.state.events.push(event);
        }
    }
}
