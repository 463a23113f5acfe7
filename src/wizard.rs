//! Client-side selection wizard: mood, then gender, then results.
//!
//! Every generation carries a token taken from `epoch`. `reset` advances the
//! epoch, so a request that completes after a reset finds its token out of
//! date and its result is dropped instead of overwriting the fresh state.

use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};
use tracing::{debug, error, info, warn};

use crate::{
    client::OutfitService,
    models::{Gender, Mood, Outfit},
};

pub const MOOD_TRANSITION_DELAY: Duration = Duration::from_millis(300);

const SUCCESS_MESSAGE: &str = "Your outfit ideas are ready!";
const FAILURE_MESSAGE: &str = "Failed to generate outfits. Please try again.";
const MISSING_SELECTION_MESSAGE: &str = "Please select both gender and mood";
const BUSY_MESSAGE: &str = "Outfits are already being generated";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    Mood,
    Gender,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// The last user-facing message, shown as a transient toast by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn success(message: &str) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    fn error(message: &str) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WizardState {
    pub step: WizardStep,
    pub mood: Option<Mood>,
    pub gender: Option<Gender>,
    pub outfits: Vec<Outfit>,
    pub loading: bool,
    pub notice: Option<Notice>,
}

/// How a call to [`Wizard::generate`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    Completed,
    Failed,
    /// A reset happened while the request was in flight; its result was dropped.
    Stale,
    /// Nothing was sent: another generation was running, or the selection
    /// was not accepted on the current step.
    Rejected,
}

struct Inner {
    state: WizardState,
    epoch: u64,
}

impl Inner {
    fn begin_generation(&mut self, gender: Gender, mood: Mood) -> Option<u64> {
        if self.state.loading {
            warn!("Generation already in flight, ignoring request");
            self.state.notice = Some(Notice::error(BUSY_MESSAGE));
            return None;
        }
        self.epoch += 1;
        self.state.mood = Some(mood);
        self.state.gender = Some(gender);
        self.state.step = WizardStep::Results;
        self.state.loading = true;
        self.state.outfits.clear();
        self.state.notice = None;
        Some(self.epoch)
    }
}

pub struct Wizard {
    service: Arc<dyn OutfitService>,
    inner: Mutex<Inner>,
    transition_delay: Duration,
}

impl Wizard {
    pub fn new(service: Arc<dyn OutfitService>) -> Self {
        Self {
            service,
            inner: Mutex::new(Inner { state: WizardState::default(), epoch: 0 }),
            transition_delay: MOOD_TRANSITION_DELAY,
        }
    }

    pub fn with_transition_delay(mut self, delay: Duration) -> Self {
        self.transition_delay = delay;
        self
    }

    pub fn snapshot(&self) -> WizardState {
        self.inner.lock().state.clone()
    }

    /// Records the mood and moves on to the gender step once the UX delay has
    /// passed, unless the wizard was reset or moved on in the meantime.
    ///
    /// Only accepted on the mood step with nothing in flight; returns whether
    /// the mood was taken. Changing the mood later needs a `reset`.
    pub async fn select_mood(&self, mood: Mood) -> bool {
        let epoch = {
            let mut inner = self.inner.lock();
            if inner.state.step != WizardStep::Mood || inner.state.loading {
                debug!("Ignoring mood {} on step {:?}", mood, inner.state.step);
                return false;
            }
            inner.state.mood = Some(mood);
            inner.epoch
        };
        debug!("Mood selected: {}", mood);

        tokio::time::sleep(self.transition_delay).await;

        let mut inner = self.inner.lock();
        if inner.epoch == epoch && inner.state.step == WizardStep::Mood {
            inner.state.step = WizardStep::Gender;
        }
        true
    }

    /// Records the gender, jumps to the results step and generates with the
    /// current mood. Only accepted on the gender step.
    pub async fn select_gender(&self, gender: Gender) -> GenerationOutcome {
        let (token, mood) = {
            let mut inner = self.inner.lock();
            let Some(mood) = inner.state.mood else {
                inner.state.notice = Some(Notice::error(MISSING_SELECTION_MESSAGE));
                return GenerationOutcome::Rejected;
            };
            if inner.state.step != WizardStep::Gender {
                debug!("Ignoring gender {} on step {:?}", gender, inner.state.step);
                return GenerationOutcome::Rejected;
            }
            let Some(token) = inner.begin_generation(gender, mood) else {
                return GenerationOutcome::Rejected;
            };
            (token, mood)
        };
        self.run_generation(token, gender, mood).await
    }

    /// Requests outfits for the given selection and records it as the current
    /// one. The selection is passed in rather than read from state so a
    /// re-selection mid-flight cannot change what is being generated.
    pub async fn generate(&self, gender: Gender, mood: Mood) -> GenerationOutcome {
        let Some(token) = self.inner.lock().begin_generation(gender, mood) else {
            return GenerationOutcome::Rejected;
        };
        self.run_generation(token, gender, mood).await
    }

    async fn run_generation(
        &self,
        token: u64,
        gender: Gender,
        mood: Mood,
    ) -> GenerationOutcome {
        info!("Generating outfits for {} / {}", gender, mood);
        let result = self.service.generate(gender, mood).await;

        let mut inner = self.inner.lock();
        if inner.epoch != token {
            debug!(
                "Dropping stale generation result (token {}, current {})",
                token, inner.epoch
            );
            return GenerationOutcome::Stale;
        }

        inner.state.loading = false;
        match result {
            Ok(outfits) => {
                info!("✅ Received {} outfits", outfits.len());
                inner.state.outfits = outfits;
                inner.state.notice = Some(Notice::success(SUCCESS_MESSAGE));
                GenerationOutcome::Completed
            }
            Err(e) => {
                error!("Error generating outfits: {}", e);
                inner.state.step = WizardStep::Gender;
                inner.state.notice = Some(Notice::error(FAILURE_MESSAGE));
                GenerationOutcome::Failed
            }
        }
    }

    /// Clears every selection and result and returns to the mood step.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.epoch += 1;
        inner.state = WizardState::default();
    }
}
