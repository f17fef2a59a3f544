//! The session controller: one mutator for all transient state.
//!
//! Every method corresponds to a discrete user action and runs to completion
//! before the next action is accepted. Screen transitions are decided by the
//! pure functions in `devenglish_core::nav`; persistence is best-effort and
//! never blocks or fails a transition.

use std::sync::Arc;

use tracing::warn;

use devenglish_core::Clock;
use devenglish_core::model::{
    CredentialsDraft, DeclaredCategory, LevelId, Phrase, SignupDraft, UserProfile,
};
use devenglish_core::nav::{Screen, completion_screen};
use devenglish_core::progress::{LevelProgress, ResumePositions, format_percent, percent_complete};
use storage::repository::{ProfileKey, ProfileRecord, ProfileRepository};

use crate::content::PhraseSource;
use crate::error::SessionError;
use crate::outbox::SaveOutbox;

/// Transient, in-memory session state. Created on app start, destroyed on
/// app exit, never persisted directly.
///
/// Invariants: `cursor` is a valid index into `active_phrases` whenever
/// `active_level` is set and the sequence is non-empty; `profile` is present
/// on every screen past login.
#[derive(Debug, Clone)]
pub struct SessionState {
    current_screen: Screen,
    profile: Option<UserProfile>,
    active_level: Option<LevelId>,
    active_phrases: Vec<Phrase>,
    cursor: usize,
    credential_input: CredentialsDraft,
}

impl SessionState {
    fn new() -> Self {
        Self {
            current_screen: Screen::Home,
            profile: None,
            active_level: None,
            active_phrases: Vec::new(),
            cursor: 0,
            credential_input: CredentialsDraft::default(),
        }
    }

    #[must_use]
    pub fn current_screen(&self) -> Screen {
        self.current_screen
    }

    /// The signed-in user's profile; `None` before login completes.
    #[must_use]
    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    #[must_use]
    pub fn authenticated_user(&self) -> Option<&str> {
        self.profile.as_ref().map(UserProfile::username)
    }

    #[must_use]
    pub fn total_progress(&self) -> f64 {
        self.profile.as_ref().map_or(0.0, UserProfile::total_progress)
    }

    #[must_use]
    pub fn active_level(&self) -> Option<LevelId> {
        self.active_level
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn credential_input(&self) -> &CredentialsDraft {
        &self.credential_input
    }

    /// The phrase currently displayed, if a level is open.
    #[must_use]
    pub fn current_phrase(&self) -> Option<&Phrase> {
        self.active_phrases.get(self.cursor)
    }

    /// 1-based position and sequence length for the reading counter.
    #[must_use]
    pub fn reading_position(&self) -> Option<(usize, usize)> {
        if self.active_phrases.is_empty() {
            return None;
        }
        Some((self.cursor + 1, self.active_phrases.len()))
    }
}

/// Snapshot of the progress header for display layers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    pub user: String,
    pub indicator: &'static str,
    pub total: f64,
    pub total_display: String,
}

/// Orchestrates navigation, progress updates, and best-effort persistence.
pub struct SessionController {
    state: SessionState,
    profiles: Arc<dyn ProfileRepository>,
    content: Arc<dyn PhraseSource>,
    outbox: SaveOutbox,
    clock: Clock,
}

impl SessionController {
    #[must_use]
    pub fn new(profiles: Arc<dyn ProfileRepository>, content: Arc<dyn PhraseSource>) -> Self {
        Self {
            state: SessionState::new(),
            profiles,
            content,
            outbox: SaveOutbox::new(),
            clock: Clock::default_clock(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.state.current_screen
    }

    /// "Start"/"Continue" from the home screen.
    pub fn choose_start(&mut self) -> Screen {
        if self.state.current_screen == Screen::Home {
            self.state.current_screen = Screen::Login;
        }
        self.state.current_screen
    }

    /// "About" from the home screen.
    pub fn choose_about(&mut self) -> Screen {
        if self.state.current_screen == Screen::Home {
            self.state.current_screen = Screen::About;
        }
        self.state.current_screen
    }

    /// Back-navigation: a fixed lookup, not a history stack. A no-op on the
    /// home screen. Leaving the login screen discards typed credentials.
    pub fn go_back(&mut self) -> Screen {
        if let Some(target) = self.state.current_screen.back_target() {
            if self.state.current_screen == Screen::Login {
                self.state.credential_input = CredentialsDraft::default();
            }
            self.state.current_screen = target;
        }
        self.state.current_screen
    }

    /// Submit login credentials.
    ///
    /// With valid credentials, an existing complete profile hydrates the
    /// progress view and lands on level selection. A missing profile is
    /// created provisionally (seeded from whatever progress is in memory)
    /// and the flow continues to signup; a profile still marked provisional
    /// is routed back to signup to finish.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Validation` on bad input; storage is not
    /// touched in that case.
    pub async fn submit_login(&mut self, draft: CredentialsDraft) -> Result<Screen, SessionError> {
        if self.state.current_screen != Screen::Login {
            return Ok(self.state.current_screen);
        }
        self.state.credential_input = draft.clone();
        let credentials = draft.validate()?;
        let username = credentials.username().to_string();
        let now = self.clock.now();

        let key = ProfileKey::for_user(username.clone());
        let loaded = match self.profiles.load_profile(&key).await {
            Ok(record) => record,
            Err(err) => {
                // A failed read is treated as an absent profile, never as a
                // user-facing fault.
                warn!(key = %key, error = %err, "profile load failed");
                None
            }
        };
        self.state.credential_input = CredentialsDraft::default();

        match loaded {
            Some(record) => {
                let profile = record.into_profile(username, now)?;
                let provisional = profile.is_provisional();
                self.state.profile = Some(profile);
                self.state.current_screen = if provisional {
                    Screen::Signup
                } else {
                    Screen::LevelSelect
                };
            }
            None => {
                let (levels, resumes) = Self::carried_progress(self.state.profile.take());
                let profile = UserProfile::provisional(
                    username,
                    DeclaredCategory::Unset,
                    levels,
                    resumes,
                    now,
                )?;
                self.state.profile = Some(profile);
                self.persist_current().await;
                self.state.current_screen = Screen::Signup;
            }
        }
        Ok(self.state.current_screen)
    }

    /// Finalize signup with a declared category, completing the profile.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Validation` on bad input; storage is not
    /// touched in that case.
    pub async fn submit_signup(&mut self, draft: SignupDraft) -> Result<Screen, SessionError> {
        if self.state.current_screen != Screen::Signup {
            return Ok(self.state.current_screen);
        }
        let signup = draft.validate()?;
        let now = self.clock.now();
        let username = signup.credentials().username();

        // The signup form allows editing the username, so the finalized
        // profile is saved under whatever name was submitted.
        let mut profile = match self.state.profile.take() {
            Some(previous) if previous.username() == username => previous,
            previous => {
                let (levels, resumes) = Self::carried_progress(previous);
                UserProfile::provisional(username, DeclaredCategory::Unset, levels, resumes, now)?
            }
        };
        profile.finalize_signup(signup.declared_category(), now);
        self.state.profile = Some(profile);
        self.persist_current().await;
        self.state.current_screen = Screen::LevelSelect;
        Ok(self.state.current_screen)
    }

    /// Open a level: load its phrase sequence and resume from the persisted
    /// position, clamped into range in case the catalog changed length.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Content` if the phrase data cannot be loaded;
    /// navigation stays on level selection.
    pub async fn open_level(&mut self, level: LevelId) -> Result<Screen, SessionError> {
        if self.state.current_screen != Screen::LevelSelect {
            return Ok(self.state.current_screen);
        }
        let phrases = self.content.phrases(level)?;

        let resume = self
            .state
            .profile
            .as_ref()
            .map_or(0, |profile| profile.resume_positions().get(level));
        // Never trust a persisted index blindly.
        let cursor = if phrases.is_empty() {
            0
        } else {
            resume.min(phrases.len() - 1)
        };

        self.state.active_level = Some(level);
        self.state.active_phrases = phrases;
        self.state.cursor = cursor;
        self.state.current_screen = Screen::Reading;
        Ok(self.state.current_screen)
    }

    /// Advance to the next phrase, recording forward progress.
    ///
    /// Advancing past the last phrase completes the level (forced to exactly
    /// 100.0) and transitions to the level- or course-complete screen. A
    /// no-op on an empty sequence: no state change, no storage writes.
    pub async fn advance(&mut self) -> Screen {
        if self.state.current_screen != Screen::Reading || self.state.active_phrases.is_empty() {
            return self.state.current_screen;
        }
        let Some(level) = self.state.active_level else {
            return self.state.current_screen;
        };
        let now = self.clock.now();
        let length = self.state.active_phrases.len();
        let last_index = length - 1;

        if self.state.cursor < last_index {
            self.state.cursor += 1;
            let pct = percent_complete(self.state.cursor + 1, length);
            let cursor = self.state.cursor;
            if let Some(profile) = self.state.profile.as_mut() {
                profile.set_level_progress(level, pct, now);
                profile.set_resume_position(level, cursor, now);
            }
        } else {
            // Completing the level. The formula already yields 100.0 for a
            // well-formed sequence; forcing it is a defensive clamp.
            let mut next_screen = self.state.current_screen;
            if let Some(profile) = self.state.profile.as_mut() {
                profile.complete_level(level, now);
                profile.set_resume_position(level, last_index, now);
                next_screen = completion_screen(profile.level_progress());
            }
            self.state.current_screen = next_screen;
        }
        // The full profile travels as one record, so a single write captures
        // both the resume position and the recomputed progress.
        self.persist_current().await;
        self.state.current_screen
    }

    /// Step back to the previous phrase. A no-op at the first phrase.
    ///
    /// Only forward progress is durably tracked: retreating touches neither
    /// percentages nor persisted resume positions.
    pub fn retreat(&mut self) -> Screen {
        if self.state.current_screen == Screen::Reading && self.state.cursor > 0 {
            self.state.cursor -= 1;
        }
        self.state.current_screen
    }

    /// Retry any saves that failed earlier. Returns the number flushed.
    pub async fn flush_pending(&self) -> usize {
        self.outbox.drain(self.profiles.as_ref()).await
    }

    #[must_use]
    pub fn pending_saves(&self) -> usize {
        self.outbox.len()
    }

    /// Progress header snapshot for display layers.
    #[must_use]
    pub fn progress_view(&self) -> ProgressView {
        match self.state.profile.as_ref() {
            Some(profile) => ProgressView {
                user: profile.username().to_string(),
                indicator: profile.declared_category().indicator(),
                total: profile.total_progress(),
                total_display: format_percent(profile.total_progress()),
            },
            None => ProgressView {
                user: "Convidado".to_string(),
                indicator: "",
                total: 0.0,
                total_display: format_percent(0.0),
            },
        }
    }

    /// Display percentage for one level on the selection screen.
    #[must_use]
    pub fn level_percent_display(&self, level: LevelId) -> String {
        let pct = self
            .state
            .profile
            .as_ref()
            .map_or(0.0, |profile| profile.level_progress().get(level));
        format_percent(pct)
    }

    /// Progress carried over when a new profile replaces the session's
    /// current one (all zero on a fresh session).
    fn carried_progress(previous: Option<UserProfile>) -> (LevelProgress, ResumePositions) {
        match previous {
            Some(previous) => (
                previous.level_progress().clone(),
                previous.resume_positions().clone(),
            ),
            None => (LevelProgress::new(), ResumePositions::new()),
        }
    }

    /// Best-effort save of the full profile. On failure the in-memory value
    /// stays authoritative and the record is queued for retry.
    async fn persist_current(&self) {
        let Some(profile) = self.state.profile.as_ref() else {
            return;
        };
        let key = ProfileKey::for_user(profile.username());
        let record = ProfileRecord::from_profile(profile);

        self.outbox.drain(self.profiles.as_ref()).await;
        if let Err(err) = self.profiles.save_profile(&key, &record).await {
            warn!(key = %key, error = %err, "profile save failed, queued for retry");
            self.outbox.enqueue(key, record);
        }
    }
}
