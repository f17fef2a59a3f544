//! The finite set of screens and the legal transitions among them.
//!
//! Back-navigation is a fixed lookup independent of history, not a stack.

use crate::progress::LevelProgress;
use crate::progress::total_percent;

/// Every screen the app can display. `Home` is the initial screen; none are
/// terminal, since all screens are reachable again via back-navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Login,
    Signup,
    LevelSelect,
    Reading,
    LevelComplete,
    CourseComplete,
    About,
}

impl Screen {
    /// Fixed back target for each screen. `Home` has none; back is a no-op
    /// there.
    #[must_use]
    pub fn back_target(self) -> Option<Screen> {
        match self {
            Screen::Home => None,
            Screen::Login | Screen::Signup | Screen::About => Some(Screen::Home),
            Screen::LevelSelect => Some(Screen::Login),
            Screen::Reading | Screen::LevelComplete | Screen::CourseComplete => {
                Some(Screen::LevelSelect)
            }
        }
    }

    /// Whether the user/progress header is shown on this screen.
    #[must_use]
    pub fn shows_progress_header(self) -> bool {
        !matches!(
            self,
            Screen::Home | Screen::Login | Screen::Signup | Screen::About
        )
    }
}

/// Screen shown after advancing past the last phrase of a level.
///
/// The whole course is complete once the aggregate reaches 100.
#[must_use]
pub fn completion_screen(levels: &LevelProgress) -> Screen {
    if total_percent(levels) >= 100.0 {
        Screen::CourseComplete
    } else {
        Screen::LevelComplete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LevelId;

    #[test]
    fn back_targets_match_transition_table() {
        assert_eq!(Screen::Home.back_target(), None);
        assert_eq!(Screen::Login.back_target(), Some(Screen::Home));
        assert_eq!(Screen::Signup.back_target(), Some(Screen::Home));
        assert_eq!(Screen::About.back_target(), Some(Screen::Home));
        assert_eq!(Screen::LevelSelect.back_target(), Some(Screen::Login));
        assert_eq!(Screen::Reading.back_target(), Some(Screen::LevelSelect));
        assert_eq!(
            Screen::LevelComplete.back_target(),
            Some(Screen::LevelSelect)
        );
        assert_eq!(
            Screen::CourseComplete.back_target(),
            Some(Screen::LevelSelect)
        );
    }

    #[test]
    fn header_hidden_on_entry_screens() {
        assert!(!Screen::Home.shows_progress_header());
        assert!(!Screen::Login.shows_progress_header());
        assert!(!Screen::Signup.shows_progress_header());
        assert!(!Screen::About.shows_progress_header());
        assert!(Screen::LevelSelect.shows_progress_header());
        assert!(Screen::Reading.shows_progress_header());
    }

    #[test]
    fn level_end_branches_on_aggregate() {
        let mut levels = LevelProgress::new();
        levels.set(LevelId::Basico, 100.0);
        assert_eq!(completion_screen(&levels), Screen::LevelComplete);

        for level in LevelId::ALL {
            levels.set(level, 100.0);
        }
        assert_eq!(completion_screen(&levels), Screen::CourseComplete);
    }
}
