use std::sync::Arc;

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

use crate::config::Config;
use crate::history::{AttemptRecord, AttemptStore};
use crate::quiz::{Catalog, Quiz, OPTION_COUNT};
use crate::results::ResultAction;
use crate::session::{Phase, QuizSession, SessionAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Course,
    Quiz,
    Results,
}

/// A quiz on the course screen with its recorded progress.
#[derive(Debug, Clone)]
pub struct CourseEntry {
    pub quiz: Arc<Quiz>,
    pub attempts: usize,
    pub best_percent: Option<u8>,
}

/// Top-level application state: course screen, the live session and the
/// results screen. Owns the session; dropping it tears the session down.
#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub state: AppState,
    pub course: Vec<CourseEntry>,
    pub selected: usize,
    pub session: Option<QuizSession>,
    /// Best score on record before the attempt being shown in results.
    pub previous_best: Option<u8>,
    pub notice: Option<String>,
    history: Option<AttemptStore>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, catalog: Catalog, history: Option<AttemptStore>) -> Self {
        let course = catalog
            .quizzes()
            .iter()
            .map(|quiz| CourseEntry {
                quiz: Arc::new(quiz.clone()),
                attempts: 0,
                best_percent: None,
            })
            .collect();

        let mut app = Self {
            config,
            state: AppState::Course,
            course,
            selected: 0,
            session: None,
            previous_best: None,
            notice: None,
            history,
            should_quit: false,
        };
        app.refresh_progress();
        app
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn history(&self) -> Option<&AttemptStore> {
        self.history.as_ref()
    }

    pub fn selected_entry(&self) -> Option<&CourseEntry> {
        self.course.get(self.selected)
    }

    /// Select the course entry for `quiz_id` and start it.
    pub fn start_quiz_by_id(&mut self, quiz_id: &str) -> bool {
        match self.course.iter().position(|e| e.quiz.id == quiz_id) {
            Some(idx) => {
                self.selected = idx;
                self.start_selected()
            }
            None => false,
        }
    }

    pub fn start_selected(&mut self) -> bool {
        let Some(entry) = self.course.get(self.selected) else {
            return false;
        };
        let quiz = Arc::clone(&entry.quiz);
        let best = entry.best_percent;
        match QuizSession::new(quiz) {
            Ok(session) => {
                self.previous_best = best;
                self.mount(session);
                true
            }
            Err(e) => {
                warn!(error = %e, "quiz unavailable");
                self.notice = Some(format!("quiz unavailable: {e}"));
                false
            }
        }
    }

    fn mount(&mut self, session: QuizSession) {
        if let Some(old) = self.session.replace(session) {
            old.abandon();
        }
        self.notice = None;
        self.state = AppState::Quiz;
    }

    /// Leave the running quiz without recording it.
    pub fn abandon_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.abandon();
        }
        self.state = AppState::Course;
    }

    pub fn apply_result_action(&mut self, action: ResultAction) {
        match action {
            ResultAction::Reattempt => {
                let Some(fresh) = self.session.as_ref().map(QuizSession::reattempt) else {
                    return;
                };
                self.previous_best = self.best_for(&fresh.quiz().id);
                self.mount(fresh);
            }
            ResultAction::GoToCourse => {
                self.session = None;
                self.state = AppState::Course;
            }
        }
    }

    /// Apply a session action and settle any resulting completion.
    pub fn dispatch(&mut self, action: SessionAction) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let changed = session.apply(action);
        if changed {
            self.settle();
        }
        changed
    }

    pub fn on_tick(&mut self) -> bool {
        if self.state != AppState::Quiz {
            return false;
        }
        self.dispatch(SessionAction::Tick)
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        match self.state {
            AppState::Course => self.on_course_key(key),
            AppState::Quiz => {
                let Some(phase) = self.session.as_ref().map(QuizSession::phase) else {
                    self.state = AppState::Course;
                    return;
                };
                if phase == Phase::Running && key.code == KeyCode::Esc {
                    self.abandon_session();
                    return;
                }
                if let Some(action) = session_action(phase, key) {
                    self.dispatch(action);
                }
            }
            AppState::Results => match key.code {
                KeyCode::Char('r') => self.apply_result_action(ResultAction::Reattempt),
                KeyCode::Char('c') | KeyCode::Enter => self.apply_result_action(ResultAction::GoToCourse),
                KeyCode::Char('q') | KeyCode::Esc => self.quit(),
                _ => {}
            },
        }
    }

    fn on_course_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.course.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.start_selected();
            }
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            _ => {}
        }
    }

    /// Move to results once the session completes, recording the attempt.
    fn settle(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if self.state != AppState::Quiz || !session.is_completed() {
            return;
        }
        let Some(result) = session.result() else {
            return;
        };

        if let Some(store) = self.history.as_ref() {
            let record = AttemptRecord::new(session.quiz(), result, Local::now());
            if let Err(e) = store.record(&record) {
                warn!(error = %e, "could not record attempt");
            }
        }
        info!(quiz = %session.quiz().id, percent = result.percent, "showing results");

        self.state = AppState::Results;
        self.refresh_progress();
    }

    pub fn refresh_progress(&mut self) {
        let Some(store) = self.history.as_ref() else {
            return;
        };
        let progress = match store.progress() {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "could not read attempt history");
                return;
            }
        };
        for entry in &mut self.course {
            let found = progress.iter().find(|p| p.quiz_id == entry.quiz.id);
            entry.attempts = found.map_or(0, |p| p.attempts);
            entry.best_percent = found.map(|p| p.best_percent);
        }
    }

    fn best_for(&self, quiz_id: &str) -> Option<u8> {
        self.course
            .iter()
            .find(|e| e.quiz.id == quiz_id)
            .and_then(|e| e.best_percent)
    }
}

/// Key bindings per phase. Options are `1-4` or `a-d`.
pub fn session_action(phase: Phase, key: KeyEvent) -> Option<SessionAction> {
    match phase {
        Phase::Running => match key.code {
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                (idx < OPTION_COUNT).then_some(SessionAction::Select(idx))
            }
            KeyCode::Char(c @ 'a'..='d') => Some(SessionAction::Select(c as usize - 'a' as usize)),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => Some(SessionAction::Previous),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') => Some(SessionAction::Next),
            KeyCode::Home => Some(SessionAction::GoTo(0)),
            KeyCode::Char('s') => Some(SessionAction::Submit),
            _ => None,
        },
        Phase::ConfirmingSubmit => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => Some(SessionAction::Confirm),
            KeyCode::Char('n') | KeyCode::Esc => Some(SessionAction::Cancel),
            _ => None,
        },
        Phase::TimeExpired => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Esc => Some(SessionAction::Acknowledge),
            _ => None,
        },
        Phase::Completed => None,
    }
}
