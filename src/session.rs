use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{AnswerError, QuizError};
use crate::ledger::{AnswerLedger, Recorded};
use crate::quiz::{Question, Quiz};
use crate::results::{Ending, QuizResult};
use crate::scoring::{self, Outcome, Score};
use crate::timer::{Countdown, TimerSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    #[strum(to_string = "running")]
    Running,
    #[strum(to_string = "confirming_submit")]
    ConfirmingSubmit,
    #[strum(to_string = "time_expired")]
    TimeExpired,
    #[strum(to_string = "completed")]
    Completed,
}

/// What a `record_answer` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStatus {
    Recorded,
    /// The question already had an answer.
    Locked,
    /// The session was not running.
    Ignored,
}

/// Inputs the session understands, from the keyboard or the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Select(usize),
    Next,
    Previous,
    GoTo(usize),
    Submit,
    Confirm,
    Cancel,
    Acknowledge,
    Tick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SessionState {
    current_index: usize,
    phase: Phase,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            current_index: 0,
            phase: Phase::Running,
        }
    }
}

/// One attempt at a quiz: ledger, question pointer, countdown and phase.
///
/// Every transition checks its source phase first and is ignored otherwise,
/// so a timer expiry racing a submit resolves to whichever is applied first.
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Arc<Quiz>,
    ledger: AnswerLedger,
    state: SessionState,
    timer: Option<Countdown>,
    result: Option<QuizResult>,
}

impl QuizSession {
    pub fn new(quiz: Arc<Quiz>) -> Result<Self, QuizError> {
        quiz.validate()?;
        Ok(Self::fresh(quiz))
    }

    fn fresh(quiz: Arc<Quiz>) -> Self {
        info!(quiz = %quiz.id, questions = quiz.len(), "session started");
        Self {
            ledger: AnswerLedger::new(quiz.len()),
            state: SessionState::default(),
            timer: Countdown::from_minutes(quiz.time_limit_minutes),
            result: None,
            quiz,
        }
    }

    /// A brand-new session for the same quiz.
    pub fn reattempt(&self) -> Self {
        Self::fresh(Arc::clone(&self.quiz))
    }

    /// Tear the session down without recording anything. The countdown
    /// goes with it; this only logs the teardown.
    pub fn abandon(self) {
        info!(quiz = %self.quiz.id, phase = %self.state.phase, "session abandoned");
    }

    pub fn apply(&mut self, action: SessionAction) -> bool {
        match action {
            SessionAction::Select(option) => match self.select_option(option) {
                Ok(status) => status == AnswerStatus::Recorded,
                Err(e) => {
                    debug!(option, error = %e, "answer rejected");
                    false
                }
            },
            SessionAction::Next => self.next(),
            SessionAction::Previous => self.previous(),
            SessionAction::GoTo(idx) => self.go_to(idx),
            SessionAction::Submit => self.request_submit(),
            SessionAction::Confirm => self.confirm_submit(),
            SessionAction::Cancel => self.cancel_submit(),
            SessionAction::Acknowledge => self.acknowledge_expiry(),
            SessionAction::Tick => self.on_tick(),
        }
    }

    pub fn record_answer(&mut self, question: usize, option: usize) -> Result<AnswerStatus, AnswerError> {
        if self.state.phase != Phase::Running {
            debug!(question, option, phase = %self.state.phase, "answer ignored");
            return Ok(AnswerStatus::Ignored);
        }

        match self.ledger.record_answer(question, option)? {
            Recorded::Stored => {
                debug!(question, option, "answer recorded");
                Ok(AnswerStatus::Recorded)
            }
            Recorded::Locked => Ok(AnswerStatus::Locked),
        }
    }

    /// Answer the question currently shown.
    pub fn select_option(&mut self, option: usize) -> Result<AnswerStatus, AnswerError> {
        self.record_answer(self.state.current_index, option)
    }

    pub fn next(&mut self) -> bool {
        let idx = self.state.current_index + 1;
        self.go_to(idx)
    }

    pub fn previous(&mut self) -> bool {
        match self.state.current_index.checked_sub(1) {
            Some(idx) => self.go_to(idx),
            None => false,
        }
    }

    pub fn go_to(&mut self, idx: usize) -> bool {
        if self.state.phase != Phase::Running || idx >= self.quiz.len() {
            return false;
        }
        self.state.current_index = idx;
        true
    }

    pub fn request_submit(&mut self) -> bool {
        self.transition(Phase::Running, Phase::ConfirmingSubmit)
    }

    pub fn cancel_submit(&mut self) -> bool {
        self.transition(Phase::ConfirmingSubmit, Phase::Running)
    }

    pub fn confirm_submit(&mut self) -> bool {
        if !self.transition(Phase::ConfirmingSubmit, Phase::Completed) {
            return false;
        }
        self.freeze(Ending::Submitted);
        true
    }

    pub fn acknowledge_expiry(&mut self) -> bool {
        if !self.transition(Phase::TimeExpired, Phase::Completed) {
            return false;
        }
        self.freeze(Ending::TimeExpired);
        true
    }

    /// Advance the countdown by one second. Returns true on the tick that
    /// moves the session into `TimeExpired`.
    pub fn on_tick(&mut self) -> bool {
        if self.state.phase != Phase::Running {
            return false;
        }
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };

        match timer.tick() {
            TimerSignal::Expired => self.transition(Phase::Running, Phase::TimeExpired),
            TimerSignal::Ticking(_) | TimerSignal::Stopped => false,
        }
    }

    fn transition(&mut self, from: Phase, to: Phase) -> bool {
        if self.state.phase != from {
            debug!(%from, %to, phase = %self.state.phase, "transition ignored");
            return false;
        }
        debug!(%from, %to, "phase change");
        self.state.phase = to;
        true
    }

    fn freeze(&mut self, ending: Ending) {
        if let Some(timer) = self.timer.as_mut() {
            timer.stop();
        }
        let result = QuizResult::from_score(self.score(), ending);
        info!(
            quiz = %self.quiz.id,
            correct = result.correct,
            total = result.total,
            percent = result.percent,
            badge = %result.badge,
            %ending,
            "session completed"
        );
        self.result = Some(result);
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.quiz.questions[self.state.current_index]
    }

    pub fn current_outcome(&self) -> Outcome {
        self.outcome(self.state.current_index)
    }

    pub fn outcome(&self, question: usize) -> Outcome {
        scoring::outcome(&self.ledger, &self.quiz, question)
    }

    pub fn remaining_secs(&self) -> Option<u64> {
        self.timer.as_ref().map(Countdown::remaining_secs)
    }

    /// Live score, recomputed from the ledger.
    pub fn score(&self) -> Score {
        scoring::score(&self.ledger, &self.quiz)
    }

    /// The frozen result, once completed.
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.state.phase == Phase::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::sample_quiz;
    use crate::results::Badge;
    use assert_matches::assert_matches;

    fn session(key: &[usize], minutes: Option<u32>) -> QuizSession {
        QuizSession::new(Arc::new(sample_quiz(key, minutes))).unwrap()
    }

    #[test]
    fn starts_running_on_first_question() {
        let s = session(&[0, 1], Some(1));
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.remaining_secs(), Some(60));
        assert!(s.result().is_none());
    }

    #[test]
    fn rejects_invalid_quiz() {
        let mut quiz = sample_quiz(&[0], None);
        quiz.questions.clear();
        assert_matches!(QuizSession::new(Arc::new(quiz)), Err(QuizError::NoQuestions));
    }

    #[test]
    fn submit_confirm_path() {
        let mut s = session(&[0, 1], None);
        s.select_option(0).unwrap();

        assert!(s.request_submit());
        assert_eq!(s.phase(), Phase::ConfirmingSubmit);
        assert!(s.confirm_submit());
        assert_eq!(s.phase(), Phase::Completed);

        let result = s.result().unwrap();
        assert_eq!(result.correct, 1);
        assert_eq!(result.unanswered, 1);
        assert_eq!(result.percent, 50);
        assert_eq!(result.badge, Badge::RisingStar);
        assert_eq!(result.ending, Ending::Submitted);
    }

    #[test]
    fn cancel_returns_to_running_untouched() {
        let mut s = session(&[0, 1, 2], None);
        s.select_option(1).unwrap();
        s.next();
        let ledger_before = s.ledger().clone();

        assert!(s.request_submit());
        assert!(s.cancel_submit());

        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.current_index(), 1);
        assert_eq!(s.ledger(), &ledger_before);
    }

    #[test]
    fn transitions_from_wrong_phase_are_ignored() {
        let mut s = session(&[0], Some(1));
        assert!(!s.confirm_submit());
        assert!(!s.cancel_submit());
        assert!(!s.acknowledge_expiry());
        assert_eq!(s.phase(), Phase::Running);

        s.request_submit();
        assert!(!s.request_submit());
        assert!(!s.acknowledge_expiry());
        assert_eq!(s.phase(), Phase::ConfirmingSubmit);
    }

    #[test]
    fn timer_pauses_outside_running() {
        let mut s = session(&[0], Some(1));
        s.on_tick();
        assert_eq!(s.remaining_secs(), Some(59));

        s.request_submit();
        for _ in 0..120 {
            assert!(!s.on_tick());
        }
        assert_eq!(s.remaining_secs(), Some(59));
        assert_eq!(s.phase(), Phase::ConfirmingSubmit);
    }

    #[test]
    fn expiry_fires_once_and_blocks_submit() {
        let mut s = session(&[0], Some(1));
        let fired: usize = (0..60).filter(|_| s.on_tick()).count();
        assert_eq!(fired, 1);
        assert_eq!(s.phase(), Phase::TimeExpired);
        assert_eq!(s.remaining_secs(), Some(0));

        assert!(!s.on_tick());
        assert!(!s.request_submit());
        assert_eq!(s.select_option(0), Ok(AnswerStatus::Ignored));

        assert!(s.acknowledge_expiry());
        assert_eq!(s.result().unwrap().ending, Ending::TimeExpired);
    }

    #[test]
    fn untimed_session_never_expires() {
        let mut s = session(&[0], None);
        for _ in 0..1000 {
            assert!(!s.on_tick());
        }
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.remaining_secs(), None);
    }

    #[test]
    fn navigation_is_free_and_bounded() {
        let mut s = session(&[0, 1, 2], None);
        assert!(!s.previous());
        assert!(s.go_to(2));
        assert!(!s.next());
        assert_eq!(s.current_index(), 2);
        assert!(s.previous());
        assert!(s.go_to(0));
        assert!(!s.go_to(3));
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn navigation_blocked_while_confirming() {
        let mut s = session(&[0, 1], None);
        s.request_submit();
        assert!(!s.next());
        assert!(!s.go_to(1));
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn answers_after_completion_do_not_change_result() {
        let mut s = session(&[0, 1], None);
        s.select_option(0).unwrap();
        s.request_submit();
        s.confirm_submit();
        let frozen = *s.result().unwrap();

        assert_eq!(s.record_answer(1, 1), Ok(AnswerStatus::Ignored));
        assert_eq!(s.result(), Some(&frozen));
        assert!(!s.ledger().is_answered(1));
    }

    #[test]
    fn locked_answer_reported() {
        let mut s = session(&[0], None);
        assert_eq!(s.select_option(2), Ok(AnswerStatus::Recorded));
        assert_eq!(s.select_option(0), Ok(AnswerStatus::Locked));
        assert_eq!(s.current_outcome(), Outcome::Incorrect);
    }

    #[test]
    fn out_of_range_answer_is_an_error() {
        let mut s = session(&[0], None);
        assert_eq!(
            s.record_answer(5, 0),
            Err(AnswerError::QuestionOutOfRange { index: 5, len: 1 })
        );
        assert_matches!(s.select_option(9), Err(AnswerError::OptionOutOfRange { .. }));
    }

    #[test]
    fn reattempt_starts_from_scratch() {
        let mut s = session(&[0, 1], Some(2));
        s.select_option(0).unwrap();
        s.on_tick();
        s.request_submit();
        s.confirm_submit();

        let again = s.reattempt();
        assert_eq!(again.phase(), Phase::Running);
        assert_eq!(again.ledger().answered_count(), 0);
        assert_eq!(again.remaining_secs(), Some(120));
        assert!(again.result().is_none());
        assert_eq!(again.quiz(), s.quiz());
    }

    #[test]
    fn apply_drives_the_machine() {
        let mut s = session(&[3, 2], None);
        assert!(s.apply(SessionAction::Select(3)));
        assert!(s.apply(SessionAction::Next));
        assert!(s.apply(SessionAction::Select(2)));
        assert!(!s.apply(SessionAction::Select(1)));
        assert!(s.apply(SessionAction::Submit));
        assert!(s.apply(SessionAction::Confirm));
        assert_eq!(s.result().unwrap().badge, Badge::AceAchiever);
    }

    #[test]
    fn apply_reports_rejected_option_as_no_change() {
        let mut s = session(&[0, 1], None);
        assert!(!s.apply(SessionAction::Select(7)));
        assert_eq!(s.ledger().answered_count(), 0);
        assert_eq!(s.phase(), Phase::Running);
    }
}
