use crate::ledger::AnswerLedger;
use crate::quiz::Quiz;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
    Unanswered,
}

/// Counts derived from a ledger against the answer key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
    pub total: usize,
    pub percent: u8,
}

pub fn outcome(ledger: &AnswerLedger, quiz: &Quiz, question: usize) -> Outcome {
    match (ledger.get_answer(question), quiz.question(question)) {
        (Some(answer), Some(q)) if q.is_correct(answer) => Outcome::Correct,
        (Some(_), Some(_)) => Outcome::Incorrect,
        _ => Outcome::Unanswered,
    }
}

pub fn score(ledger: &AnswerLedger, quiz: &Quiz) -> Score {
    let mut s = Score {
        total: quiz.len(),
        ..Score::default()
    };

    for idx in 0..quiz.len() {
        match outcome(ledger, quiz, idx) {
            Outcome::Correct => s.correct += 1,
            Outcome::Incorrect => s.incorrect += 1,
            Outcome::Unanswered => s.unanswered += 1,
        }
    }

    s.percent = percent(s.correct, s.total);
    s
}

/// `correct / total * 100`, rounded half up. Zero when `total` is zero.
pub fn percent(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rounded = (correct * 200 + total) / (2 * total);
    rounded.min(100) as u8
}
