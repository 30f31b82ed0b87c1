use std::collections::BTreeMap;

use crate::error::AnswerError;
use crate::quiz::OPTION_COUNT;

/// What happened to a `record_answer` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    Stored,
    /// The question already had an answer; the first one stands.
    Locked,
}

/// Write-once record of the option picked for each question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerLedger {
    question_count: usize,
    answers: BTreeMap<usize, usize>,
}

impl AnswerLedger {
    pub fn new(question_count: usize) -> Self {
        Self {
            question_count,
            answers: BTreeMap::new(),
        }
    }

    pub fn record_answer(&mut self, question: usize, option: usize) -> Result<Recorded, AnswerError> {
        if question >= self.question_count {
            return Err(AnswerError::QuestionOutOfRange {
                index: question,
                len: self.question_count,
            });
        }
        if option >= OPTION_COUNT {
            return Err(AnswerError::OptionOutOfRange {
                index: option,
                len: OPTION_COUNT,
            });
        }

        if self.answers.contains_key(&question) {
            return Ok(Recorded::Locked);
        }
        self.answers.insert(question, option);
        Ok(Recorded::Stored)
    }

    pub fn is_answered(&self, question: usize) -> bool {
        self.answers.contains_key(&question)
    }

    pub fn get_answer(&self, question: usize) -> Option<usize> {
        self.answers.get(&question).copied()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn unanswered_count(&self) -> usize {
        self.question_count - self.answers.len()
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// `(question, option)` pairs in question order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.answers.iter().map(|(&q, &o)| (q, o))
    }
}
