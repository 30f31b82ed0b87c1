use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::QuizError;

/// Every question offers exactly this many options.
pub const OPTION_COUNT: usize = 4;

/// A quiz as delivered by the content collaborator. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}

impl Question {
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_answer_index
    }
}

impl Quiz {
    /// Parse and validate a quiz from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, QuizError> {
        let quiz: Quiz = serde_json::from_str(json)?;
        quiz.validate()?;
        Ok(quiz)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, QuizError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| QuizError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let quiz = Self::from_json(&json)?;
        debug!(path = %path.display(), id = %quiz.id, "loaded quiz");
        Ok(quiz)
    }

    /// Reject shapes the session cannot mount: no questions, wrong option
    /// count, an answer key outside the options, or a zero time limit.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.id.trim().is_empty() {
            return Err(QuizError::MissingId);
        }
        if self.title.trim().is_empty() {
            return Err(QuizError::MissingTitle);
        }
        if self.questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        if self.time_limit_minutes == Some(0) {
            return Err(QuizError::ZeroTimeLimit);
        }

        for (idx, question) in self.questions.iter().enumerate() {
            if question.options.len() != OPTION_COUNT {
                return Err(QuizError::OptionCount {
                    question: idx,
                    found: question.options.len(),
                    expected: OPTION_COUNT,
                });
            }
            if question.correct_answer_index >= question.options.len() {
                return Err(QuizError::AnswerOutOfRange {
                    question: idx,
                    index: question.correct_answer_index,
                    options: question.options.len(),
                });
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, idx: usize) -> Option<&Question> {
        self.questions.get(idx)
    }

    pub fn time_limit_secs(&self) -> Option<u64> {
        self.time_limit_minutes.map(|m| u64::from(m) * 60)
    }
}

/// Quizzes compiled into the binary, addressed by file stem.
pub mod bundled {
    use include_dir::{include_dir, Dir};

    use super::Quiz;
    use crate::error::QuizError;

    static QUIZ_DIR: Dir = include_dir!("src/quizzes");

    pub fn names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = QUIZ_DIR
            .files()
            .filter(|f| f.path().extension().is_some_and(|ext| ext == "json"))
            .filter_map(|f| f.path().file_stem().and_then(|s| s.to_str()))
            .collect();
        names.sort_unstable();
        names
    }

    pub fn load(name: &str) -> Result<Quiz, QuizError> {
        let file = QUIZ_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| QuizError::UnknownBundled(name.to_string()))?;
        let json = file
            .contents_utf8()
            .ok_or_else(|| QuizError::UnknownBundled(name.to_string()))?;
        Quiz::from_json(json)
    }

    pub fn all() -> Vec<Quiz> {
        names().into_iter().filter_map(|n| load(n).ok()).collect()
    }
}

/// The quizzes offered on the course screen.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    quizzes: Vec<Quiz>,
}

impl Catalog {
    pub fn new(mut quizzes: Vec<Quiz>) -> Self {
        quizzes.sort_by(|a, b| a.title.cmp(&b.title));
        Self { quizzes }
    }

    pub fn bundled() -> Self {
        Self::new(bundled::all())
    }

    /// Load every `*.json` quiz in `dir`. Files that fail to parse or
    /// validate are skipped.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, QuizError> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|source| QuizError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut quizzes = Vec::new();
        for path in paths {
            match Quiz::load(&path) {
                Ok(quiz) => quizzes.push(quiz),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping quiz"),
            }
        }

        Ok(Self::new(quizzes))
    }

    /// Add quizzes whose ids are not already present.
    pub fn merge(&mut self, other: Catalog) {
        for quiz in other.quizzes {
            if !self.quizzes.iter().any(|q| q.id == quiz.id) {
                self.quizzes.push(quiz);
            }
        }
        self.quizzes.sort_by(|a, b| a.title.cmp(&b.title));
    }

    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    pub fn get(&self, idx: usize) -> Option<&Quiz> {
        self.quizzes.get(idx)
    }

    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn sample_quiz(answer_key: &[usize], minutes: Option<u32>) -> Quiz {
    Quiz {
        id: "sample".into(),
        title: "Sample".into(),
        time_limit_minutes: minutes,
        questions: answer_key
            .iter()
            .enumerate()
            .map(|(i, &correct)| Question {
                text: format!("Question {}", i + 1),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_answer_index: correct,
            })
            .collect(),
    }
}
