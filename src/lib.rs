// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod history;
pub mod ledger;
pub mod logging;
pub mod quiz;
pub mod results;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod timer;
pub mod ui;

pub use error::{AnswerError, HistoryError, QuizError};
pub use quiz::{Question, Quiz};
pub use session::{Phase, QuizSession};
