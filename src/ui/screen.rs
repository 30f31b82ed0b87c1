use ratatui::{buffer::Buffer, layout::Rect};

use super::{course, question, results};
use crate::app::{App, AppState};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

pub struct CourseScreen;

impl Screen for CourseScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        course::render(app, app.config.theme.palette(), area, buf);
    }
}

/// Question view, including the submit and time-up dialogs
pub struct QuizScreen;

impl Screen for QuizScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        if let Some(session) = app.session.as_ref() {
            question::render(session, app.config.reveal_answers, app.config.theme.palette(), area, buf);
        }
    }
}

pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        if let Some(session) = app.session.as_ref() {
            results::render(session, app.previous_best, app.config.theme.palette(), area, buf);
        }
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: AppState) -> Box<dyn Screen> {
    match state {
        AppState::Course => Box::new(CourseScreen),
        AppState::Quiz => Box::new(QuizScreen),
        AppState::Results => Box::new(ResultsScreen),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::quiz::{sample_quiz, Catalog};

    fn draw(screen: &dyn Screen, app: &App) -> String {
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        screen.render(app, area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn session_screens_draw_nothing_without_a_session() {
        let app = App::new(Config::default(), Catalog::new(vec![sample_quiz(&[0], None)]), None);
        assert!(draw(&QuizScreen, &app).trim().is_empty());
        assert!(draw(&ResultsScreen, &app).trim().is_empty());
        assert!(draw(&CourseScreen, &app).contains("Sample"));
    }

    #[test]
    fn screen_follows_app_state() {
        let mut app = App::new(Config::default(), Catalog::new(vec![sample_quiz(&[0], None)]), None);
        assert!(draw(current_screen(app.state).as_ref(), &app).contains("Sample"));

        app.start_selected();
        assert!(draw(current_screen(app.state).as_ref(), &app).contains("Question 1 of 1"));
    }
}
