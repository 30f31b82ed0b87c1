use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::{HORIZONTAL_MARGIN, VERTICAL_MARGIN};
use crate::app::{App, CourseEntry};
use crate::config::Palette;

pub fn render(app: &App, palette: Palette, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2), // heading
            Constraint::Min(1),    // quiz list
            Constraint::Length(1), // notice
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled("Course quizzes", bold.fg(palette.accent)))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    if app.course.is_empty() {
        Paragraph::new(Span::styled(
            "No quizzes found. Pass a quiz file or set a quiz directory.",
            Style::default().fg(palette.dim),
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
    } else {
        let title_width = app
            .course
            .iter()
            .map(|e| e.quiz.title.width())
            .max()
            .unwrap_or(0);

        // keep the selection on screen
        let visible = chunks[1].height.max(1) as usize;
        let offset = app.selected.saturating_sub(visible - 1);

        let lines: Vec<Line> = app
            .course
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(idx, entry)| entry_line(entry, idx == app.selected, title_width, palette))
            .collect();
        Paragraph::new(lines).render(chunks[1], buf);
    }

    if let Some(notice) = &app.notice {
        Paragraph::new(Span::styled(notice.as_str(), Style::default().fg(palette.incorrect)))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
    }

    Paragraph::new(Span::styled(
        "(↑/↓) select / (enter) start / (q)uit",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(chunks[3], buf);
}

fn entry_line(entry: &CourseEntry, selected: bool, title_width: usize, palette: Palette) -> Line<'static> {
    let title = &entry.quiz.title;
    let padding = " ".repeat(title_width.saturating_sub(title.width()) + 3);

    let (marker, title_style) = if selected {
        (
            "> ",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("  ", Style::default().fg(palette.text))
    };

    Line::from(vec![
        Span::styled(marker, title_style),
        Span::styled(title.clone(), title_style),
        Span::raw(padding),
        Span::styled(describe(entry), Style::default().fg(palette.dim)),
    ])
}

/// `5 questions · 3 min · best 80% (2 attempts)`
pub fn describe(entry: &CourseEntry) -> String {
    let count = entry.quiz.len();
    let questions = if count == 1 {
        "1 question".to_string()
    } else {
        format!("{count} questions")
    };
    let limit = match entry.quiz.time_limit_minutes {
        Some(m) => format!("{m} min"),
        None => "untimed".to_string(),
    };
    let progress = match (entry.best_percent, entry.attempts) {
        (Some(best), 1) => format!("best {best}% (1 attempt)"),
        (Some(best), n) => format!("best {best}% ({n} attempts)"),
        (None, _) => "not attempted".to_string(),
    };
    format!("{questions} · {limit} · {progress}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::sample_quiz;
    use std::sync::Arc;

    fn entry(key: &[usize], minutes: Option<u32>, attempts: usize, best: Option<u8>) -> CourseEntry {
        CourseEntry {
            quiz: Arc::new(sample_quiz(key, minutes)),
            attempts,
            best_percent: best,
        }
    }

    #[test]
    fn describe_variants() {
        assert_eq!(
            describe(&entry(&[0], None, 0, None)),
            "1 question · untimed · not attempted"
        );
        assert_eq!(
            describe(&entry(&[0, 1], Some(3), 1, Some(50))),
            "2 questions · 3 min · best 50% (1 attempt)"
        );
        assert_eq!(
            describe(&entry(&[0, 1, 2], Some(1), 4, Some(100))),
            "3 questions · 1 min · best 100% (4 attempts)"
        );
    }
}
