use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use super::{HORIZONTAL_MARGIN, VERTICAL_MARGIN};
use crate::config::Palette;
use crate::results::{Ending, QuizResult};
use crate::session::QuizSession;

pub fn render(session: &QuizSession, previous_best: Option<u8>, palette: Palette, area: Rect, buf: &mut Buffer) {
    let Some(result) = session.result() else {
        return;
    };
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(palette.dim);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let badge_color = if result.is_perfect() {
        palette.correct
    } else {
        palette.accent
    };

    let ending = match result.ending {
        Ending::Submitted => "Submitted",
        Ending::TimeExpired => "Time ran out",
    };

    let lines = vec![
        Line::from(Span::styled(session.quiz().title.as_str(), dim)),
        Line::default(),
        Line::from(Span::styled(result.headline(), bold.fg(palette.text))),
        Line::default(),
        Line::from(Span::styled(
            result.badge.label(),
            bold.fg(badge_color).add_modifier(Modifier::UNDERLINED),
        )),
        Line::from(Span::styled(
            result.badge.blurb(),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::default(),
        counts_line(result, palette),
        Line::from(Span::styled(ending, dim)),
        Line::from(Span::styled(progress_note(result.percent, previous_best), dim)),
    ];

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        "(r)eattempt / (c)ourse / (q)uit",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(chunks[1], buf);
}

fn counts_line(result: &QuizResult, palette: Palette) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{} correct", result.correct),
            Style::default().fg(palette.correct),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{} incorrect", result.incorrect),
            Style::default().fg(palette.incorrect),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{} unanswered", result.unanswered),
            Style::default().fg(palette.dim),
        ),
    ])
}

pub fn progress_note(percent: u8, previous_best: Option<u8>) -> String {
    match previous_best {
        None => "First attempt".to_string(),
        Some(best) if percent > best => format!("New best! Previous best was {best}%"),
        Some(best) => format!("Best so far: {best}%"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_notes() {
        assert_eq!(progress_note(40, None), "First attempt");
        assert_eq!(progress_note(80, Some(60)), "New best! Previous best was 60%");
        assert_eq!(progress_note(60, Some(60)), "Best so far: 60%");
        assert_eq!(progress_note(20, Some(60)), "Best so far: 60%");
    }
}
