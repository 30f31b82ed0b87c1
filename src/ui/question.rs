use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use super::{render_modal, HORIZONTAL_MARGIN, VERTICAL_MARGIN};
use crate::config::Palette;
use crate::scoring::Outcome;
use crate::session::{Phase, QuizSession};
use crate::timer::format_clock;

/// Below this many seconds the clock switches to the warning color.
const LOW_TIME_SECS: u64 = 30;

pub fn render(session: &QuizSession, reveal: bool, palette: Palette, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(palette.dim);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // title + clock
            Constraint::Length(2), // question counter
            Constraint::Min(3),    // question and options
            Constraint::Length(2), // answered dots
            Constraint::Length(1), // legend
        ])
        .split(area);

    let quiz = session.quiz();
    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(16)])
        .split(chunks[0]);

    Paragraph::new(Span::styled(quiz.title.as_str(), bold.fg(palette.accent)))
        .alignment(Alignment::Left)
        .render(header[0], buf);

    let clock = match session.remaining_secs() {
        Some(secs) => {
            let style = if secs <= LOW_TIME_SECS {
                bold.fg(palette.warning)
            } else {
                bold.fg(palette.text)
            };
            Span::styled(format!("time left {}", format_clock(secs)), style)
        }
        None => Span::styled("untimed", dim),
    };
    Paragraph::new(clock)
        .alignment(Alignment::Right)
        .render(header[1], buf);

    Paragraph::new(Span::styled(
        format!(
            "Question {} of {}",
            session.current_index() + 1,
            quiz.len()
        ),
        dim,
    ))
    .render(chunks[1], buf);

    let question = session.current_question();
    let mut body = vec![
        Line::from(Span::styled(question.text.as_str(), bold.fg(palette.text))),
        Line::default(),
    ];
    body.extend(
        question
            .options
            .iter()
            .enumerate()
            .map(|(idx, text)| option_line(session, idx, text, reveal, palette)),
    );
    if reveal {
        body.push(Line::default());
        body.push(feedback_line(session.current_outcome(), palette));
    }
    Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .render(chunks[2], buf);

    Paragraph::new(progress_dots(session, reveal, palette))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "(1-4) answer / (←/→) move / (s)ubmit / (esc) leave",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(chunks[4], buf);

    match session.phase() {
        Phase::ConfirmingSubmit => {
            let unanswered = session.ledger().unanswered_count();
            let status = match unanswered {
                0 => "All questions answered.".to_string(),
                1 => "1 question still unanswered.".to_string(),
                n => format!("{n} questions still unanswered."),
            };
            render_modal(
                " Submit quiz ",
                vec![
                    Line::from(Span::styled("Submit your answers?", bold)),
                    Line::from(status),
                    Line::default(),
                    Line::from("(y)es / (n)o"),
                ],
                palette.accent,
                area,
                buf,
            );
        }
        Phase::TimeExpired => {
            let ledger = session.ledger();
            render_modal(
                " Time's up ",
                vec![
                    Line::from(Span::styled("The time limit has been reached.", bold)),
                    Line::from(format!(
                        "Answered {} of {} questions.",
                        ledger.answered_count(),
                        ledger.question_count()
                    )),
                    Line::default(),
                    Line::from("(enter) see results"),
                ],
                palette.warning,
                area,
                buf,
            );
        }
        Phase::Running | Phase::Completed => {}
    }
}

fn option_line<'a>(session: &QuizSession, idx: usize, text: &'a str, reveal: bool, palette: Palette) -> Line<'a> {
    let question = session.current_question();
    let picked = session.ledger().get_answer(session.current_index());
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let (mark, style) = match picked {
        None => (" ", Style::default().fg(palette.text)),
        Some(_) if reveal && question.is_correct(idx) => ("✓", bold.fg(palette.correct)),
        Some(p) if reveal && p == idx => ("✗", bold.fg(palette.incorrect)),
        Some(p) if !reveal && p == idx => ("•", bold.fg(palette.accent)),
        Some(_) => (" ", Style::default().fg(palette.dim)),
    };

    Line::from(vec![
        Span::styled(format!("{mark} {}) ", idx + 1), style),
        Span::styled(text, style),
    ])
}

fn feedback_line(outcome: Outcome, palette: Palette) -> Line<'static> {
    match outcome {
        Outcome::Correct => Line::from(Span::styled("Correct!", Style::default().fg(palette.correct))),
        Outcome::Incorrect => Line::from(Span::styled(
            "Not quite. The right answer is marked.",
            Style::default().fg(palette.incorrect),
        )),
        Outcome::Unanswered => Line::default(),
    }
}

/// One dot per question: filled once answered, bracketed for the current one.
fn progress_dots(session: &QuizSession, reveal: bool, palette: Palette) -> Line<'static> {
    let spans: Vec<Span> = (0..session.quiz().len())
        .map(|idx| {
            let outcome = session.outcome(idx);
            let symbol = if outcome == Outcome::Unanswered { "○" } else { "●" };
            let color = match (reveal, outcome) {
                (_, Outcome::Unanswered) => palette.dim,
                (true, Outcome::Correct) => palette.correct,
                (true, Outcome::Incorrect) => palette.incorrect,
                (false, _) => palette.accent,
            };
            let mut style = Style::default().fg(color);
            let text = if idx == session.current_index() {
                style = style.add_modifier(Modifier::BOLD);
                format!("[{symbol}]")
            } else {
                format!(" {symbol} ")
            };
            Span::styled(text, style)
        })
        .collect();
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crate::quiz::sample_quiz;
    use std::sync::Arc;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn revealed_answer_marks_pick_and_key() {
        let mut session = QuizSession::new(Arc::new(sample_quiz(&[2], None))).unwrap();
        session.select_option(0).unwrap();
        let palette = Theme::Dark.palette();

        let picked = option_line(&session, 0, "a", true, palette);
        let key = option_line(&session, 2, "c", true, palette);
        let other = option_line(&session, 1, "b", true, palette);

        assert_eq!(line_text(&picked), "✗ 1) a");
        assert_eq!(line_text(&key), "✓ 3) c");
        assert_eq!(line_text(&other), "  2) b");
        assert_eq!(picked.spans[1].style.fg, Some(palette.incorrect));
        assert_eq!(key.spans[1].style.fg, Some(palette.correct));
    }

    #[test]
    fn hidden_answer_only_marks_pick() {
        let mut session = QuizSession::new(Arc::new(sample_quiz(&[2], None))).unwrap();
        session.select_option(0).unwrap();
        let palette = Theme::Dark.palette();

        assert_eq!(line_text(&option_line(&session, 0, "a", false, palette)), "• 1) a");
        assert_eq!(line_text(&option_line(&session, 2, "c", false, palette)), "  3) c");
    }

    #[test]
    fn dots_track_answers_and_position() {
        let mut session = QuizSession::new(Arc::new(sample_quiz(&[0, 0, 0], None))).unwrap();
        session.select_option(0).unwrap();
        session.next();

        let dots = progress_dots(&session, true, Theme::Dark.palette());
        assert_eq!(line_text(&dots), " ● [○] ○ ");
    }
}
