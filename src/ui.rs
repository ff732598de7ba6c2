use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::{
    app::{App, AppState, RunningState, WelcomeState},
    diff::{classify_session, ClassifiedWord, Classification},
    result::SessionResult,
    words::WORD_COUNT_OPTIONS,
    wrap::{test_width, wrap},
};

const UNTYPED_COLOR: Color = Color::Indexed(250);
const RIGHT_COLOR: Color = Color::Indexed(244);
const WRONG_COLOR: Color = Color::Indexed(1);
const CURSOR_BG: Color = Color::Indexed(250);
const CURSOR_FG: Color = Color::Indexed(0);

pub fn class_style(class: Classification) -> Style {
    match class {
        Classification::Untyped => Style::default().fg(UNTYPED_COLOR),
        Classification::CorrectlyTyped => Style::default().fg(RIGHT_COLOR),
        Classification::IncorrectlyTyped => Style::default().fg(WRONG_COLOR),
        Classification::Missed => Style::default()
            .fg(WRONG_COLOR)
            .add_modifier(Modifier::UNDERLINED),
        Classification::Extra => Style::default()
            .fg(WRONG_COLOR)
            .add_modifier(Modifier::DIM),
        Classification::Cursor => Style::default().fg(CURSOR_FG).bg(CURSOR_BG),
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = match &self.state {
            AppState::Welcome(welcome) => welcome_lines(welcome),
            AppState::Running(running) => running_lines(running, area.width as usize),
            AppState::Finished(result) => finished_lines(result),
        };

        let width = lines.iter().map(Line::width).max().unwrap_or(0) as u16;
        let height = lines.len() as u16;
        let alignment = match self.state {
            AppState::Running(_) => Alignment::Left,
            _ => Alignment::Center,
        };

        Paragraph::new(lines)
            .alignment(alignment)
            .render(centered(area, width, height), buf);
    }
}

fn welcome_lines(welcome: &WelcomeState) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let italic = Style::default().add_modifier(Modifier::ITALIC);

    let mut lines = vec![
        Line::from(Span::styled("Welcome to chimptype!", bold)),
        Line::default(),
        Line::from("Select the number of words:"),
    ];
    lines.extend(WORD_COUNT_OPTIONS.iter().map(|n| {
        let selected = if *n == welcome.number_of_words { "x" } else { " " };
        Line::from(format!("[{selected}] {n} words"))
    }));
    if !WORD_COUNT_OPTIONS.contains(&welcome.number_of_words) {
        lines.push(Line::from(format!("[x] {} words", welcome.number_of_words)));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "(enter) start / (↑↓) words / (esc)ape",
        italic,
    )));
    lines
}

fn running_lines(running: &RunningState, area_width: usize) -> Vec<Line<'static>> {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let text = classify_session(&running.session);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{:.1}s", running.elapsed.as_secs_f64()),
            dim,
        )),
        Line::default(),
    ];
    // Each word carries its separator, so the last one on a line needs a spare column
    let wrap_width = test_width(area_width).saturating_sub(1);
    lines.extend(
        wrap(&text.raw(), text.words.iter(), wrap_width)
            .into_iter()
            .map(|words| Line::from(words.into_iter().flat_map(word_spans).collect::<Vec<_>>())),
    );
    lines
}

fn word_spans(word: &ClassifiedWord) -> Vec<Span<'static>> {
    word.chars
        .iter()
        .map(|c| Span::styled(c.ch.to_string(), class_style(c.class)))
        .chain(
            word.separator
                .map(|class| Span::styled(" ", class_style(class))),
        )
        .collect()
}

fn finished_lines(result: &SessionResult) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let italic = Style::default().add_modifier(Modifier::ITALIC);

    let mut lines = vec![
        Line::from(Span::styled("Test finished!", bold)),
        Line::default(),
    ];
    match result.metrics() {
        Ok(m) => lines.extend([
            Line::from(format!("Net WPM: {:.1}", m.net_wpm)),
            Line::from(format!("Raw WPM: {:.1}", m.raw_wpm)),
            Line::from(format!("Accuracy: {:.1}%", m.accuracy)),
            Line::from(format!("Time: {:.1} seconds", result.duration().as_secs_f64())),
            Line::from(format!("Errors: {}", m.error_count)),
            Line::from(format!("Correct: {}", m.correct_count)),
            Line::from(format!("Missed: {}", m.missed_count)),
            Line::from(format!("Extra: {}", m.extra_count)),
        ]),
        Err(err) => lines.extend([
            Line::from(Span::styled(
                "Metrics unavailable",
                Style::default().fg(WRONG_COLOR),
            )),
            Line::from(err.to_string()),
            Line::from(format!("Time: {:.1} seconds", result.duration().as_secs_f64())),
        ]),
    }
    lines.push(Line::from(format!(
        "Completed at {}",
        result.completed_at().format("%H:%M:%S")
    )));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("(enter) / (esc) back", italic)));
    lines
}

/// A `width` x `height` rect centered in `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
