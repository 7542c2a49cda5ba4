use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, AppState},
    session::{Score, Verdict},
};

const HORIZONTAL_MARGIN: u16 = 5;
const DIALOG_WIDTH: u16 = 40;
const DIALOG_HEIGHT: u16 = 8;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        render_sample(self, area, buf);

        if let (AppState::Score, Some(score)) = (self.state, self.score) {
            render_score_dialog(&score, area, buf);
        }
    }
}

fn render_sample(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = Style::default()
        .patch(dim_bold_style)
        .add_modifier(Modifier::UNDERLINED);

    // what each position shows on screen; a missed space must stay visible
    let glyphs: Vec<char> = session
        .sample()
        .iter()
        .enumerate()
        .map(|(idx, &expected)| match (session.verdict_at(idx), expected) {
            (Some(Verdict::Incorrect), ' ') => '·',
            (_, c) => c,
        })
        .collect();

    let text_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let shown: String = glyphs.iter().collect();
    let single_line = shown.width() <= text_width as usize;

    let mut spans = glyphs[..session.cursor()]
        .iter()
        .zip(session.verdicts())
        .map(|(glyph, verdict)| match verdict {
            Verdict::Correct => Span::styled(glyph.to_string(), green_bold_style),
            Verdict::Incorrect => Span::styled(glyph.to_string(), red_bold_style),
        })
        .collect::<Vec<Span>>();

    // the caret sits on the next expected character
    if let Some(next) = glyphs.get(session.cursor()) {
        spans.push(Span::styled(next.to_string(), underlined_dim_bold_style));

        let rest: String = glyphs[session.cursor() + 1..].iter().collect();
        spans.push(Span::styled(rest, dim_bold_style));
    }

    let widget = Paragraph::new(Line::from(spans))
        .alignment(if single_line {
            // when the prompt is small enough to fit on one line
            // centering the text gives a nice zen feeling
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true });

    let total_lines = (widget.line_count(text_width) as u16).max(1);
    // one row for the legend, one between it and the text
    let visible_lines = total_lines.min(area.height.saturating_sub(2).max(1));
    let scroll = caret_scroll(&glyphs, session.cursor(), text_width, total_lines, visible_lines);
    let padding = area.height.saturating_sub(visible_lines) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(padding),
            Constraint::Length(visible_lines),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    widget.scroll((scroll, 0)).render(chunks[1], buf);

    let legend = Paragraph::new(Span::styled(
        "(esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ));
    legend.render(chunks[3], buf);
}

/// Rows to scroll so the caret's row sits mid-view. The caret row is found by
/// wrapping the text up to and including the caret; a word cut at the caret can
/// wrap one row earlier than in the full text, which mid-view placement absorbs.
fn caret_scroll(
    glyphs: &[char],
    cursor: usize,
    width: u16,
    total_lines: u16,
    visible_lines: u16,
) -> u16 {
    if total_lines <= visible_lines {
        return 0;
    }
    let caret_row = if cursor < glyphs.len() {
        let upto: String = glyphs[..=cursor].iter().collect();
        let rows = Paragraph::new(upto)
            .wrap(Wrap { trim: true })
            .line_count(width) as u16;
        rows.saturating_sub(1)
    } else {
        total_lines - 1
    };
    caret_row
        .saturating_sub(visible_lines / 2)
        .min(total_lines - visible_lines)
}

fn render_score_dialog(score: &Score, area: Rect, buf: &mut Buffer) {
    let popup = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    Clear.render(popup, buf);

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled(
            format!("All characters : {}", score.total),
            bold_style,
        )),
        Line::from(Span::styled(
            format!("Correctly typed characters : {}", score.correct),
            bold_style.fg(Color::Green),
        )),
        Line::from(Span::styled(
            format!("Incorrect typed characters : {}", score.incorrect),
            bold_style.fg(Color::Red),
        )),
        Line::from(format!("{}% acc", score.accuracy())),
        Line::from(""),
        Line::from(Span::styled(
            "(enter) / (esc)ape",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];

    let dialog = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Your Score ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Center);

    dialog.render(popup, buf);
}

/// A `width` x `height` rect centered in `area`, clamped to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
