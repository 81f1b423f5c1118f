use super::state::Browser;
use crate::manifest::{AnswerValue, ManifestEntry};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

const LEGEND: &str = "[j/k move] [tab section] [y/n/space answer] [0-9 number] [s skip] [? help] [q quit]";

const HELP_LINES: [&str; 10] = [
    "Up/k, Down/j     move between questions",
    "PgUp, PgDn       move ten questions",
    "Tab, Shift-Tab   next/previous section",
    "y, n             answer yes or no",
    "Space, Enter     toggle yes/no",
    "0-9, Backspace   edit a numeric answer",
    "s, Delete        skip (leave unanswered)",
    "T                generate the manifest file",
    "q, Esc, Ctrl-C   quit without saving",
    "?                close this help",
];

impl Browser {
    pub(super) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        self.draw_header(frame, layout[0]);
        self.draw_questions(frame, layout[1]);
        self.draw_status(frame, layout[2]);
        self.draw_footer(frame, layout[3]);

        if self.show_help {
            draw_help(frame, area);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                self.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "  {}/{} answered",
                self.answered_count(),
                self.entry_count()
            )),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_questions(&self, frame: &mut Frame, area: Rect) {
        let selected = self.selected_position();
        let mut items = Vec::new();
        let mut highlight = None;
        for (g, group) in self.groups.iter().enumerate() {
            let header = Text::from(
                group
                    .prompt
                    .lines()
                    .map(|line| {
                        Line::styled(
                            line.to_string(),
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        )
                    })
                    .collect::<Vec<_>>(),
            );
            items.push(ListItem::new(header));
            for (e, entry) in group.entries.iter().enumerate() {
                if selected == Some((g, e)) {
                    highlight = Some(items.len());
                }
                items.push(entry_item(entry));
            }
        }

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default();
        state.select(highlight);
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let text = self.message.as_deref().unwrap_or("");
        let paragraph = Paragraph::new(text).style(Style::default().fg(Color::Yellow));
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::raw("Press ("),
            Span::styled(
                "T",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(") to generate manifest file  "),
            Span::styled(LEGEND, Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn entry_item(entry: &ManifestEntry) -> ListItem<'static> {
    let (label, style) = match entry.value {
        Some(AnswerValue::Bool(true)) => ("[yes]".to_string(), Style::default().fg(Color::Green)),
        Some(AnswerValue::Bool(false)) => ("[no ]".to_string(), Style::default().fg(Color::Red)),
        Some(AnswerValue::Natural(number)) => {
            (format!("[{number}]"), Style::default().fg(Color::Green))
        }
        None if entry.is_bool() => ("[   ]".to_string(), Style::default()),
        None if entry.is_natural() => ("[___]".to_string(), Style::default()),
        None => ("[n/a]".to_string(), Style::default().fg(Color::DarkGray)),
    };
    ListItem::new(Line::from(vec![
        Span::raw("  "),
        Span::styled(label, style),
        Span::raw(" "),
        Span::raw(entry.name.clone()),
    ]))
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let width = area.width.min(50);
    let height = (HELP_LINES.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    let text = HELP_LINES
        .iter()
        .map(|line| Line::raw(*line))
        .collect::<Vec<_>>();
    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: false });
    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}
