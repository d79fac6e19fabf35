//! Terminal UI rendering with ratatui
//!
//! Draws [`Snapshot`]s only; nothing here reads or changes the live game.

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::render::{DisplayCell, Snapshot};
use crate::settings::Settings;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const EMPTY: &str = "  ";

/// Board is 10 cells * 2 chars + 2 for borders
const BOARD_WIDGET_WIDTH: u16 = BOARD_WIDTH as u16 * 2 + 2;
const PANEL_WIDTH: u16 = 24;
/// Total width needed: board + side panel
const GAME_WIDTH: u16 = BOARD_WIDGET_WIDTH + PANEL_WIDTH;
/// Total height needed: board rows + 2 for borders
const GAME_HEIGHT: u16 = BOARD_HEIGHT as u16 + 2;

const TITLE_ART: [&str; 6] = [
    "████████╗███████╗████████╗██████╗ ██╗███████╗",
    "╚══██╔══╝██╔════╝╚══██╔══╝██╔══██╗██║██╔════╝",
    "   ██║   █████╗     ██║   ██████╔╝██║███████╗",
    "   ██║   ██╔══╝     ██║   ██╔══██╗██║╚════██║",
    "   ██║   ███████╗   ██║   ██║  ██║██║███████║",
    "   ╚═╝   ╚══════╝   ╚═╝   ╚═╝  ╚═╝╚═╝╚══════╝",
];

const CONTROLS: [(&str, &str); 6] = [
    ("← →", "Move"),
    ("↑", "Rotate"),
    ("↓", "Soft drop"),
    ("Space", "Hard drop"),
    ("g", "Toggle ghost"),
    ("q", "Quit"),
];

/// Render the welcome screen
pub fn render_welcome(frame: &mut Frame) {
    let area = frame.area();
    let art_width = TITLE_ART[0].chars().count() as u16;
    let height = TITLE_ART.len() as u16 + 4;
    let welcome_area = center_rect(area, art_width, height);

    let mut lines: Vec<Line> = TITLE_ART
        .iter()
        .map(|row| Line::styled(*row, Style::default().fg(Color::LightCyan)))
        .collect();
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        format!("v{}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(Color::White),
    ));
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Press any key to start...",
        Style::default().fg(Color::Gray),
    ));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, welcome_area);
}

/// Render one frame of the game
pub fn render_game(frame: &mut Frame, snapshot: &Snapshot, settings: &Settings) {
    let area = frame.area();
    let (block_char, ghost_char) = settings.visual.block_chars();

    // Center the game area
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    // board | side panel
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BOARD_WIDGET_WIDTH),
            Constraint::Length(PANEL_WIDTH),
        ])
        .split(game_area);

    render_board(frame, main_layout[0], snapshot, block_char, ghost_char);
    render_panel(frame, main_layout[1], snapshot, block_char);

    // Overlays
    if snapshot.game_over() {
        render_overlay(frame, area, "GAME OVER", "R: restart   Q: quit", Color::Red);
    } else if snapshot.confirming_quit() {
        render_overlay(frame, area, "QUIT?", "Y: quit   N: resume", Color::Yellow);
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the game board
fn render_board(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    block_char: &'static str,
    ghost_char: &'static str,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = snapshot
        .board
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    DisplayCell::Empty => Span::raw(EMPTY),
                    DisplayCell::Ghost => Span::styled(ghost_char, Style::default().fg(Color::DarkGray)),
                    DisplayCell::Filled(kind) => {
                        Span::styled(block_char, Style::default().fg(kind.color()))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render title, stats, next piece and controls
fn render_panel(frame: &mut Frame, area: Rect, snapshot: &Snapshot, block_char: &'static str) {
    let label = Style::default().fg(Color::Gray);
    let mut lines = vec![
        Line::styled(" TETRIS", Style::default().fg(Color::LightCyan).bold()),
        Line::styled(format!(" v{}", env!("CARGO_PKG_VERSION")), Style::default().fg(Color::White)),
        Line::raw(""),
        stat_line("Score", snapshot.score.to_string(), Color::Yellow),
        stat_line("Level", snapshot.level.to_string(), Color::Cyan),
        stat_line("Lines", snapshot.lines.to_string(), Color::Green),
        Line::raw(""),
        Line::styled(" Next:", label),
    ];

    for row in &snapshot.preview {
        let mut spans = vec![Span::raw(" ")];
        spans.extend(row.iter().map(|cell| match cell {
            Some(kind) => Span::styled(block_char, Style::default().fg(kind.color())),
            None => Span::raw(EMPTY),
        }));
        lines.push(Line::from(spans));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(" Controls:", label));
    for (keys, what) in CONTROLS {
        lines.push(Line::styled(format!(" {:<6}: {}", keys, what), label));
    }
    let ghost = if snapshot.ghost_enabled { "on" } else { "off" };
    lines.push(Line::styled(format!(" Ghost : {}", ghost), label));

    frame.render_widget(Paragraph::new(lines), area);
}

fn stat_line(name: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {}: ", name), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(color).bold()),
    ])
}

/// Render a centered prompt over the board
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str, color: Color) {
    let popup_width = 26u16;
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(color).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
