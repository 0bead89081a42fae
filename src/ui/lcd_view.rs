//! Terminal drawing of the LCD, key legend and action log

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::core::types::{LCD_HEIGHT, LCD_WIDTH};
use crate::render::LcdFrame;
use crate::ui::state::{GameUI, LogCategory};

const LCD_FG: Color = Color::Black;
const LCD_BG: Color = Color::LightGreen;

/// Key legend; the treat line states the price only when the economy is on
fn help_lines(economy: bool) -> [&'static str; 3] {
    let treat = if economy {
        "Select places (costs 1) or removes (refunds 1) a treat at the cursor"
    } else {
        "Select places or removes a treat at the cursor (free)"
    };
    [
        "arrows/wasd: Left Right Up Down    enter/space: Select",
        treat,
        "h: toggle help    m: log moves    q/esc: quit",
    ]
}

pub fn draw(f: &mut Frame<'_>, lcd: &LcdFrame, ui: &GameUI, economy: bool) {
    let help = help_lines(economy);
    let help_height = if ui.show_help { help.len() as u16 + 2 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(LCD_HEIGHT as u16 + 2),
            Constraint::Length(help_height),
            Constraint::Min(0),
        ])
        .split(f.size());

    let lcd_lines: Vec<Line> = (0..LCD_HEIGHT).map(|row| Line::from(lcd.row(row))).collect();
    let lcd_widget = Paragraph::new(lcd_lines)
        .style(Style::default().fg(LCD_FG).bg(LCD_BG))
        .block(Block::default().borders(Borders::ALL).title("16x2"));
    f.render_widget(lcd_widget, centered(chunks[0], LCD_WIDTH as u16 + 2));

    if ui.show_help {
        let help: Vec<Line> = help.iter().map(|&line| Line::from(line)).collect();
        let help_widget =
            Paragraph::new(help).block(Block::default().borders(Borders::ALL).title("Keys"));
        f.render_widget(help_widget, chunks[1]);
    }

    let log_area = chunks[2];
    let visible = log_area.height.saturating_sub(2) as usize;
    let log_lines: Vec<Line> = ui
        .recent(visible)
        .map(|entry| {
            let style = match entry.category {
                LogCategory::Input => Style::default().fg(Color::Cyan),
                LogCategory::Pen => Style::default().fg(Color::Yellow),
                LogCategory::System => Style::default().add_modifier(Modifier::BOLD),
            };
            Line::from(vec![
                Span::styled(format!("{:>8}ms ", entry.at), Style::default().fg(Color::DarkGray)),
                Span::styled(entry.message.clone(), style),
            ])
        })
        .collect();
    let log_widget =
        Paragraph::new(log_lines).block(Block::default().borders(Borders::ALL).title("Log"));
    f.render_widget(log_widget, log_area);
}

/// Horizontally centre a box of `width` columns inside `area`
fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_matches_economy() {
        assert!(help_lines(true)[1].contains("costs 1"));

        let free = help_lines(false)[1];
        assert!(!free.contains("costs"));
        assert!(free.contains("free"));
    }

    #[test]
    fn test_centered_clamps_to_area() {
        let area = Rect::new(0, 0, 10, 4);
        assert_eq!(centered(area, 18), area);

        let wide = Rect::new(2, 1, 40, 4);
        assert_eq!(centered(wide, 18), Rect::new(13, 1, 18, 4));
    }
}
