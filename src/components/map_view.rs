//! Map viewer dialog
//!
//! The terminal cannot display the image itself, so the viewer shows the
//! metadata of the saved file: path, size, decoded dimensions and format,
//! the requested layer list, and when it was fetched.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::domain::MapInfo;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Viewer overlay for the last downloaded map
#[derive(Default)]
pub struct MapViewDialog;

impl Component for MapViewDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Rendering needs the MapInfo; see draw_with_info
        Ok(())
    }
}

impl MapViewDialog {
    pub fn draw_with_info(&self, frame: &mut Frame, area: Rect, info: &MapInfo) -> Result<()> {
        let popup_area = centered_popup(area, 64, 13);
        frame.render_widget(Clear, popup_area);

        let label = |text: &str| Span::styled(format!("  {text:12}"), Style::default().fg(Color::Cyan));

        let dimensions = match info.dimensions {
            Some((w, h)) => format!("{w} x {h} px"),
            None => "not decodable".to_string(),
        };
        let format = info.format.as_deref().unwrap_or("unknown");

        let content = vec![
            Line::from(""),
            Line::from(vec![
                label("Saved to"),
                Span::raw(info.path.display().to_string()),
            ]),
            Line::from(vec![label("Size"), Span::raw(format!("{} bytes", info.byte_len))]),
            Line::from(vec![label("Dimensions"), Span::raw(dimensions)]),
            Line::from(vec![label("Format"), Span::raw(format.to_string())]),
            Line::from(vec![label("Layers"), Span::raw(info.layers.clone())]),
            Line::from(vec![
                label("Fetched"),
                Span::raw(info.fetched_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    " Esc/Enter ",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw("Close"),
            ]),
        ];

        let paragraph = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green))
                .title(" Map Downloaded ")
                .title_style(
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
        );

        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}
