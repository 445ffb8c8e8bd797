//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout areas
pub struct MainLayout {
    pub header: Rect,
    pub servers: Rect,
    pub layers: Rect,
    pub status: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = (area.width.saturating_sub(width)) / 2;
    let popup_y = (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Calculate main screen layout: header bar, server/layer panes, status
/// line, help bar.
pub fn calculate_main_layout(area: Rect) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    // Server list on the left, layer tree on the right
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(main_chunks[1]);

    MainLayout {
        header: main_chunks[0],
        servers: panes[0],
        layers: panes[1],
        status: main_chunks[2],
        help: main_chunks[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_is_clamped_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        let popup = centered_popup(area, 40, 40);
        assert_eq!(popup.width, 20);
        assert_eq!(popup.height, 10);
    }

    #[test]
    fn test_main_layout_partitions_area() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = calculate_main_layout(area);
        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.help.height, 3);
        assert_eq!(layout.servers.width + layout.layers.width, 100);
    }
}
