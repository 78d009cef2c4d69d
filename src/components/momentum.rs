use nhl_api::score::display_percent;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::widgets::Widget;

const FILLED: char = '█';
const EMPTY: char = '░';

/// Bar color by displayed percentage.
pub fn heat_color(percent: u16) -> Color {
    match percent {
        70.. => Color::Red,
        55..=69 => Color::LightRed,
        40..=54 => Color::Yellow,
        _ => Color::Blue,
    }
}

/// `width` cells, filled in proportion to `percent` (0..=100).
pub fn bar_text(percent: u16, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width + 50) / 100;
    let mut bar = String::with_capacity(width * 3);
    bar.extend(std::iter::repeat_n(FILLED, filled));
    bar.extend(std::iter::repeat_n(EMPTY, width - filled));
    bar
}

/// One labelled hotness bar: `EDM  ███████░░░  70%`.
///
/// Scores are unbounded; only the drawn percentage is clamped.
pub struct MomentumBar<'a> {
    pub label: &'a str,
    pub score: f64,
    pub label_width: u16,
}

impl Widget for MomentumBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let percent = display_percent(self.score);
        let label: String = self.label.chars().take(self.label_width as usize).collect();
        buf.set_string(area.x, area.y, &label, Style::default().fg(Color::White));

        let suffix = format!(" {percent:>3}%");
        let bar_x = area.x + self.label_width + 1;
        let bar_width = area
            .width
            .saturating_sub(self.label_width + 1 + suffix.len() as u16) as usize;
        if bar_width == 0 {
            return;
        }

        let bar = bar_text(percent, bar_width);
        buf.set_string(bar_x, area.y, &bar, Style::default().fg(heat_color(percent)));
        buf.set_string(
            bar_x + bar_width as u16,
            area.y,
            &suffix,
            Style::default().fg(Color::Gray),
        );
    }
}
