use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub focus_border: Color,
    pub blurred_border: Color,
    pub text: Color,
    pub text_secondary: Color,

    // Specific components
    pub title: Style,
    pub subtitle: Style,
    pub label: Style,
    pub label_focused: Style,
    pub value: Style,
    pub placeholder: Style,
    pub button_idle: Style,
    pub button_busy: Style,
    pub button_focused: Style,
    pub price: Style,
    pub error: Style,
    pub notice: Style,
    pub footer: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            focus_border: Color::Cyan,
            blurred_border: Color::DarkGray,
            text: Color::White,
            text_secondary: Color::Gray,

            title: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            subtitle: Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            label: Style::default().fg(Color::Gray),
            label_focused: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            value: Style::default().fg(Color::White),
            placeholder: Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            button_idle: Style::default().fg(Color::Black).bg(Color::Green),
            button_busy: Style::default()
                .fg(Color::Gray)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
            button_focused: Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            price: Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            notice: Style::default().fg(Color::Magenta),
            footer: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        }
    }
}
