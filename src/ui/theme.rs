use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub keyword: Color,
    pub string: Color,
    pub number: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub span_bg: Color, // The highlighted part of the current line
    pub function: Color,
    pub muted_function: Color, // Muted yellow for call chain functions
    pub pointer: Color,        // Arrows and list ids
    pub return_value: Color,
    pub condition_true_bg: Color,
    pub condition_false_bg: Color,
    pub player_one: Color, // "G" tokens
    pub player_two: Color, // "B" tokens
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    keyword: Color::Rgb(137, 180, 250),        // Blue for keywords
    string: Color::Rgb(250, 179, 135),         // Orange for strings
    number: Color::Rgb(250, 179, 135),         // Orange for numbers
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for current line
    span_bg: Color::Rgb(88, 91, 112),
    function: Color::Rgb(249, 226, 175),       // Yellow for functions
    muted_function: Color::Rgb(180, 165, 120), // Muted yellow for call chain
    pointer: Color::Rgb(148, 226, 213),        // Teal
    return_value: Color::Rgb(245, 194, 231),   // Pink for return values
    condition_true_bg: Color::Rgb(40, 90, 50),
    condition_false_bg: Color::Rgb(110, 40, 50),
    player_one: Color::Rgb(166, 227, 161),
    player_two: Color::Rgb(137, 180, 250),
};
