use tabled::settings::Color;

/// Color scheme for table columns
pub const TABLE_COLORS_LISTING: [Color; 3] =
    [Color::FG_MAGENTA, Color::FG_GREEN, Color::FG_BRIGHT_BLUE];

pub const TABLE_COLORS_EPISODES: [Color; 3] =
    [Color::FG_MAGENTA, Color::FG_GREEN, Color::FG_BRIGHT_BLUE];

pub const TABLE_COLORS_SOURCES: [Color; 2] = [Color::FG_MAGENTA, Color::FG_GREEN];

pub const TABLE_HEADER_COLOR: Color = Color::FG_WHITE;

/// Longest encrypted payload shown before it gets cut
pub const MAX_PAYLOAD_WIDTH: usize = 48;
