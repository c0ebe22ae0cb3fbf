use serenity::all::{Colour, CreateEmbed, CreateEmbedFooter, Timestamp};

// ============================================================================
// Color Palette
// ============================================================================

/// Clan gold, used for lookups and leaderboards
pub const CLAN_COLOR: Colour = Colour::from_rgb(255, 204, 0);

/// Success color - Emerald green
pub const SUCCESS_COLOR: Colour = Colour::from_rgb(16, 185, 129);

/// Error color - Rose red
pub const ERROR_COLOR: Colour = Colour::from_rgb(244, 63, 94);

/// Ban feed color - Dark red
pub const BAN_COLOR: Colour = Colour::from_rgb(153, 27, 27);

/// Warfare feed color - Indigo
pub const WARFARE_COLOR: Colour = Colour::from_rgb(99, 102, 241);

// ============================================================================
// Text Formatting
// ============================================================================

pub const DIVIDER: &str = "───────────────────────";

pub const BULLET: &str = "•";

// ============================================================================
// Embed Builders
// ============================================================================

/// Create an embed in clan colours with the API footer
pub fn clan_embed(clan_name: &str) -> CreateEmbed {
    CreateEmbed::new()
        .color(CLAN_COLOR)
        .footer(CreateEmbedFooter::new(format!("RoatPkz API • Clan: {}", clan_name)))
        .timestamp(Timestamp::now())
}

pub fn success_embed() -> CreateEmbed {
    CreateEmbed::new().color(SUCCESS_COLOR)
}

pub fn error_embed() -> CreateEmbed {
    CreateEmbed::new().color(ERROR_COLOR)
}

// ============================================================================
// Text Helpers
// ============================================================================

/// Render ranked `(name, value)` lines, 1-based
pub fn ranked_list<T: AsRef<str>>(rows: &[(T, String)]) -> String {
    rows.iter()
        .enumerate()
        .map(|(i, (name, value))| format!("**{}.** {} {} {}", i + 1, name.as_ref(), BULLET, value))
        .collect::<Vec<_>>()
        .join("\n")
}
