use crossterm::style::Color;

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

// Catppuccin Mocha palette
pub const TEXT: Color = rgb(205, 214, 244);
pub const OVERLAY0: Color = rgb(108, 112, 134);
pub const RED: Color = rgb(243, 139, 168);
pub const GREEN: Color = rgb(166, 227, 161);
pub const YELLOW: Color = rgb(249, 226, 175);
pub const BLUE: Color = rgb(137, 180, 250);
pub const TEAL: Color = rgb(148, 226, 213);
pub const CRUST: Color = rgb(17, 17, 27);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_builds_true_color_values() {
        assert_eq!(TEXT, Color::Rgb { r: 205, g: 214, b: 244 });
        assert_eq!(CRUST, Color::Rgb { r: 17, g: 17, b: 27 });
    }
}
