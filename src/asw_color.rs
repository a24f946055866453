use crossterm::style::Color;
use std::env;
use term_color_support::ColorSupport;

/// How many colors the output terminal can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    TrueColor,
    Indexed256,
    Basic,
    Monochrome,
}

/// Resolves named ANSI colors so glyphs look the same across terminals.
/// Named colors are mapped onto the Windows Terminal "Campbell" scheme when the
/// terminal can show more than the 16 basic colors.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    depth: ColorDepth,
}

impl Palette {
    /// Detect terminal color support (TrueColor, 256, or Basic) once at startup
    /// NO_COLOR in the environment turns colors off
    pub fn detect() -> Self {
        if env::var_os("NO_COLOR").is_some() {
            return Palette::monochrome();
        }
        let support = ColorSupport::stdout();
        let depth = if support.has_16m {
            ColorDepth::TrueColor
        } else if support.has_256 {
            ColorDepth::Indexed256
        } else {
            ColorDepth::Basic
        };
        Palette { depth }
    }

    /// No escape codes at all
    pub fn monochrome() -> Self {
        Palette {
            depth: ColorDepth::Monochrome,
        }
    }

    /// Color to emit for `color`, `None` when nothing should be emitted
    pub fn resolve(&self, color: Color) -> Option<Color> {
        let Some((rgb, index256)) = campbell(color) else {
            // Custom RGB or indexed colors pass through
            return match self.depth {
                ColorDepth::Monochrome => None,
                _ => Some(color),
            };
        };
        match self.depth {
            ColorDepth::TrueColor => Some(Color::Rgb {
                r: rgb.0,
                g: rgb.1,
                b: rgb.2,
            }),
            // e.g. macOS Terminal: a stable 16-255 index
            ColorDepth::Indexed256 => Some(Color::AnsiValue(index256)),
            ColorDepth::Basic => Some(color),
            ColorDepth::Monochrome => None,
        }
    }
}

// Format: ((R, G, B), ANSI_256_Index); crossterm's Dark* variants are the normal ANSI colors
fn campbell(color: Color) -> Option<((u8, u8, u8), u8)> {
    match color {
        Color::Black => Some(((12, 12, 12), 232)),
        Color::DarkRed => Some(((197, 15, 31), 160)),
        Color::DarkGreen => Some(((19, 161, 14), 28)),
        Color::DarkYellow => Some(((193, 156, 0), 178)),
        Color::DarkBlue => Some(((0, 55, 218), 20)),
        Color::DarkMagenta => Some(((136, 23, 152), 90)),
        Color::DarkCyan => Some(((58, 150, 221), 38)),
        Color::Grey => Some(((204, 204, 204), 250)),
        Color::DarkGrey => Some(((118, 118, 118), 243)),
        Color::Red => Some(((231, 72, 86), 203)),
        Color::Green => Some(((22, 198, 12), 46)),
        Color::Yellow => Some(((249, 241, 165), 229)),
        Color::Blue => Some(((59, 120, 255), 63)),
        Color::Magenta => Some(((180, 0, 158), 163)),
        Color::Cyan => Some(((97, 214, 214), 116)),
        Color::White => Some(((242, 242, 242), 255)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_follow_depth() {
        let true_color = Palette {
            depth: ColorDepth::TrueColor,
        };
        assert_eq!(
            true_color.resolve(Color::DarkRed),
            Some(Color::Rgb { r: 197, g: 15, b: 31 })
        );
        let indexed = Palette {
            depth: ColorDepth::Indexed256,
        };
        assert_eq!(indexed.resolve(Color::DarkRed), Some(Color::AnsiValue(160)));
        let basic = Palette {
            depth: ColorDepth::Basic,
        };
        assert_eq!(basic.resolve(Color::DarkRed), Some(Color::DarkRed));
    }

    #[test]
    fn monochrome_emits_nothing() {
        let palette = Palette::monochrome();
        assert_eq!(palette.resolve(Color::Blue), None);
        assert_eq!(palette.resolve(Color::AnsiValue(7)), None);
    }

    #[test]
    fn custom_colors_pass_through() {
        let palette = Palette {
            depth: ColorDepth::TrueColor,
        };
        assert_eq!(palette.resolve(Color::AnsiValue(7)), Some(Color::AnsiValue(7)));
    }
}
