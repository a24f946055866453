use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, PrintStyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use std::error::Error;
use std::io::{self, Write};

use crate::asw_color::Palette;
use crate::asw_config::Config;
use crate::asw_field::{Direction, Field, Symbol};
use crate::asw_game::{Command, Game, GameStatus};
use crate::asw_lang::Lang;
use crate::asw_term::RawTerminal;

/// Glyph text and color for each non-numeric symbol
#[derive(Debug, Clone, Copy)]
struct Glyphs {
    closed: (&'static str, Option<Color>),
    flag: (&'static str, Option<Color>),
    mine: (&'static str, Option<Color>),
}

fn make_glyphs(unicode: bool) -> Glyphs {
    Glyphs {
        closed: (if unicode { "■" } else { "." }, None),
        flag: (if unicode { "⚑" } else { "!" }, Some(Color::DarkRed)),
        mine: (if unicode { "☼" } else { "*" }, None),
    }
}

// Number colors for open cells 1..8
const NUM_COLORS: [Color; 8] = [
    Color::DarkBlue,
    Color::DarkGreen,
    Color::Red,
    Color::DarkMagenta,
    Color::DarkRed,
    Color::DarkCyan,
    Color::Grey,
    Color::DarkGrey,
];

/// Draws the field in place: status line, one line per row, key help
pub struct Renderer {
    glyphs: Glyphs,
    palette: Palette,
    drawn_lines: u16,
}

impl Renderer {
    pub fn new(unicode_glyphs: bool, palette: Palette) -> Self {
        Renderer {
            glyphs: make_glyphs(unicode_glyphs),
            palette,
            drawn_lines: 0,
        }
    }

    /// Draw a full frame, overwriting the previous one if there was any
    pub fn draw<W: Write>(&mut self, out: &mut W, field: &Field, lang: &Lang) -> io::Result<()> {
        if self.drawn_lines > 0 {
            queue!(out, cursor::MoveUp(self.drawn_lines), cursor::MoveToColumn(0))?;
        }

        queue!(
            out,
            Clear(ClearType::UntilNewLine),
            Print(lang.status_line(field.total_flagged(), field.total_mines())),
            Print("\r\n")
        )?;

        let cursor = field.cursor();
        for row in 0..field.rows() {
            queue!(out, Clear(ClearType::UntilNewLine))?;
            for col in 0..field.cols() {
                let selected = cursor == (row, col);
                queue!(out, Print(if selected { "[" } else { " " }))?;
                let (text, color) = match field.symbol_at(row, col) {
                    Symbol::Closed => self.glyphs.closed,
                    Symbol::Flagged => self.glyphs.flag,
                    Symbol::Mine => self.glyphs.mine,
                    Symbol::Blank => (" ", None),
                    Symbol::Count(n) => (digit(n), Some(NUM_COLORS[(n as usize).saturating_sub(1)])),
                };
                self.put(out, text, color)?;
                queue!(out, Print(if selected { "]" } else { " " }))?;
            }
            queue!(out, Print("\r\n"))?;
        }

        queue!(
            out,
            Clear(ClearType::UntilNewLine),
            Print(lang.assets.help_line),
            Print("\r\n")
        )?;

        // rows are capped at MAX_SIDE, well inside u16
        self.drawn_lines = (field.rows() + 2) as u16;
        out.flush()
    }

    fn put<W: Write>(&self, out: &mut W, text: &str, color: Option<Color>) -> io::Result<()> {
        match color.and_then(|c| self.palette.resolve(c)) {
            Some(c) => queue!(out, PrintStyledContent(text.with(c))),
            None => queue!(out, Print(text)),
        }
    }
}

fn digit(n: u8) -> &'static str {
    const DIGITS: [&str; 9] = ["0", "1", "2", "3", "4", "5", "6", "7", "8"];
    DIGITS[(n as usize).min(8)]
}

/// Map a key press to a game command
/// wasd or arrows move, f flags, space opens, q / Esc / Ctrl-C quit
pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char('w' | 'W') | KeyCode::Up => Some(Command::Move(Direction::Up)),
        KeyCode::Char('s' | 'S') | KeyCode::Down => Some(Command::Move(Direction::Down)),
        KeyCode::Char('a' | 'A') | KeyCode::Left => Some(Command::Move(Direction::Left)),
        KeyCode::Char('d' | 'D') | KeyCode::Right => Some(Command::Move(Direction::Right)),
        KeyCode::Char('f' | 'F') => Some(Command::ToggleFlag),
        KeyCode::Char(' ') => Some(Command::Reveal),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

/// Run the blocking input loop until the game finishes
/// The terminal is back in cooked mode when this returns, so the caller can print the outcome
pub fn run(game: &mut Game, cfg: &Config, lang: &Lang) -> Result<GameStatus, Box<dyn Error>> {
    let mut term = RawTerminal::acquire(io::stdout())?;
    let mut renderer = Renderer::new(cfg.unicode_glyphs, Palette::detect());

    renderer.draw(&mut term, game.field(), lang)?;
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        // Windows also reports releases
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Some(command) = command_for_key(key) else {
            continue;
        };

        let status = game.apply(command)?;
        if status == GameStatus::Quit {
            break;
        }
        renderer.draw(&mut term, game.field(), lang)?;
        if status.is_finished() {
            break;
        }
    }

    drop(term);
    Ok(game.status())
}
