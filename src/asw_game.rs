// Game controller
// Turns player commands into field operations and tracks win/loss/quit

use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::asw_field::{CellState, Direction, Field, FieldError, FieldRules, MinePlacement, OpenOutcome};

/// Everything needed to start a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub rows: usize,
    pub cols: usize,
    pub mine_percentage: u8,
    pub rules: FieldRules,
}

/// One discrete player action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    ToggleFlag,
    Reveal,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
    Quit,
}

impl GameStatus {
    pub fn is_finished(self) -> bool {
        !matches!(self, GameStatus::Playing)
    }
}

/// Main game state
pub struct Game {
    field: Field,
    mine_percentage: u8,
    rng: StdRng,
    status: GameStatus,
}

impl Game {
    /// Validate the settings and set up a fresh field
    /// Eager rules place the mines right away, lazy rules wait for the first reveal
    pub fn new(settings: GameSettings, mut rng: StdRng) -> Result<Self, FieldError> {
        if settings.mine_percentage > 100 {
            return Err(FieldError::InvalidPercentage(settings.mine_percentage));
        }
        let mut field = Field::new(settings.rows, settings.cols, settings.rules)?;
        if settings.rules.placement == MinePlacement::Eager {
            field.place_mines(settings.mine_percentage, &mut rng)?;
        }
        info!(
            rows = settings.rows,
            cols = settings.cols,
            percentage = settings.mine_percentage,
            placement = settings.rules.placement.name(),
            flood_opens_flags = settings.rules.flood_opens_flags,
            "new game"
        );
        Ok(Game {
            field,
            mine_percentage: settings.mine_percentage,
            rng,
            status: GameStatus::Playing,
        })
    }

    /// Play on a prepared field, e.g. one built with `Field::with_mines`
    #[cfg(test)]
    pub fn with_field(field: Field, mine_percentage: u8, rng: StdRng) -> Self {
        Game {
            field,
            mine_percentage,
            rng,
            status: GameStatus::Playing,
        }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Apply one command and report the resulting status
    /// Commands after the game has finished are ignored
    pub fn apply(&mut self, command: Command) -> Result<GameStatus, FieldError> {
        if self.status.is_finished() {
            return Ok(self.status);
        }
        debug!(?command, cursor = ?self.field.cursor(), "command");

        match command {
            Command::Move(direction) => self.field.move_cursor(direction),
            Command::ToggleFlag => {
                self.field.toggle_flag_at_cursor()?;
            }
            Command::Reveal => {
                // unflag first, then open
                if self.field.cursor_cell().state == CellState::Flagged {
                    return Ok(self.status);
                }
                if !self.field.mines_placed() {
                    self.field.place_mines(self.mine_percentage, &mut self.rng)?;
                }
                if self.field.open_at_cursor()? == OpenOutcome::Exploded {
                    info!(cursor = ?self.field.cursor(), "mine opened, game lost");
                    self.status = GameStatus::Lost;
                    return Ok(self.status);
                }
            }
            Command::Quit => {
                info!("game quit");
                self.status = GameStatus::Quit;
                return Ok(self.status);
            }
        }

        if self.field.mines_placed() && self.field.is_won() {
            info!(mines = self.field.total_mines(), "all mines flagged, game won");
            self.status = GameStatus::Won;
        }
        Ok(self.status)
    }
}
