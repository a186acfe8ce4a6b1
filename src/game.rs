use crate::board::{Board, Cell, Position, Side};
use crate::config::{ConfigError, GameConfig};
use crate::connectivity::{all_units_separated, territory_for_side};
use crate::moves::{is_valid_move, legal_destinations, mobility_count};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Where the current turn stands. The unit being acted on lives inside the
/// phase that needs it, so a selection can't outlive its phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    SelectUnit,
    SelectDestination { selected: Position },
    SelectArrow { selected: Position },
    GameOver { winner: Side },
}

impl Phase {
    pub fn selected(&self) -> Option<Position> {
        match self {
            Phase::SelectDestination { selected } | Phase::SelectArrow { selected } => {
                Some(*selected)
            }
            Phase::SelectUnit | Phase::GameOver { .. } => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Phase::SelectUnit => "select_unit",
            Phase::SelectDestination { .. } => "select_destination",
            Phase::SelectArrow { .. } => "select_arrow",
            Phase::GameOver { .. } => "game_over",
        }
    }
}

/// Why a click produced no transition. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    OutsideBoard,
    NotOwnUnit,
    IllegalMove,
    IllegalArrow,
    GameOver,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Rejection::OutsideBoard => "Click outside the board",
            Rejection::NotOwnUnit => "No unit of yours there",
            Rejection::IllegalMove => "Invalid move destination",
            Rejection::IllegalArrow => "Invalid arrow shot",
            Rejection::GameOver => "Game is over",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideMetrics {
    pub mobility: usize,
    pub territory: usize,
}

/// Mobility and territory of both sides, measured once they are separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparationReport {
    pub white: SideMetrics,
    pub black: SideMetrics,
}

impl SeparationReport {
    pub fn measure(board: &Board) -> Self {
        let metrics = |side| SideMetrics {
            mobility: mobility_count(board, side),
            territory: territory_for_side(board, side),
        };
        SeparationReport {
            white: metrics(Side::White),
            black: metrics(Side::Black),
        }
    }

    pub fn for_side(&self, side: Side) -> SideMetrics {
        match side {
            Side::White => self.white,
            Side::Black => self.black,
        }
    }
}

/// End-of-turn evaluation, produced once per placed arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub next_player: Side,
    pub next_player_mobility: usize,
    pub winner: Option<Side>,
    pub separation: Option<SeparationReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored(Rejection),
    UnitSelected(Position),
    UnitMoved { from: Position, to: Position },
    ArrowPlaced { at: Position, report: TurnReport },
}

impl ClickOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, ClickOutcome::Ignored(_))
    }
}

impl fmt::Display for ClickOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClickOutcome::Ignored(reason) => write!(f, "{}", reason),
            ClickOutcome::UnitSelected(pos) => write!(f, "Selected unit at {}", pos),
            ClickOutcome::UnitMoved { from, to } => write!(f, "Moved {} -> {}", from, to),
            ClickOutcome::ArrowPlaced { at, report } => match report.winner {
                Some(winner) => write!(
                    f,
                    "Arrow shot to {}. No valid moves for {}, {} wins!",
                    at, report.next_player, winner
                ),
                None => write!(f, "Arrow shot to {}. {} to move", at, report.next_player),
            },
        }
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    current_player: Side,
    phase: Phase,
    turns: usize,
    latest_report: Option<SeparationReport>,
}

impl GameState {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Side {
        self.current_player
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected_position(&self) -> Option<Position> {
        self.phase.selected()
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            Phase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Completed turns, which is also the number of arrows fired.
    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Metrics from the most recent turn that ended with the sides separated.
    pub fn latest_report(&self) -> Option<&SeparationReport> {
        self.latest_report.as_ref()
    }

    /// Destinations available to the selected unit, for highlighting.
    pub fn legal_targets(&self) -> Vec<Position> {
        self.selected_position()
            .map(|pos| legal_destinations(&self.board, pos))
            .unwrap_or_default()
    }
}

/// Sole owner of the game state; turns cell clicks into phase transitions.
#[derive(Debug, Clone)]
pub struct GameController {
    state: GameState,
}

impl GameController {
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        let placements = config.placements()?;

        let mut board = Board::new(config.board_width, config.board_height);
        for (side, x, y) in placements {
            board.set(Position::new(x, y), Cell::Owned(side))?;
        }

        info!(
            width = config.board_width,
            height = config.board_height,
            starting_player = %config.starting_player,
            "game created"
        );
        Ok(Self::from_board(board, config.starting_player))
    }

    /// Starts a game from an arbitrary position, `starting_player` to select a unit.
    pub fn from_board(board: Board, starting_player: Side) -> Self {
        GameController {
            state: GameState {
                board,
                current_player: starting_player,
                phase: Phase::SelectUnit,
                turns: 0,
                latest_report: None,
            },
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Owned copy of the current state, detached from further clicks.
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn current_player(&self) -> Side {
        self.state.current_player
    }

    pub fn selected_position(&self) -> Option<Position> {
        self.state.selected_position()
    }

    pub fn winner(&self) -> Option<Side> {
        self.state.winner()
    }

    /// Feeds one click in raw grid coordinates through the turn state machine.
    pub fn cell_clicked(&mut self, x: i64, y: i64) -> ClickOutcome {
        if self.state.is_game_over() {
            return ClickOutcome::Ignored(Rejection::GameOver);
        }

        let Some(clicked) = self.state.board.position(x, y) else {
            debug!(x, y, "click outside board bounds");
            return ClickOutcome::Ignored(Rejection::OutsideBoard);
        };

        let outcome = match self.state.phase {
            Phase::SelectUnit => self.select_unit(clicked),
            Phase::SelectDestination { selected } => self.move_unit(selected, clicked),
            Phase::SelectArrow { selected } => self.shoot_arrow(selected, clicked),
            Phase::GameOver { .. } => ClickOutcome::Ignored(Rejection::GameOver),
        };

        if let ClickOutcome::Ignored(reason) = outcome {
            debug!(%clicked, phase = self.state.phase.name(), %reason, "click ignored");
        }
        outcome
    }

    fn select_unit(&mut self, clicked: Position) -> ClickOutcome {
        let player = self.state.current_player;
        if self.state.board.get(clicked) != Ok(Cell::Owned(player)) {
            return ClickOutcome::Ignored(Rejection::NotOwnUnit);
        }

        debug!(%player, %clicked, "unit selected");
        self.state.phase = Phase::SelectDestination { selected: clicked };
        ClickOutcome::UnitSelected(clicked)
    }

    fn move_unit(&mut self, from: Position, to: Position) -> ClickOutcome {
        if !is_valid_move(&self.state.board, from, to) {
            return ClickOutcome::Ignored(Rejection::IllegalMove);
        }
        if let Err(err) = self.state.board.relocate(from, to) {
            warn!(%err, "validated move could not be applied");
            return ClickOutcome::Ignored(Rejection::IllegalMove);
        }

        debug!(player = %self.state.current_player, %from, %to, "unit moved");
        self.state.phase = Phase::SelectArrow { selected: to };
        ClickOutcome::UnitMoved { from, to }
    }

    fn shoot_arrow(&mut self, from: Position, target: Position) -> ClickOutcome {
        if !is_valid_move(&self.state.board, from, target) {
            return ClickOutcome::Ignored(Rejection::IllegalArrow);
        }
        if let Err(err) = self.state.board.set(target, Cell::Wall) {
            warn!(%err, "validated arrow could not be applied");
            return ClickOutcome::Ignored(Rejection::IllegalArrow);
        }

        self.state.turns += 1;
        self.state.current_player = self.state.current_player.opponent();
        self.state.phase = Phase::SelectUnit;
        info!(
            turn = self.state.turns,
            %target,
            next_player = %self.state.current_player,
            "arrow shot, turn ended"
        );

        let report = self.end_of_turn();
        ClickOutcome::ArrowPlaced { at: target, report }
    }

    /// Win check for the player now to move, then the separation report.
    fn end_of_turn(&mut self) -> TurnReport {
        let board = &self.state.board;
        let next_player = self.state.current_player;

        let next_player_mobility = mobility_count(board, next_player);
        let winner = (next_player_mobility == 0).then(|| next_player.opponent());

        let separation = all_units_separated(board).then(|| SeparationReport::measure(board));

        if let Some(report) = separation {
            info!(
                white_moves = report.white.mobility,
                white_area = report.white.territory,
                black_moves = report.black.mobility,
                black_area = report.black.territory,
                "all units are separated by walls"
            );
            self.state.latest_report = Some(report);
        }

        if let Some(winner) = winner {
            info!(loser = %next_player, %winner, "no valid moves left, game over");
            self.state.phase = Phase::GameOver { winner };
        }

        TurnReport {
            next_player,
            next_player_mobility,
            winner,
            separation,
        }
    }
}
