use crate::tile::Tile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 棋盘边长
pub const BOARD_SIZE: usize = 15;

const TRIPLE_WORD: [(usize, usize); 8] = [
    (0, 0),
    (0, 7),
    (0, 14),
    (7, 0),
    (7, 14),
    (14, 0),
    (14, 7),
    (14, 14),
];

const DOUBLE_WORD: [(usize, usize); 16] = [
    (1, 1),
    (2, 2),
    (3, 3),
    (4, 4),
    (1, 13),
    (2, 12),
    (3, 11),
    (4, 10),
    (10, 4),
    (11, 3),
    (12, 2),
    (13, 1),
    (10, 10),
    (11, 11),
    (12, 12),
    (13, 13),
];

const TRIPLE_LETTER: [(usize, usize); 12] = [
    (1, 5),
    (1, 9),
    (5, 1),
    (5, 5),
    (5, 9),
    (5, 13),
    (9, 1),
    (9, 5),
    (9, 9),
    (9, 13),
    (13, 5),
    (13, 9),
];

const DOUBLE_LETTER: [(usize, usize); 24] = [
    (0, 3),
    (0, 11),
    (2, 6),
    (2, 8),
    (3, 0),
    (3, 7),
    (3, 14),
    (6, 2),
    (6, 6),
    (6, 8),
    (6, 12),
    (7, 3),
    (7, 11),
    (8, 2),
    (8, 6),
    (8, 8),
    (8, 12),
    (11, 0),
    (11, 7),
    (11, 14),
    (12, 6),
    (12, 8),
    (14, 3),
    (14, 11),
];

/// 奖励格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PremiumSquare {
    None,
    #[serde(rename = "DL")]
    DoubleLetter,
    #[serde(rename = "TL")]
    TripleLetter,
    #[serde(rename = "DW")]
    DoubleWord,
    #[serde(rename = "TW")]
    TripleWord,
}

impl PremiumSquare {
    /// 字母倍数
    pub fn letter_multiplier(self) -> u32 {
        match self {
            PremiumSquare::DoubleLetter => 2,
            PremiumSquare::TripleLetter => 3,
            _ => 1,
        }
    }

    /// 单词倍数
    pub fn word_multiplier(self) -> u32 {
        match self {
            PremiumSquare::DoubleWord => 2,
            PremiumSquare::TripleWord => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for PremiumSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PremiumSquare::None => write!(f, "--"),
            PremiumSquare::DoubleLetter => write!(f, "DL"),
            PremiumSquare::TripleLetter => write!(f, "TL"),
            PremiumSquare::DoubleWord => write!(f, "DW"),
            PremiumSquare::TripleWord => write!(f, "TW"),
        }
    }
}

/// 按 TW、DW、TL、DL 的顺序查找奖励格，先命中者生效
pub fn premium_square_at(row: usize, col: usize) -> PremiumSquare {
    let pos = (row, col);
    if TRIPLE_WORD.contains(&pos) {
        PremiumSquare::TripleWord
    } else if DOUBLE_WORD.contains(&pos) {
        PremiumSquare::DoubleWord
    } else if TRIPLE_LETTER.contains(&pos) {
        PremiumSquare::TripleLetter
    } else if DOUBLE_LETTER.contains(&pos) {
        PremiumSquare::DoubleLetter
    } else {
        PremiumSquare::None
    }
}

/// 15x15 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<Tile>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Board {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    pub fn in_bounds(row: usize, col: usize) -> bool {
        row < BOARD_SIZE && col < BOARD_SIZE
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        if Self::in_bounds(row, col) {
            self.cells[row][col]
        } else {
            None
        }
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some()
    }

    /// 放置字母牌，调用方需保证坐标合法且格子为空
    pub(crate) fn place(&mut self, row: usize, col: usize, tile: Tile) {
        self.cells[row][col] = Some(tile);
    }

    /// 棋盘上的牌数
    pub fn tile_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    pub fn rows(&self) -> &[[Option<Tile>; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
