use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// 开局牌袋中的牌总数
pub const TOTAL_TILES: usize = 100;

/// 空白牌的字母
pub const BLANK: char = '*';

/// 字母牌
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub letter: char,
    pub score: u32,
}

impl Tile {
    pub fn new(letter: char, score: u32) -> Self {
        Tile { letter, score }
    }

    pub fn is_blank(&self) -> bool {
        self.letter == BLANK
    }
}

/// 字母分布表: (字母, 分值, 数量)
pub const DISTRIBUTION: [(char, u32, usize); 27] = [
    ('A', 1, 9),
    ('B', 3, 2),
    ('C', 3, 2),
    ('D', 2, 4),
    ('E', 1, 12),
    ('F', 4, 2),
    ('G', 2, 3),
    ('H', 4, 2),
    ('I', 1, 9),
    ('J', 8, 1),
    ('K', 5, 1),
    ('L', 1, 4),
    ('M', 3, 2),
    ('N', 1, 6),
    ('O', 1, 8),
    ('P', 3, 2),
    ('Q', 10, 1),
    ('R', 1, 6),
    ('S', 1, 4),
    ('T', 1, 6),
    ('U', 1, 4),
    ('V', 4, 2),
    ('W', 4, 2),
    ('X', 8, 1),
    ('Y', 4, 2),
    ('Z', 10, 1),
    (BLANK, 0, 2),
];

/// 查询字母的标准分值
pub fn letter_score(letter: char) -> Option<u32> {
    let letter = letter.to_ascii_uppercase();
    DISTRIBUTION
        .iter()
        .find(|(l, _, _)| *l == letter)
        .map(|(_, score, _)| *score)
}

/// 牌袋，只会减少，不会补充
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileBag {
    tiles: Vec<Tile>,
}

impl TileBag {
    /// 按分布表展开并洗牌
    pub fn new() -> Self {
        let mut rng = rand::rng();
        Self::with_rng(&mut rng)
    }

    /// 使用指定随机源创建牌袋
    pub fn with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut tiles = Self::unshuffled();
        tiles.shuffle(rng);
        TileBag { tiles }
    }

    /// 按给定顺序创建牌袋，抽牌从末尾开始
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        TileBag { tiles }
    }

    /// 未洗牌的完整展开
    pub fn unshuffled() -> Vec<Tile> {
        DISTRIBUTION
            .iter()
            .flat_map(|(letter, score, count)| {
                std::iter::repeat_n(Tile::new(*letter, *score), *count)
            })
            .collect()
    }

    /// 抽取最多 n 张牌，不足时返回剩余全部
    pub fn draw(&mut self, n: usize) -> Vec<Tile> {
        let take = n.min(self.tiles.len());
        let mut drawn = self.tiles.split_off(self.tiles.len() - take);
        drawn.reverse();
        drawn
    }

    pub fn remaining(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl Default for TileBag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn multiset(tiles: &[Tile]) -> HashMap<Tile, usize> {
        let mut counts = HashMap::new();
        for tile in tiles {
            *counts.entry(*tile).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_distribution_totals_one_hundred_tiles() {
        let total: usize = DISTRIBUTION.iter().map(|(_, _, count)| count).sum();
        assert_eq!(total, TOTAL_TILES);
        assert_eq!(TileBag::unshuffled().len(), TOTAL_TILES);
    }

    #[test]
    fn test_shuffled_bag_is_permutation_of_distribution() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut bag = TileBag::with_rng(&mut rng);
        assert_eq!(bag.remaining(), TOTAL_TILES);

        let drawn = bag.draw(TOTAL_TILES);
        assert_eq!(multiset(&drawn), multiset(&TileBag::unshuffled()));
    }

    #[test]
    fn test_blanks_score_zero() {
        let blanks: Vec<Tile> = TileBag::unshuffled()
            .into_iter()
            .filter(|t| t.is_blank())
            .collect();
        assert_eq!(blanks.len(), 2);
        assert!(blanks.iter().all(|t| t.score == 0));
    }

    #[test]
    fn test_draw_with_enough_tiles() {
        let mut bag = TileBag::new();
        let drawn = bag.draw(7);
        assert_eq!(drawn.len(), 7);
        assert_eq!(bag.remaining(), TOTAL_TILES - 7);
    }

    #[test]
    fn test_draw_more_than_remaining_empties_bag() {
        let mut bag = TileBag::from_tiles(vec![Tile::new('A', 1), Tile::new('B', 3)]);
        let drawn = bag.draw(7);
        assert_eq!(drawn.len(), 2);
        assert!(bag.is_empty());
        assert!(bag.draw(1).is_empty());
    }

    #[test]
    fn test_draw_takes_from_end() {
        let mut bag = TileBag::from_tiles(vec![
            Tile::new('A', 1),
            Tile::new('B', 3),
            Tile::new('C', 3),
        ]);
        assert_eq!(bag.draw(2), vec![Tile::new('C', 3), Tile::new('B', 3)]);
        assert_eq!(bag.remaining(), 1);
    }

    #[test]
    fn test_letter_score_lookup() {
        assert_eq!(letter_score('q'), Some(10));
        assert_eq!(letter_score('E'), Some(1));
        assert_eq!(letter_score(BLANK), Some(0));
        assert_eq!(letter_score('1'), None);
    }
}
