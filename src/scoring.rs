use crate::board::premium_square_at;
use crate::game::Placement;

/// 计算一步棋的得分
///
/// 奖励格只对本回合新放下的牌生效。字母倍数作用于单张牌，
/// 单词倍数累乘后作用于字母分之和。
pub fn calculate_score(placements: &[Placement]) -> u32 {
    let mut letter_total = 0;
    let mut word_multiplier = 1;

    for p in placements {
        let square = premium_square_at(p.row, p.col);
        letter_total += p.tile.score * square.letter_multiplier();
        word_multiplier *= square.word_multiplier();
    }

    letter_total * word_multiplier
}
