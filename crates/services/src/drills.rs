//! Content generators for the mini-games: letter scrambles, color
//! sequences, card decks, vocabulary draws.
//!
//! Everything is generic over the RNG so tests can seed a `StdRng`; game
//! code passes `rand::rng()`.

use rand::Rng;
use rand::seq::SliceRandom;

/// Shuffle a word's letters so the result differs from the input.
///
/// Single-letter words and words whose letters are all identical cannot be
/// scrambled and are returned unchanged. Retries are bounded; with distinct
/// letters the chance of exhausting them is negligible.
pub fn scramble_word<R: Rng + ?Sized>(rng: &mut R, word: &str) -> String {
    let mut letters: Vec<char> = word.chars().collect();
    if letters.len() < 2 || letters.iter().all(|&c| c == letters[0]) {
        return word.to_owned();
    }

    for _ in 0..16 {
        letters.shuffle(rng);
        let scrambled: String = letters.iter().collect();
        if scrambled != word {
            return scrambled;
        }
    }
    letters.iter().collect()
}

/// Replace `blanks` distinct letters of `word` with underscores.
///
/// More blanks than letters blanks the whole word.
pub fn blank_out<R: Rng + ?Sized>(rng: &mut R, word: &str, blanks: usize) -> String {
    let mut letters: Vec<char> = word.chars().collect();
    let mut positions: Vec<usize> = (0..letters.len()).collect();
    positions.shuffle(rng);
    for &pos in positions.iter().take(blanks) {
        letters[pos] = '_';
    }
    letters.iter().collect()
}

/// Random pattern of `len` indices into a palette of `palette` colors.
pub fn color_sequence<R: Rng + ?Sized>(rng: &mut R, len: usize, palette: usize) -> Vec<usize> {
    if palette == 0 {
        return Vec::new();
    }
    (0..len).map(|_| rng.random_range(0..palette)).collect()
}

/// Duplicated, shuffled deck for the memory matching game.
pub fn pair_deck<R: Rng + ?Sized, T: Clone>(rng: &mut R, symbols: &[T]) -> Vec<T> {
    let mut deck: Vec<T> = symbols.iter().chain(symbols.iter()).cloned().collect();
    deck.shuffle(rng);
    deck
}

/// Draw up to `n` items without replacement, in random order.
pub fn pick_random<R: Rng + ?Sized, T: Clone>(rng: &mut R, items: &[T], n: usize) -> Vec<T> {
    let mut pool: Vec<T> = items.to_vec();
    pool.shuffle(rng);
    pool.truncate(n);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(17)
    }

    #[test]
    fn scramble_is_a_permutation_that_differs() {
        let mut rng = rng();
        for word in ["orange", "bicycle", "tea", "mountain"] {
            let scrambled = scramble_word(&mut rng, word);
            assert_ne!(scrambled, word);

            let mut expected: Vec<char> = word.chars().collect();
            let mut actual: Vec<char> = scrambled.chars().collect();
            expected.sort_unstable();
            actual.sort_unstable();
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn unscrambleable_words_pass_through() {
        let mut rng = rng();
        assert_eq!(scramble_word(&mut rng, "a"), "a");
        assert_eq!(scramble_word(&mut rng, "aaa"), "aaa");
        assert_eq!(scramble_word(&mut rng, ""), "");
    }

    #[test]
    fn blank_out_hides_exactly_n_letters() {
        let mut rng = rng();
        let blanked = blank_out(&mut rng, "elephant", 3);
        assert_eq!(blanked.chars().filter(|&c| c == '_').count(), 3);
        assert_eq!(blanked.len(), "elephant".len());
    }

    #[test]
    fn blank_out_saturates_at_word_length() {
        let mut rng = rng();
        assert_eq!(blank_out(&mut rng, "cat", 10), "___");
    }

    #[test]
    fn color_sequence_stays_in_palette() {
        let mut rng = rng();
        let seq = color_sequence(&mut rng, 12, 4);
        assert_eq!(seq.len(), 12);
        assert!(seq.iter().all(|&c| c < 4));
        assert!(color_sequence(&mut rng, 5, 0).is_empty());
    }

    #[test]
    fn pair_deck_holds_every_symbol_twice() {
        let mut rng = rng();
        let deck = pair_deck(&mut rng, &["🐶", "🐱", "🐰", "🦊"]);
        assert_eq!(deck.len(), 8);
        for symbol in ["🐶", "🐱", "🐰", "🦊"] {
            assert_eq!(deck.iter().filter(|&&s| s == symbol).count(), 2);
        }
    }

    #[test]
    fn pick_random_draws_distinct_items() {
        let mut rng = rng();
        let pool: Vec<u32> = (0..20).collect();
        let picked = pick_random(&mut rng, &pool, 8);
        assert_eq!(picked.len(), 8);
        let unique: std::collections::HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 8);

        assert_eq!(pick_random(&mut rng, &pool, 50).len(), 20);
    }
}
