//! Compiled, immutable translation table used by the codec.

use std::collections::HashMap;

use super::definition::TableDefinition;
use crate::domain::cell::{BrailleCell, DotWidth};

/// Built-in fallback mapping (a small UEB grade 1 sketch: `a`–`j` and space).
const DEFAULT_ENTRIES: &[(&str, &[u8])] = &[
    ("a", &[1]),
    ("b", &[1, 2]),
    ("c", &[1, 4]),
    ("d", &[1, 4, 5]),
    ("e", &[1, 5]),
    ("f", &[1, 2, 4]),
    ("g", &[1, 2, 4, 5]),
    ("h", &[1, 2, 5]),
    ("i", &[2, 4]),
    ("j", &[2, 4, 5]),
    (" ", &[]),
];

/// Token ⇄ cell mapping prepared for greedy matching and reverse lookup.
///
/// Built once and never mutated; share it behind an `Arc` if several
/// translators need it.
#[derive(Debug, Clone)]
pub struct TranslationTable {
    width: DotWidth,
    /// Tokens and their cells, in declaration order.
    entries: Vec<(String, BrailleCell)>,
    /// Indices into `entries`, longest token first; equal lengths keep declaration order.
    by_length: Vec<usize>,
    /// Dot mask → index of the first token declared with that pattern.
    reverse: HashMap<u8, usize>,
}

impl TranslationTable {
    /// Compiles a validated definition.
    ///
    /// An empty definition compiles to the built-in default entries at the
    /// definition's declared width.
    pub fn from_definition(def: &TableDefinition) -> Self {
        let width = def.width();
        let entries: Vec<(String, BrailleCell)> = if def.is_empty() {
            DEFAULT_ENTRIES
                .iter()
                .map(|(token, dots)| (token.to_string(), cell_or_blank(width, dots)))
                .collect()
        } else {
            def.entries()
                .iter()
                .map(|e| (e.token.clone(), cell_or_blank(width, &e.dots)))
                .collect()
        };
        Self::compile(width, entries)
    }

    /// The built-in six-dot default table.
    pub fn builtin() -> Self {
        Self::from_definition(&TableDefinition::empty())
    }

    fn compile(width: DotWidth, entries: Vec<(String, BrailleCell)>) -> Self {
        let mut by_length: Vec<usize> = (0..entries.len()).collect();
        // `sort_by_key` is stable, so ties keep declaration order.
        by_length.sort_by_key(|&i| std::cmp::Reverse(entries[i].0.chars().count()));

        let mut reverse = HashMap::with_capacity(entries.len());
        for (i, (_, cell)) in entries.iter().enumerate() {
            reverse.entry(cell.mask()).or_insert(i);
        }

        Self {
            width,
            entries,
            by_length,
            reverse,
        }
    }

    pub fn width(&self) -> DotWidth {
        self.width
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tokens in declaration order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    /// Finds the longest token that prefixes `text`, ignoring case.
    ///
    /// Case is folded one character of `text` at a time, and a token must
    /// cover whole characters.  Returns the number of bytes of `text` the
    /// match consumed and the token's cell.
    pub fn longest_match(&self, text: &str) -> Option<(usize, BrailleCell)> {
        self.by_length.iter().find_map(|&i| {
            let (token, cell) = &self.entries[i];
            folded_prefix_len(token, text).map(|consumed| (consumed, *cell))
        })
    }

    /// Cell for an exact (case-insensitive) token.
    pub fn cell_for(&self, token: &str) -> Option<BrailleCell> {
        let token = token.to_lowercase();
        self.entries
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, cell)| *cell)
    }

    /// Token whose dot pattern equals `cell`'s, first declared wins.
    pub fn token_for(&self, cell: &BrailleCell) -> Option<&str> {
        self.reverse
            .get(&cell.mask())
            .map(|&i| self.entries[i].0.as_str())
    }
}

impl Default for TranslationTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Bytes of `text` whose lower-cased characters spell exactly `token`.
fn folded_prefix_len(token: &str, text: &str) -> Option<usize> {
    let mut want = token.chars().peekable();
    let mut consumed = 0;
    for c in text.chars() {
        if want.peek().is_none() {
            break;
        }
        for folded in c.to_lowercase() {
            if want.next() != Some(folded) {
                return None;
            }
        }
        consumed += c.len_utf8();
    }
    want.peek().is_none().then_some(consumed)
}

/// Definitions are validated against their width, so this only guards the
/// default entries compiled at a foreign width.
fn cell_or_blank(width: DotWidth, dots: &[u8]) -> BrailleCell {
    BrailleCell::from_dot_numbers(width, dots).unwrap_or_else(|_| BrailleCell::empty(width))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: Vec<(&str, Vec<u64>)>) -> TranslationTable {
        TranslationTable::from_definition(&TableDefinition::new(DotWidth::Six, entries).unwrap())
    }

    #[test]
    fn test_builtin_covers_a_to_j_and_space() {
        let t = TranslationTable::builtin();
        assert_eq!(t.len(), 11);
        assert_eq!(t.width(), DotWidth::Six);
        assert_eq!(t.cell_for("A").unwrap().dot_numbers(), vec![1]);
        assert!(t.cell_for(" ").unwrap().is_blank());
        assert!(t.cell_for("k").is_none());
    }

    #[test]
    fn test_empty_definition_keeps_declared_width() {
        let def = TableDefinition::new(DotWidth::Eight, Vec::<(&str, Vec<u64>)>::new()).unwrap();
        let t = TranslationTable::from_definition(&def);
        assert_eq!(t.width(), DotWidth::Eight);
        assert_eq!(t.cell_for("a").unwrap().width(), DotWidth::Eight);
    }

    #[test]
    fn test_longest_match_prefers_longer_token() {
        // Arrange
        let t = table(vec![("a", vec![1]), ("and", vec![1, 2, 3, 4, 6])]);

        // Act
        let (len, cell) = t.longest_match("andy").unwrap();

        // Assert
        assert_eq!(len, 3);
        assert_eq!(cell.dot_numbers(), vec![1, 2, 3, 4, 6]);
    }

    #[test]
    fn test_longest_match_ties_go_to_first_declared() {
        let t = table(vec![("ab", vec![1]), ("ab ", vec![2]), ("ac", vec![3])]);
        let (_, cell) = t.longest_match("ab").unwrap();
        assert_eq!(cell.dot_numbers(), vec![1]);

        let t = table(vec![("xa", vec![4]), ("xb", vec![5]), ("x", vec![6])]);
        assert_eq!(t.longest_match("xb").unwrap().1.dot_numbers(), vec![5]);
    }

    #[test]
    fn test_longest_match_folds_case_per_character() {
        let t = table(vec![("a", vec![1]), ("and", vec![1, 2, 3, 4, 6])]);

        let (len, cell) = t.longest_match("ANDy").unwrap();

        assert_eq!(len, 3);
        assert_eq!(cell.dot_numbers(), vec![1, 2, 3, 4, 6]);
    }

    #[test]
    fn test_longest_match_never_splits_a_folded_character() {
        // U+0130 lower-cases to "i" plus a combining dot.
        let t = table(vec![("i", vec![2, 4])]);
        assert!(t.longest_match("\u{130}").is_none());
        assert_eq!(t.longest_match("Ii").unwrap().0, 1);
    }

    #[test]
    fn test_longest_match_none_for_unknown_prefix() {
        let t = table(vec![("a", vec![1])]);
        assert!(t.longest_match("@a").is_none());
    }

    #[test]
    fn test_reverse_lookup_first_declared_wins() {
        let t = table(vec![("x", vec![1]), ("y", vec![1])]);
        let cell = BrailleCell::from_dot_numbers(DotWidth::Six, &[1]).unwrap();
        assert_eq!(t.token_for(&cell), Some("x"));
    }

    #[test]
    fn test_reverse_lookup_misses_unknown_pattern() {
        let t = TranslationTable::builtin();
        let cell = BrailleCell::from_dot_numbers(DotWidth::Six, &[6]).unwrap();
        assert_eq!(t.token_for(&cell), None);
    }
}
