//! Splitting extracted text into per-slip blocks and cleaning up lines.

use super::fields::tag_field;
use super::patterns::{DARF_HEADING, DOT_LEADER, NAME_FIELD_MARKER, SPACE_BEFORE_COLON, WHITESPACE_RUN};

/// How the text was split into slips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitStrategy {
    /// One block per "Documento de Arrecadação" / "DARF" heading.
    Headings,
    /// One block per "01 NOME" field marker.
    NameMarkers,
    /// The whole text is one block.
    Whole,
}

/// Text split into candidate slip blocks.
#[derive(Debug, Clone)]
pub struct Segmentation<'a> {
    pub strategy: SplitStrategy,
    pub blocks: Vec<&'a str>,
}

/// Split text into candidate slip blocks.
///
/// Headings are tried first; with fewer than two headings the text is split
/// at "01 NOME" markers (when `fallback` is set), keeping only fragments that
/// contain a numbered field. Otherwise the whole text is a single block.
pub fn segment_blocks(text: &str, fallback: bool) -> Segmentation<'_> {
    if DARF_HEADING.find_iter(text).count() > 1 {
        let blocks = DARF_HEADING
            .split(text)
            .filter(|b| !b.trim().is_empty())
            .collect();
        return Segmentation {
            strategy: SplitStrategy::Headings,
            blocks,
        };
    }

    if fallback {
        // Cutting at match starts keeps each "01 NOME" marker with its fragment
        let mut cuts: Vec<usize> = NAME_FIELD_MARKER.find_iter(text).map(|m| m.start()).collect();
        if cuts.first() != Some(&0) {
            cuts.insert(0, 0);
        }
        cuts.push(text.len());

        let blocks: Vec<&str> = cuts
            .windows(2)
            .map(|w| &text[w[0]..w[1]])
            .filter(|fragment| has_field_code(fragment))
            .collect();

        if blocks.len() > 1 {
            return Segmentation {
                strategy: SplitStrategy::NameMarkers,
                blocks,
            };
        }
    }

    Segmentation {
        strategy: SplitStrategy::Whole,
        blocks: vec![text],
    }
}

/// Whether any line of the fragment is a recognized numbered field.
fn has_field_code(fragment: &str) -> bool {
    fragment
        .lines()
        .map(normalize_line)
        .any(|line| tag_field(&line).is_some())
}

/// Clean up one line of extracted text.
///
/// Dot leaders and whitespace runs become a single space, a space before a
/// colon is dropped and the result is trimmed.
pub fn normalize_line(line: &str) -> String {
    let line = DOT_LEADER.replace_all(line, " ");
    let line = WHITESPACE_RUN.replace_all(&line, " ");
    let line = SPACE_BEFORE_COLON.replace_all(&line, ":");
    line.trim().to_string()
}

/// Normalized, non-empty lines of a block.
pub fn normalize_block(block: &str) -> Vec<String> {
    block
        .lines()
        .map(normalize_line)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_line() {
        assert_eq!(
            normalize_line("  07   VALOR DO PRINCIPAL ........ 1.500,00  "),
            "07 VALOR DO PRINCIPAL 1.500,00"
        );
        assert_eq!(normalize_line("01 NOME   :  ACME"), "01 NOME: ACME");
        assert_eq!(normalize_line("\t\u{a0} "), "");
        assert_eq!(normalize_line("1.500,00"), "1.500,00");
    }

    #[test]
    fn test_normalize_block_drops_empty_lines() {
        let lines = normalize_block("01 NOME: ACME\n\n   \n10 VALOR TOTAL 5,00\n");
        assert_eq!(lines, vec!["01 NOME: ACME", "10 VALOR TOTAL 5,00"]);
    }

    #[test]
    fn test_split_on_headings() {
        let text = "Ministério da Fazenda\nDARF\n01 NOME: A\nDocumento de Arrecadação de Receitas Federais\n01 NOME: B\n";
        let seg = segment_blocks(text, true);

        assert_eq!(seg.strategy, SplitStrategy::Headings);
        assert_eq!(seg.blocks.len(), 3);
        assert!(seg.blocks[1].contains("01 NOME: A"));
        assert!(seg.blocks[2].contains("01 NOME: B"));
    }

    #[test]
    fn test_heading_match_is_case_insensitive() {
        let text = "darf\n01 NOME: A\nDOCUMENTO DE ARRECADACAO\n01 NOME: B";
        assert_eq!(segment_blocks(text, true).strategy, SplitStrategy::Headings);
    }

    #[test]
    fn test_heading_must_start_line() {
        let text = "pague este DARF até\n01 NOME: A\n10 VALOR TOTAL 1,00\nveja o DARF";
        assert_eq!(segment_blocks(text, false).strategy, SplitStrategy::Whole);
    }

    #[test]
    fn test_fallback_split_reattaches_marker() {
        let text = "Receita Federal\n01 NOME: A\n10 VALOR TOTAL 1,00\n01 NOME: B\n10 VALOR TOTAL 2,00\n";
        let seg = segment_blocks(text, true);

        assert_eq!(seg.strategy, SplitStrategy::NameMarkers);
        assert_eq!(seg.blocks.len(), 2);
        assert!(seg.blocks[0].starts_with("01 NOME: A"));
        assert!(seg.blocks[1].starts_with("01 NOME: B"));
    }

    #[test]
    fn test_fallback_disabled_keeps_whole_text() {
        let text = "01 NOME: A\n10 VALOR TOTAL 1,00\n01 NOME: B\n10 VALOR TOTAL 2,00\n";
        let seg = segment_blocks(text, false);

        assert_eq!(seg.strategy, SplitStrategy::Whole);
        assert_eq!(seg.blocks, vec![text]);
    }

    #[test]
    fn test_single_slip_is_whole_text() {
        let text = "DARF\n01 NOME: A\n10 VALOR TOTAL 1,00";
        let seg = segment_blocks(text, true);

        assert_eq!(seg.strategy, SplitStrategy::Whole);
        assert_eq!(seg.blocks.len(), 1);
    }
}
