//! Paragraph reflow.
//!
//! Converted text arrives wrapped at a fixed column with no semantic
//! paragraph markup left. Joining is a heuristic over line-length
//! statistics: a line of 5 to 100 words reads as a wrapped prose fragment
//! and fuses with its neighbours, while anything shorter or longer
//! (headings, footnote markers, blank separators, oddball lines) stands
//! alone between blank lines. Best effort, not a guarantee.

/// Lines with fewer words than this are standalone blocks.
const MIN_PROSE_WORDS: usize = 5;
/// Lines with more words than this are standalone blocks.
const MAX_PROSE_WORDS: usize = 100;

/// Rejoins wrapped prose lines into single-line paragraphs.
///
/// Lines are classified independently and rejoined with single spaces;
/// standalone blocks carry their own leading and trailing newline, which
/// keeps them separated by blank lines in the result.
pub fn reflow(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if is_prose_fragment(line) {
                line.to_string()
            } else {
                format!("\n{}\n", line)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Word counting uses Unicode whitespace segmentation, not ASCII spaces.
fn is_prose_fragment(line: &str) -> bool {
    let words = line.split_whitespace().count();
    (MIN_PROSE_WORDS..=MAX_PROSE_WORDS).contains(&words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_word_lines_join_with_their_neighbours() {
        let text = "one two three four five\nsix seven eight nine ten";
        assert_eq!(reflow(text), "one two three four five six seven eight nine ten");
    }

    #[test]
    fn four_word_lines_stand_alone() {
        let text = "just four words here";
        assert_eq!(reflow(text), "\njust four words here\n");
    }

    #[test]
    fn boundary_is_inclusive_at_five() {
        assert!(is_prose_fragment("a b c d e"));
        assert!(!is_prose_fragment("a b c d"));
    }

    #[test]
    fn boundary_is_inclusive_at_one_hundred() {
        let hundred = vec!["w"; 100].join(" ");
        let hundred_one = vec!["w"; 101].join(" ");
        assert!(is_prose_fragment(&hundred));
        assert!(!is_prose_fragment(&hundred_one));
    }

    #[test]
    fn overlong_lines_stand_alone() {
        let long_line = vec!["w"; 101].join(" ");
        let text = format!("a normal prose line of six words\n{}", long_line);
        let result = reflow(&text);
        assert!(result.starts_with("a normal prose line of six words \n"));
        assert!(result.ends_with(&format!("\n{}\n", long_line)));
    }

    #[test]
    fn blank_lines_keep_paragraphs_apart() {
        let text = "first paragraph with five words\n\nsecond paragraph with five words";
        let result = reflow(&text);
        assert_eq!(
            result,
            "first paragraph with five words \n\n second paragraph with five words"
        );
    }

    #[test]
    fn unicode_whitespace_counts_as_a_separator() {
        // Ideographic spaces between words still yield five tokens.
        let text = "one\u{3000}two\u{3000}three\u{3000}four\u{3000}five";
        assert!(is_prose_fragment(text));
    }
}
