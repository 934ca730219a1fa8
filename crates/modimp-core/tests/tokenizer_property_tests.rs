//! Property tests for the directive tokenizer

use modimp_core::directive::tokenize;
use proptest::prelude::*;

fn plain_line() -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Za-z0-9_./-]{1,8}", 0..6).prop_flat_map(|words| {
        let gaps = prop::collection::vec("[ \t]{1,3}", words.len());
        (Just(words), gaps)
    })
    .prop_map(|(words, gaps)| {
        words
            .iter()
            .zip(gaps)
            .map(|(word, gap)| format!("{gap}{word}"))
            .collect::<String>()
    })
}

proptest! {
    #[test]
    fn plain_text_keeps_physical_lines_and_words(lines in prop::collection::vec(plain_line(), 1..8)) {
        let text = lines.join("\n");
        let tokens = tokenize(&text);

        prop_assert_eq!(tokens.len(), lines.len());
        for (line, tokens) in lines.iter().zip(&tokens) {
            let words: Vec<String> = line.split_whitespace().map(str::to_string).collect();
            prop_assert_eq!(tokens, &words);
        }
    }

    #[test]
    fn quoted_text_survives_verbatim(inner in "[^\"\n]{1,20}") {
        let tokens = tokenize(&format!("Import \"{inner}\""));
        prop_assert_eq!(tokens, vec![vec!["Import".to_string(), inner]]);
    }
}
