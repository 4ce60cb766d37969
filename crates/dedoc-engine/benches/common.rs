// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use dedoc_engine::{Annotation, LineWithMeta, UnstructuredDocument};

/// `count` words of four letters separated by single spaces.
#[allow(dead_code)]
pub fn words(count: usize) -> String {
    vec!["word"; count].join(" ")
}

/// One bold annotation per word, all mergeable into a single span.
#[allow(dead_code)]
pub fn bold_per_word(count: usize) -> Vec<Annotation> {
    (0..count)
        .map(|i| Annotation::bold(i * 5, i * 5 + 4).unwrap())
        .collect()
}

/// One size annotation per word, alternating values so nothing merges.
#[allow(dead_code)]
pub fn alternating_sizes(count: usize) -> Vec<Annotation> {
    (0..count)
        .map(|i| Annotation::size(i * 5, i * 5 + 4, if i % 2 == 0 { 10.0 } else { 12.0 }).unwrap())
        .collect()
}

/// A legal text with `chapters` chapters, each with articles and nested lists.
#[allow(dead_code)]
pub fn legal_document(chapters: usize) -> UnstructuredDocument {
    let mut lines = vec![LineWithMeta::from_text("Договор поставки")];
    for chapter in 1..=chapters {
        lines.push(LineWithMeta::from_text(format!("Глава {chapter}")));
        for article in 1..=3 {
            lines.push(LineWithMeta::from_text(format!("Статья {article}")));
            lines.push(LineWithMeta::from_text("Текст статьи с пояснениями."));
            for item in 1..=3 {
                lines.push(LineWithMeta::from_text(format!("{chapter}.{article}.{item}. Пункт")));
                lines.push(LineWithMeta::from_text("а) подпункт"));
                lines.push(LineWithMeta::from_text("б) подпункт"));
            }
        }
    }
    UnstructuredDocument::new(lines, Vec::new())
}
