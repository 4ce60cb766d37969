use once_cell::sync::Lazy;
use regex::Regex;

use super::HierarchyLevelStrategy;
use crate::error::Result;
use crate::models::{HierarchyLevel, LineWithMeta, ParagraphType};

static CHAPTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(статья|пункт|параграф|глава|определение)\s*([0-9]+\.)*([0-9]+\.?)")
        .expect("Invalid chapter regex")
});
static DOTTED_NUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+\.)+([0-9]+\.?)?(\s|$)").expect("Invalid dotted number regex"));
static DOTTED_WITHOUT_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.[a-z]").expect("Invalid dotted letter regex"));
static BRACKET_NUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\)").expect("Invalid bracket number regex"));
static LETTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(([а-я]|[a-z])\))").expect("Invalid letter item regex"));

/// Numbers above this in a dotted item are years, not list numbers.
const MAX_ITEM_NUMBER: f64 = 1900.0;
/// Longer numbering tokens are almost never list items.
const MAX_NUMBERING_LEN: usize = 9;

/// Regex-based level assignment for legal texts and numbered lists.
///
/// | Line starts with                       | Level         | Type         |
/// |----------------------------------------|---------------|--------------|
/// | глава / статья / пункт / параграф + N  | (1, 1..4)     | named_header |
/// | a header tag                           | (1, depth)    | named_header |
/// | `1.2.3`                                | (2, depth)    | list_item    |
/// | `1)`                                   | (3, depth)    | list_item    |
/// | `a)` / `а)`                            | (4, 1)        | list_item    |
///
/// Anything else is raw text. A line keeps a level it already has unless
/// the extractor found a structured one.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternLevelExtractor;

impl PatternLevelExtractor {
    pub fn new() -> Self {
        Self
    }

    fn line_level(&self, line: &LineWithMeta, previous_text: Option<&str>) -> HierarchyLevel {
        let lowered = line.line().to_lowercase();
        let text = lowered.trim();

        if CHAPTER.is_match(text) {
            return named_level(text);
        }

        if let Some(tag) = &line.metadata().tag_hierarchy_level
            && tag.paragraph_type() == &ParagraphType::Header
        {
            let depth = tag
                .level_2()
                .map(|l| l.value())
                .filter(|&d| d > 0)
                .or_else(|| dotted_depth(text))
                .unwrap_or(1);
            return HierarchyLevel::new(1, depth, true, ParagraphType::NamedHeader);
        }

        list_level(text, previous_text)
    }
}

impl HierarchyLevelStrategy for PatternLevelExtractor {
    fn assign(&self, lines: Vec<LineWithMeta>) -> Result<Vec<LineWithMeta>> {
        let mut previous_text: Option<String> = None;
        let mut result = Vec::with_capacity(lines.len());

        for mut line in lines {
            let extracted = self.line_level(&line, previous_text.as_deref());
            let level = match line.hierarchy_level() {
                Some(current) if extracted.level_1().is_none() => current.clone(),
                _ => extracted,
            };
            if !level.is_raw_text() {
                previous_text = Some(line.line().to_string());
            }
            line.set_hierarchy_level(level);
            result.push(line);
        }

        Ok(result)
    }
}

fn named_level(text: &str) -> HierarchyLevel {
    let level_2 = if text.starts_with("глава") {
        1
    } else if text.starts_with("статья") {
        2
    } else if text.starts_with("пункт") {
        3
    } else if text.starts_with("параграф") {
        4
    } else {
        return HierarchyLevel::raw_text();
    };
    HierarchyLevel::new(1, level_2, false, ParagraphType::NamedHeader)
}

/// Depth of a dotted numbering prefix: `1.2.3 text` is 3.
fn dotted_depth(text: &str) -> Option<u32> {
    let plausible = |n: &str| n.parse::<f64>().is_ok_and(|v| v <= MAX_ITEM_NUMBER);

    if DOTTED_NUM.is_match(text) {
        let first = text.split_whitespace().next()?;
        let parts: Vec<&str> = first.split('.').filter(|n| !n.is_empty()).collect();
        let is_item = first.chars().count() <= MAX_NUMBERING_LEN && parts.iter().all(|n| plausible(n));
        return is_item.then_some(parts.len() as u32);
    }
    if DOTTED_WITHOUT_SPACE.is_match(text) {
        let head = text.split('.').next()?;
        return plausible(head).then_some(1);
    }
    None
}

fn list_level(text: &str, previous_text: Option<&str>) -> HierarchyLevel {
    if let Some(depth) = dotted_depth(text) {
        return HierarchyLevel::new(2, depth, false, ParagraphType::ListItem);
    }

    if BRACKET_NUM.is_match(text) {
        let first = text.split_whitespace().next().unwrap_or_default();
        // OCR reads the Cyrillic "б)" after "а)" as "6)"
        let after_letter_item = previous_text.is_some_and(|p| {
            let p = p.trim();
            p.starts_with("a)") || p.starts_with("а)")
        });
        if first == "6)" && after_letter_item {
            return HierarchyLevel::new(4, 1, false, ParagraphType::ListItem);
        }
        let depth = first.split('.').filter(|n| !n.is_empty()).count() as u32;
        return HierarchyLevel::new(3, depth, false, ParagraphType::ListItem);
    }

    if LETTER.is_match(text) {
        return HierarchyLevel::new(4, 1, false, ParagraphType::ListItem);
    }

    HierarchyLevel::raw_text()
}
