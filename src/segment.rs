use tracing::debug;

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Greedily packs `blocks` into slides of at most `word_budget` words.
///
/// Blocks are never split. A block that does not fit next to its
/// predecessors opens a new slide, even if it alone exceeds the budget.
pub fn segment<S: AsRef<str>>(blocks: &[S], word_budget: usize) -> Vec<String> {
    let mut slides = Vec::new();
    let mut buf: Vec<&str> = Vec::new();
    let mut count = 0;

    for block in blocks {
        let block = block.as_ref();
        let words = word_count(block);
        if count + words <= word_budget {
            buf.push(block);
            count += words;
        } else {
            if !buf.is_empty() {
                slides.push(buf.join(" "));
            }
            buf = vec![block];
            count = words;
        }
    }
    if !buf.is_empty() {
        slides.push(buf.join(" "));
    }

    debug!("Packed {} blocks into {} slides", blocks.len(), slides.len());
    slides
}
