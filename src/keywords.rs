//! Keyword tally over the titles of a run, written as a short markdown list.

use std::collections::HashMap;

use crate::aggregate::AggregatedEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCount {
    pub term: String,
    pub count: usize,
}

/// Count lowercased whitespace-separated words across all titles and keep the
/// `top_n` most frequent. Equal counts keep first-seen order.
pub fn tally<'a, I>(titles: I, top_n: usize) -> Vec<KeywordCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<KeywordCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for title in titles {
        for word in title.to_lowercase().split_whitespace() {
            match index.get(word) {
                Some(&pos) => counts[pos].count += 1,
                None => {
                    index.insert(word.to_string(), counts.len());
                    counts.push(KeywordCount {
                        term: word.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(top_n);
    counts
}

pub fn tally_entries(entries: &[AggregatedEntry], top_n: usize) -> Vec<KeywordCount> {
    tally(entries.iter().map(|entry| entry.title.as_str()), top_n)
}

pub fn render(keywords: &[KeywordCount]) -> String {
    let mut out = String::from("# Trending Bug Bounty Keywords\n\n");
    out.push_str("**Most frequent words in this run's feed titles:**\n\n");
    for keyword in keywords {
        out.push_str(&format!("- **{}** ({} titles)\n", keyword.term, keyword.count));
    }
    out
}
