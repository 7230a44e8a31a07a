//! Okapi BM25 keyword index, the sparse half of the corpus index.
//!
//! Documents and queries are tokenized on whitespace only, with no case
//! folding or stemming, so lexical matches are exact. Terms that appear in
//! more than half the corpus would get a negative IDF; those are floored at
//! `epsilon * mean_idf` instead.

use std::collections::HashMap;

use crate::config::Bm25Params;

/// A term occurrence count within one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Posting {
    position: usize,
    term_frequency: u32,
}

/// An inverted BM25 index over a chunk sequence.
#[derive(Debug, Clone)]
pub struct Bm25Index {
    params: Bm25Params,
    postings: HashMap<String, Vec<Posting>>,
    idf: HashMap<String, f32>,
    doc_lengths: Vec<usize>,
    avg_doc_length: f32,
}

impl Bm25Index {
    /// Build the index over `texts`; position `i` in every result refers to `texts[i]`.
    pub fn build<'a, I>(texts: I, params: Bm25Params) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
        let mut doc_lengths = Vec::new();

        for (position, text) in texts.into_iter().enumerate() {
            let mut frequencies: HashMap<&str, u32> = HashMap::new();
            let mut length = 0;
            for token in text.split_whitespace() {
                *frequencies.entry(token).or_default() += 1;
                length += 1;
            }
            doc_lengths.push(length);
            for (token, term_frequency) in frequencies {
                postings
                    .entry(token.to_string())
                    .or_default()
                    .push(Posting { position, term_frequency });
            }
        }

        // Postings were filled from a HashMap per document; keep each list in
        // corpus order for deterministic iteration.
        for list in postings.values_mut() {
            list.sort_by_key(|p| p.position);
        }

        let corpus_size = doc_lengths.len();
        let avg_doc_length = if corpus_size == 0 {
            0.0
        } else {
            doc_lengths.iter().sum::<usize>() as f32 / corpus_size as f32
        };
        let idf = compute_idf(&postings, corpus_size, params.epsilon);

        Self { params, postings, idf, doc_lengths, avg_doc_length }
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.doc_lengths.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.doc_lengths.is_empty()
    }

    /// Number of distinct terms.
    pub fn vocabulary_size(&self) -> usize {
        self.postings.len()
    }

    /// BM25 score of every indexed chunk for a whitespace-tokenized query.
    ///
    /// Repeated query tokens contribute once per occurrence; unknown tokens
    /// contribute nothing.
    pub fn scores(&self, query: &str) -> Vec<f32> {
        let mut scores = vec![0.0f32; self.len()];
        if self.avg_doc_length == 0.0 {
            return scores;
        }

        let Bm25Params { k1, b, .. } = self.params;
        for token in query.split_whitespace() {
            let (Some(list), Some(idf)) = (self.postings.get(token), self.idf.get(token)) else {
                continue;
            };
            for posting in list {
                let tf = posting.term_frequency as f32;
                let length_ratio = self.doc_lengths[posting.position] as f32 / self.avg_doc_length;
                scores[posting.position] +=
                    idf * (tf * (k1 + 1.0)) / (tf + k1 * (1.0 - b + b * length_ratio));
            }
        }
        scores
    }

    /// Positions of the `top_k` highest-scoring chunks.
    ///
    /// Ties are broken by corpus order. Every chunk is a candidate, so a
    /// non-empty index always yields `min(top_k, len)` positions even when
    /// nothing matches.
    pub fn top_k(&self, query: &str, top_k: usize) -> Vec<usize> {
        let scores = self.scores(query);
        let mut positions: Vec<usize> = (0..scores.len()).collect();
        // Stable sort keeps ascending position among equal scores.
        positions.sort_by(|a, b| {
            scores[*b].partial_cmp(&scores[*a]).unwrap_or(std::cmp::Ordering::Equal)
        });
        positions.truncate(top_k);
        positions
    }
}

fn compute_idf(
    postings: &HashMap<String, Vec<Posting>>,
    corpus_size: usize,
    epsilon: f32,
) -> HashMap<String, f32> {
    let n = corpus_size as f32;
    let mut idf = HashMap::with_capacity(postings.len());
    let mut idf_sum = 0.0f32;
    let mut negative = Vec::new();

    // Summed in term order so the floor is identical across rebuilds.
    let mut terms: Vec<_> = postings.iter().collect();
    terms.sort_unstable_by(|a, b| a.0.cmp(b.0));

    for (term, list) in terms {
        let doc_freq = list.len() as f32;
        let value = ((n - doc_freq + 0.5) / (doc_freq + 0.5)).ln();
        idf_sum += value;
        if value < 0.0 {
            negative.push(term.clone());
        }
        idf.insert(term.clone(), value);
    }

    if !postings.is_empty() {
        let floor = epsilon * idf_sum / postings.len() as f32;
        for term in negative {
            idf.insert(term, floor);
        }
    }
    idf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(texts: &[&str]) -> Bm25Index {
        Bm25Index::build(texts.iter().copied(), Bm25Params::default())
    }

    #[test]
    fn ranks_documents_containing_query_terms_first() {
        let idx = index(&[
            "Unity game developer",
            "Data Analyst SQL Python",
            "Java backend engineer",
            "Frontend React developer",
        ]);
        assert_eq!(idx.top_k("SQL", 1), vec![1]);
    }

    #[test]
    fn tokenization_is_case_sensitive() {
        let idx = index(&["python scripting", "Python developer", "Go developer"]);
        let scores = idx.scores("Python");
        assert_eq!(scores[0], 0.0);
        assert!(scores[1] > 0.0);
    }

    #[test]
    fn term_frequency_raises_score() {
        let idx = index(&[
            "SQL SQL reports",
            "SQL dashboards x",
            "Java services y",
            "Rust tools z",
            "Go apis w",
            "C# games v",
        ]);
        let scores = idx.scores("SQL");
        assert!(scores[0] > scores[1]);
    }

    #[test]
    fn ties_are_broken_by_corpus_order() {
        let idx = index(&["alpha", "beta", "gamma", "delta"]);
        assert_eq!(idx.top_k("missing", 3), vec![0, 1, 2]);
    }

    #[test]
    fn common_terms_get_a_positive_floor() {
        let idx = index(&["sql a", "sql b", "sql c", "python d"]);
        let scores = idx.scores("sql");
        assert!(scores[0] > 0.0);
        assert_eq!(scores[3], 0.0);
    }

    #[test]
    fn rebuilding_yields_bitwise_identical_scores() {
        let texts: Vec<String> =
            (0..40).map(|i| format!("common shared term{i} extra{}", i % 7)).collect();
        let build = || Bm25Index::build(texts.iter().map(String::as_str), Bm25Params::default());
        let expected: Vec<u32> =
            build().scores("common shared extra3").iter().map(|s| s.to_bits()).collect();
        assert!(f32::from_bits(expected[0]) > 0.0);
        for _ in 0..100 {
            let scores: Vec<u32> =
                build().scores("common shared extra3").iter().map(|s| s.to_bits()).collect();
            assert_eq!(scores, expected);
        }
    }

    #[test]
    fn top_k_is_bounded_by_corpus_size() {
        let idx = index(&["one", "two"]);
        assert_eq!(idx.top_k("one", 10).len(), 2);
        assert!(idx.top_k("one", 0).is_empty());
    }

    #[test]
    fn empty_index_scores_nothing() {
        let idx = index(&[]);
        assert!(idx.is_empty());
        assert!(idx.top_k("anything", 5).is_empty());
    }
}
