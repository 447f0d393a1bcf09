//! TF-IDF vectors over genre + plot and the pairwise cosine matrix built from them.
//!
//! Tokens are lowercase runs of two or more word characters with English stop
//! words removed. Weights are raw counts times smoothed idf
//! `ln((1 + n) / (1 + df)) + 1`, and every vector is L2-normalised.

use std::collections::{BTreeSet, HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

use crate::services::corpus::Corpus;

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"(?u)\b\w\w+\b").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","across","after","afterwards","again","against","all","almost","alone","along",
            "already","also","although","always","am","among","amongst","amoungst","amount","an","and","another",
            "any","anyhow","anyone","anything","anyway","anywhere","are","around","as","at",
            "back","be","became","because","become","becomes","becoming","been","before","beforehand","behind",
            "being","below","beside","besides","between","beyond","bill","both","bottom","but","by",
            "call","can","cannot","cant","co","con","could","couldnt","cry",
            "de","describe","detail","do","done","down","due","during",
            "each","eg","eight","either","eleven","else","elsewhere","empty","enough","etc","even","ever","every",
            "everyone","everything","everywhere","except",
            "few","fifteen","fifty","fill","find","fire","first","five","for","former","formerly","forty","found",
            "four","from","front","full","further",
            "get","give","go",
            "had","has","hasnt","have","he","hence","her","here","hereafter","hereby","herein","hereupon","hers",
            "herself","him","himself","his","how","however","hundred",
            "i","ie","if","in","inc","indeed","interest","into","is","it","its","itself",
            "keep","last","latter","latterly","least","less","ltd",
            "made","many","may","me","meanwhile","might","mill","mine","more","moreover","most","mostly","move",
            "much","must","my","myself",
            "name","namely","neither","never","nevertheless","next","nine","no","nobody","none","noone","nor",
            "not","nothing","now","nowhere",
            "of","off","often","on","once","one","only","onto","or","other","others","otherwise","our","ours",
            "ourselves","out","over","own",
            "part","per","perhaps","please","put","rather","re",
            "same","see","seem","seemed","seeming","seems","serious","several","she","should","show","side",
            "since","sincere","six","sixty","so","some","somehow","someone","something","sometime","sometimes",
            "somewhere","still","such","system",
            "take","ten","than","that","the","their","them","themselves","then","thence","there","thereafter",
            "thereby","therefore","therein","thereupon","these","they","thick","thin","third","this","those",
            "though","three","through","throughout","thru","thus","to","together","too","top","toward","towards",
            "twelve","twenty","two",
            "un","under","until","up","upon","us","very","via",
            "was","we","well","were","what","whatever","when","whence","whenever","where","whereafter","whereas",
            "whereby","wherein","whereupon","wherever","whether","which","while","whither","who","whoever",
            "whole","whom","whose","why","will","with","within","without","would",
            "yet","you","your","yours","yourself","yourselves",
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Splits text into lowercase terms, dropping stop words
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stopword(token))
        .map(str::to_string)
        .collect()
}

/// Cosine similarity clamped to [0, 1]; 0.0 when either vector has no weight
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

fn normalize(vector: &mut [f64]) {
    let norm = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

/// Feature vectors and similarity matrix for one corpus snapshot
///
/// Rows are indexed exactly like the corpus the index was built from. The index is
/// never updated; a changed corpus gets a new index.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityIndex {
    vocabulary: HashMap<String, usize>,
    vectors: Vec<Vec<f64>>,
    matrix: Vec<Vec<f64>>,
}

impl SimilarityIndex {
    /// Builds the index, or `None` for an empty corpus
    pub fn build(corpus: &Corpus) -> Option<Self> {
        if corpus.is_empty() {
            return None;
        }

        let documents: Vec<Vec<String>> = corpus
            .records()
            .iter()
            .map(|record| tokenize(&record.feature_text()))
            .collect();

        // Sorted vocabulary keeps column order independent of hash seeds
        let terms: BTreeSet<&str> = documents.iter().flatten().map(String::as_str).collect();
        let vocabulary: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(column, term)| (term.to_string(), column))
            .collect();

        let mut document_frequency = vec![0usize; vocabulary.len()];
        for tokens in &documents {
            let unique: HashSet<usize> = tokens.iter().filter_map(|t| vocabulary.get(t).copied()).collect();
            for column in unique {
                document_frequency[column] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectors: Vec<Vec<f64>> = documents
            .iter()
            .map(|tokens| {
                let mut vector = vec![0.0; vocabulary.len()];
                for token in tokens {
                    if let Some(&column) = vocabulary.get(token) {
                        vector[column] += 1.0;
                    }
                }
                for (value, weight) in vector.iter_mut().zip(&idf) {
                    *value *= weight;
                }
                normalize(&mut vector);
                vector
            })
            .collect();

        let size = vectors.len();
        let mut matrix = vec![vec![0.0; size]; size];
        for i in 0..size {
            matrix[i][i] = 1.0;
            for j in (i + 1)..size {
                let score = cosine_similarity(&vectors[i], &vectors[j]);
                matrix[i][j] = score;
                matrix[j][i] = score;
            }
        }

        tracing::debug!(
            records = size,
            vocabulary = vocabulary.len(),
            "Similarity index built"
        );

        Some(Self {
            vocabulary,
            vectors,
            matrix,
        })
    }

    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vectors(&self) -> &[Vec<f64>] {
        &self.vectors
    }

    /// Similarities of record `position` against every record
    pub fn row(&self, position: usize) -> Option<&[f64]> {
        self.matrix.get(position).map(Vec::as_slice)
    }

    pub fn score(&self, i: usize, j: usize) -> Option<f64> {
        self.matrix.get(i)?.get(j).copied()
    }
}
