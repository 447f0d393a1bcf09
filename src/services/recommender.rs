use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::MovieRecord,
    services::{corpus::Corpus, similarity::SimilarityIndex},
};

/// Ranks the other corpus records by similarity to `query_title`
///
/// Returns at most `top_n` records, highest score first, ties in corpus order. A
/// title that isn't in the corpus yields an empty list.
pub fn recommend(
    query_title: &str,
    corpus: &Corpus,
    index: &SimilarityIndex,
    top_n: usize,
) -> Vec<MovieRecord> {
    let Some(query) = corpus.position(query_title) else {
        tracing::debug!(title = %query_title, "Title not in corpus, no recommendations");
        return Vec::new();
    };
    let Some(row) = index.row(query) else {
        return Vec::new();
    };

    let mut scored: Vec<(usize, f64)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|&(position, _)| position != query)
        .collect();

    // Stable sort keeps lower corpus positions first on equal scores
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    scored
        .into_iter()
        .filter_map(|(position, _)| corpus.get(position).cloned())
        .take(top_n)
        .collect()
}

/// Source of the random choice behind "surprise me"
pub trait TitlePicker: Send {
    /// Picks a position in `0..len`; only called with `len > 0`
    fn pick(&mut self, len: usize) -> usize;
}

/// `TitlePicker` backed by a seedable RNG
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl TitlePicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// A randomly selected title and what it leads to
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Surprise {
    pub selected: MovieRecord,
    pub recommendations: Vec<MovieRecord>,
}

/// Picks a random title from the corpus and recommends from it
pub fn surprise(
    corpus: &Corpus,
    index: &SimilarityIndex,
    picker: &mut dyn TitlePicker,
    top_n: usize,
) -> AppResult<Surprise> {
    if corpus.is_empty() {
        return Err(AppError::NoData);
    }

    let position = picker.pick(corpus.len()).min(corpus.len() - 1);
    let selected = corpus.get(position).cloned().ok_or(AppError::NoData)?;
    let recommendations = recommend(&selected.title, corpus, index, top_n);

    tracing::info!(selected = %selected.title, "Random title selected");

    Ok(Surprise {
        selected,
        recommendations,
    })
}
