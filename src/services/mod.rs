pub mod corpus;
pub mod providers;
pub mod recommender;
pub mod session;
pub mod similarity;

pub use corpus::{build_corpus, collect_titles, Corpus};
pub use recommender::{recommend, surprise, RandomPicker, Surprise, TitlePicker};
pub use session::{Catalog, FetchSummary, Session};
pub use similarity::SimilarityIndex;
