pub mod analysis;
pub mod config;

pub use analysis::{Article, ClaimAnalysis, ClassifiedArticle, Stance, NO_ABSTRACT, NO_TITLE};
pub use config::{Config, ModelsConfig, SearchConfig};
