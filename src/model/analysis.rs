//! Core value types for claim analysis
//!
//! Everything here is request-scoped; nothing is persisted.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Placeholder title for PubMed records that ship without one
pub const NO_TITLE: &str = "No Title";

/// Placeholder abstract for PubMed records that ship without one
pub const NO_ABSTRACT: &str = "No Abstract";

/// A PubMed article as returned by the detail-fetch step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Article {
    /// PubMed identifier (opaque; ordering from the search step is
    /// relevance order as reported by PubMed)
    pub pmid: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

/// Stance of an article toward the claim under analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stance {
    Supports,
    Opposes,
    Neutral,
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stance::Supports => "SUPPORTS",
            Stance::Opposes => "OPPOSES",
            Stance::Neutral => "NEUTRAL",
        };
        f.write_str(s)
    }
}

/// An article annotated with its stance classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ClassifiedArticle {
    pub pmid: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub classification: Stance,
}

impl ClassifiedArticle {
    pub fn new(article: Article, classification: Stance) -> Self {
        Self {
            pmid: article.pmid,
            title: article.title,
            abstract_text: article.abstract_text,
            classification,
        }
    }
}

/// Outcome of the primary verification workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimAnalysis {
    /// The literature search produced no identifiers; no classification or
    /// summarization was attempted.
    NoResults { claim_text: String, summary: String },
    /// Evidence was found, classified and summarized.
    Evidence {
        summary: String,
        articles: Vec<ClassifiedArticle>,
    },
}
