//! Prompts for the claim-analysis operations
//!
//! Exact wording is a tuning parameter; the output-format contracts
//! (one-word stance, `- `-prefixed question lines) are what `parse` relies
//! on.

use crate::model::ClassifiedArticle;

/// Build the query-refinement prompt
pub fn build_refine_prompt(claim: &str) -> String {
    format!(
        "Convert the following health claim into a concise, effective search query \
         for the PubMed database. Focus on keywords and scientific terminology. \
         Do not include quotes or boolean operators in the output.\n\n\
         Claim: \"{claim}\"\n\nPubMed Query:"
    )
}

/// Build the stance-classification prompt for one abstract
pub fn build_classify_prompt(claim: &str, abstract_text: &str) -> String {
    format!(
        "Health Claim: \"{claim}\"\n\n\
         Abstract: \"{abstract_text}\"\n\n\
         Based on the abstract, does it support, oppose, or is it neutral towards \
         the health claim? Respond with exactly one word: SUPPORTS, OPPOSES, or NEUTRAL."
    )
}

/// Build the claim-breakdown prompt
pub fn build_breakdown_prompt(claim: &str) -> String {
    format!(
        "A user has submitted the following broad health claim: \"{claim}\"\n\n\
         Break this claim down into 3-5 specific, answerable, and distinct questions \
         that can be investigated using scientific literature on PubMed. Each question \
         should explore a different facet of the original claim.\n\n\
         For example, if the claim is \"red meat is bad for you\", suitable questions \
         include the association between red meat consumption and colorectal cancer \
         incidence, or the link between red meat consumption and cardiovascular disease.\n\n\
         Output format, exactly: one question per line, each line starting with \"- \". \
         No numbering, no preamble, no text other than the question lines."
    )
}

/// Build the summary-synthesis prompt from classified articles
pub fn build_summary_prompt(claim: &str, articles: &[ClassifiedArticle]) -> String {
    let mut prompt = format!(
        "Health Claim: \"{claim}\"\n\n\
         I have analyzed several articles with the following classifications:\n"
    );

    for article in articles {
        prompt.push_str(&format!(
            "- Title: {}, Classification: {}\n",
            article.title, article.classification
        ));
    }

    prompt.push_str(
        "\nBased on this evidence, provide a concise, neutral, one-paragraph summary \
         of the findings regarding the health claim. Start with a clear verdict \
         (e.g. 'Largely Supported', 'Largely Opposed', 'Mixed Evidence', 'Not Enough Evidence').",
    );

    prompt
}
