//! REST API endpoints for claim analysis

use actix_web::{post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::api::error::ApiError;
use crate::model::{ClaimAnalysis, ClassifiedArticle};
use crate::service::ClaimAnalysisService;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClaimRequest {
    /// The health claim to analyze
    pub claim: String,
}

/// Response when evidence was found and classified
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyClaimResponse {
    pub summary: String,
    pub articles: Vec<ClassifiedArticle>,
}

/// Terminal response when the literature search found nothing
#[derive(Debug, Serialize, ToSchema)]
pub struct NoResultsResponse {
    pub status: String,
    pub claim_text: String,
    pub summary: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BreakdownResponse {
    pub suggestions: Vec<String>,
}

/// Verify a health claim against the PubMed literature
#[utoipa::path(
    post,
    path = "/verify-claim",
    request_body = ClaimRequest,
    responses(
        (status = 200, description = "Claim analyzed; either classified evidence or a no-results payload", body = VerifyClaimResponse)
    ),
    tag = "claims"
)]
#[post("/verify-claim")]
pub async fn verify_claim(
    service: web::Data<ClaimAnalysisService>,
    request: web::Json<ClaimRequest>,
) -> impl Responder {
    tracing::info!(claim = %request.claim, "Received claim verification request");

    match service.verify_claim(&request.claim).await {
        ClaimAnalysis::NoResults {
            claim_text,
            summary,
        } => HttpResponse::Ok().json(NoResultsResponse {
            status: "no_results".to_string(),
            claim_text,
            summary,
        }),
        ClaimAnalysis::Evidence { summary, articles } => {
            HttpResponse::Ok().json(VerifyClaimResponse { summary, articles })
        }
    }
}

/// Break a broad health claim into specific answerable questions
#[utoipa::path(
    post,
    path = "/breakdown-claim",
    request_body = ClaimRequest,
    responses(
        (status = 200, description = "Suggested sub-questions", body = BreakdownResponse),
        (status = 502, description = "Text-generation service failure")
    ),
    tag = "claims"
)]
#[post("/breakdown-claim")]
pub async fn breakdown_claim(
    service: web::Data<ClaimAnalysisService>,
    request: web::Json<ClaimRequest>,
) -> Result<HttpResponse, ApiError> {
    tracing::info!(claim = %request.claim, "Received claim breakdown request");

    let suggestions = service.breakdown_claim(&request.claim).await?;

    Ok(HttpResponse::Ok().json(BreakdownResponse { suggestions }))
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "claim-intel",
        description = "Evidence-checking service for health claims: PubMed retrieval plus LLM stance analysis"
    ),
    paths(
        verify_claim,
        breakdown_claim,
        crate::api::health::index,
        crate::api::health::liveness
    ),
    components(schemas(
        ClaimRequest,
        VerifyClaimResponse,
        NoResultsResponse,
        BreakdownResponse,
        ClassifiedArticle,
        crate::model::Stance,
        crate::api::health::IdentityResponse,
        crate::api::health::HealthStatus
    )),
    tags(
        (name = "claims", description = "Claim analysis endpoints"),
        (name = "health", description = "Liveness and identity")
    )
)]
pub struct ApiDoc;

/// Configure claim analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(verify_claim).service(breakdown_claim);
}
