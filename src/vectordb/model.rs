use qdrant_client::qdrant::ScoredPoint;
use qdrant_client::qdrant::point_id::PointIdOptions;

use crate::search::Document;

/// Maps a scored Qdrant point onto a [`Document`].
///
/// Points missing the company payload fields are dropped; the concept id
/// falls back to the point id when the payload does not carry one.
pub fn document_from_scored_point(point: ScoredPoint) -> Option<Document> {
    let point_id = point.id.and_then(|pid| pid.point_id_options);
    let payload = point.payload;

    let concept_id = payload
        .get("concept_id")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .or_else(|| match point_id {
            Some(PointIdOptions::Num(n)) => Some(n.to_string()),
            Some(PointIdOptions::Uuid(u)) => Some(u),
            None => None,
        })?;

    let company_code = payload
        .get("company_code")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())?;

    let company_name = payload
        .get("company_name")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())?;

    let concept_name = payload
        .get("concept_name")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_default();

    let concept_category = payload
        .get("concept_category")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_default();

    let importance_score = payload
        .get("importance_score")
        .and_then(|v| v.as_double())
        .map(|d| d as f32)
        .unwrap_or(0.0)
        .clamp(0.0, 1.0);

    Some(Document {
        concept_id,
        company_code,
        company_name,
        concept_name,
        concept_category,
        importance_score,
        similarity_score: point.score,
        rerank_score: None,
    })
}
