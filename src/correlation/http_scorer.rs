use crate::correlation::models::CandidatePair;
use crate::correlation::scorer::CorrelationScorer;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ScoreRequest<'a> {
    texts: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ScoreResponse {
    scores: Vec<f64>,
}

/// Correlation model served over HTTP.
///
/// Posts `{"texts": [...]}` with one pair description per entry and expects
/// `{"scores": [...]}` back in the same order.
pub struct HttpCorrelationScorer {
    client: Client,
    endpoint: String,
}

impl HttpCorrelationScorer {
    pub fn new(endpoint: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CorrelationScorer for HttpCorrelationScorer {
    async fn score_batch(&self, pairs: &[CandidatePair]) -> Result<Vec<f64>> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let request = ScoreRequest {
            texts: pairs.iter().map(|p| p.description.as_str()).collect(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::scorer(self.name(), format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::scorer(
                self.name(),
                format!("model endpoint returned {}", status),
            ));
        }

        let body: ScoreResponse = response
            .json()
            .await
            .map_err(|e| AppError::scorer(self.name(), format!("invalid response body: {}", e)))?;

        if body.scores.len() != pairs.len() {
            return Err(AppError::scorer(
                self.name(),
                format!(
                    "expected {} scores, model returned {}",
                    pairs.len(),
                    body.scores.len()
                ),
            ));
        }

        debug!(
            endpoint = %self.endpoint,
            pairs = pairs.len(),
            "Scored pair batch"
        );

        Ok(body.scores)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = ScoreRequest {
            texts: vec!["Threat ddos between a and b. Time difference 0 minutes."],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"texts": ["Threat ddos between a and b. Time difference 0 minutes."]})
        );
    }

    #[tokio::test]
    async fn test_empty_batch_skips_network() {
        // Port 9 (discard) is never contacted for an empty batch
        let scorer = HttpCorrelationScorer::new("http://127.0.0.1:9/score".to_string(), 1).unwrap();
        assert!(scorer.score_batch(&[]).await.unwrap().is_empty());
        assert_eq!(scorer.endpoint(), "http://127.0.0.1:9/score");
    }
}
