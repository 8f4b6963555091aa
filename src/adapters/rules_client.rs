use crate::config::RemoteSettings;
use crate::domain::model::EvaluationKind;
use crate::domain::ports::RuleEvaluator;
use crate::utils::error::{PricingError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

pub const SOLVER_KEY_HEADER: &str = "x-solver-key";

const MAX_ERROR_BODY: usize = 512;

/// Calls the rules service over HTTP:
/// `POST {host}/{rules|flows}/{identifier}/evaluate?version={version}`.
pub struct HttpRuleEvaluator {
    settings: RemoteSettings,
    client: Client,
}

impl HttpRuleEvaluator {
    pub fn new(settings: RemoteSettings) -> Self {
        Self {
            settings,
            client: Client::new(),
        }
    }

    fn endpoint(&self, kind: EvaluationKind, identifier: &str, version: &str) -> Result<Url> {
        if identifier.trim().is_empty() {
            return Err(PricingError::remote(format!(
                "No identifier configured for {} evaluation",
                kind.path_segment()
            )));
        }

        let mut url = Url::parse(&self.settings.host).map_err(|e| {
            PricingError::remote(format!(
                "Invalid rules service host {:?}: {}",
                self.settings.host, e
            ))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                PricingError::remote(format!(
                    "Rules service host cannot be a base URL: {}",
                    self.settings.host
                ))
            })?
            .pop_if_empty()
            .extend([kind.path_segment(), identifier, "evaluate"]);

        if !version.is_empty() {
            url.query_pairs_mut().append_pair("version", version);
        }

        Ok(url)
    }
}

#[async_trait]
impl RuleEvaluator for HttpRuleEvaluator {
    async fn evaluate(
        &self,
        kind: EvaluationKind,
        identifier: &str,
        version: &str,
        payload: Value,
    ) -> Result<Value> {
        let url = self.endpoint(kind, identifier, version)?;

        let mut request = self
            .client
            .post(url.clone())
            .header(SOLVER_KEY_HEADER, &self.settings.solver_key)
            .json(&payload);

        if let Some(timeout) = self.settings.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!("Evaluating {} {} at {}", kind.path_segment(), identifier, url);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Rules service responded {} for {}", status, identifier);

        let body = response.text().await?;

        if !status.is_success() {
            let mut detail = body.trim().to_string();
            if detail.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !detail.is_char_boundary(cut) {
                    cut -= 1;
                }
                detail.truncate(cut);
            }

            let message = if detail.is_empty() {
                format!("Rules service returned {} for {}", status, identifier)
            } else {
                format!("Rules service returned {} for {}: {}", status, identifier, detail)
            };

            return Err(PricingError::Remote {
                message,
                status: Some(status.as_u16()),
            });
        }

        serde_json::from_str(&body).map_err(PricingError::MalformedPayload)
    }
}
