//! Typed async wrappers over the quality backend's REST API.
//!
//! One method per endpoint, each returning `Result<_, DashboardError>`.
//! Requests go through the browser `fetch`; response bodies are decoded
//! into `serde_json::Value` with `serde-wasm-bindgen` and then into the
//! lenient models.

pub mod models;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::config::AppConfig;
use crate::error::DashboardError;
use crate::feedback::{
    decode_records, ContestationResolution, FeedbackAction, FeedbackRecord, FeedbackStatus,
    PageRequest,
};
use crate::filters::{Filter, KeyValueStorage, LocalStorage};
pub use models::{
    sort_call_items, AgentSummary, CallItem, CallSummary, Criterion, CriterionInput, ItemOutcome,
    Kpis, TrendPoint, UserAccount, UserInput, Wallet, WalletInput, WorstItem,
};
pub(crate) use models::optional_text;

use crate::session::CurrentUser;

/// Narrows the feedback listing beyond the shared filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackScope {
    pub agent_id: Option<String>,
    pub status: Option<FeedbackStatus>,
}

/// Query parameters for one feedback page. Unset filter fields are
/// omitted, never sent empty.
pub fn feedback_list_params(
    page: PageRequest,
    filter: &Filter,
    scope: &FeedbackScope,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("limit", page.limit.to_string()),
        ("offset", page.offset.to_string()),
    ];
    params.extend(filter.query_params());
    if let Some(agent) = scope
        .agent_id
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
    {
        params.push(("agent_id", agent.to_string()));
    }
    if let Some(status) = scope.status {
        params.push(("status", status.as_str().to_string()));
    }
    params
}

/// `/agent/{id}/{report}` with the id escaped as one path segment.
pub fn agent_path(agent_id: &str, report: &str) -> String {
    format!("/agent/{}/{}", urlencoding::encode(agent_id.trim()), report)
}

pub fn build_url(base: &str, path: &str, params: &[(&str, String)]) -> String {
    let mut url = format!("{}{}", base, path);
    if !params.is_empty() {
        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        url.push('?');
        url.push_str(&query);
    }
    url
}

/// The `detail` message of an error body, as sent by the backend's
/// framework (a string, or a list of validation errors with `msg`).
pub fn error_detail(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        other => Some(other.to_string()),
    }
}

/// Listing bodies are plain arrays; some deployments wrap them in
/// `{"items": [...]}`.
pub fn listing_items(body: Value) -> Result<Vec<Value>, DashboardError> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        Value::Object(mut map) => match map.remove("items").or_else(|| map.remove("feedbacks")) {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(DashboardError::Decode(
                "expected a list of feedback records".to_string(),
            )),
        },
        other => Err(DashboardError::Decode(format!(
            "expected a list of feedback records, got {}",
            other
        ))),
    }
}

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| "Unknown error".to_string())
}

fn network_error(value: JsValue) -> DashboardError {
    DashboardError::Network(js_message(&value))
}

fn decode_error(value: JsValue) -> DashboardError {
    DashboardError::Decode(js_message(&value))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClient {
    base: String,
    token_key: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            base: config.api_base.clone(),
            token_key: config.token_key.clone(),
        }
    }

    pub fn url(&self, path: &str, params: &[(&str, String)]) -> String {
        build_url(&self.base, path, params)
    }

    fn token(&self) -> Option<String> {
        match LocalStorage::open().get(&self.token_key) {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                warn!("Could not read auth token: {}", e);
                None
            }
        }
    }

    async fn send(
        &self,
        method: &str,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Response, DashboardError> {
        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        if let Some(body) = body {
            let text = serde_json::to_string(body).map_err(|e| DashboardError::Decode(e.to_string()))?;
            opts.set_body(&JsValue::from_str(&text));
        }

        let request = Request::new_with_str_and_init(url, &opts).map_err(network_error)?;
        let headers = request.headers();
        headers
            .set("Accept", "application/json")
            .map_err(network_error)?;
        if body.is_some() {
            headers
                .set("Content-Type", "application/json")
                .map_err(network_error)?;
        }
        if let Some(token) = self.token() {
            headers
                .set("Authorization", &format!("Bearer {}", token))
                .map_err(network_error)?;
        }

        let window = web_sys::window()
            .ok_or_else(|| DashboardError::Network("no browser window".to_string()))?;
        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(network_error)?;
        value
            .dyn_into::<Response>()
            .map_err(|_| DashboardError::Network("fetch did not return a response".to_string()))
    }

    async fn read_json(response: &Response) -> Result<Value, DashboardError> {
        if response.status() == 204 {
            return Ok(Value::Null);
        }
        let promise = response.json().map_err(decode_error)?;
        let value = JsFuture::from(promise).await.map_err(decode_error)?;
        serde_wasm_bindgen::from_value(value).map_err(|e| DashboardError::Decode(e.to_string()))
    }

    /// Send a request and turn non-2xx answers into `DashboardError::Http`.
    async fn checked(
        &self,
        method: &str,
        path: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Response, DashboardError> {
        let url = self.url(path, params);
        debug!("{} {}", method, url);
        let response = self.send(method, &url, body).await?;
        if response.ok() {
            return Ok(response);
        }

        let status = response.status();
        let message = match Self::read_json(&response).await {
            Ok(body) => error_detail(&body).unwrap_or_else(|| response.status_text()),
            Err(_) => response.status_text(),
        };
        warn!("{} {} failed with {}: {}", method, path, status, message);
        Err(DashboardError::Http { status, message })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, DashboardError> {
        let response = self.checked("GET", path, params, None).await?;
        let body = Self::read_json(&response).await?;
        serde_json::from_value(body).map_err(|e| DashboardError::Decode(e.to_string()))
    }

    async fn write<B: Serialize>(
        &self,
        method: &str,
        path: &str,
        body: &B,
    ) -> Result<(), DashboardError> {
        let body = serde_json::to_value(body).map_err(|e| DashboardError::Decode(e.to_string()))?;
        self.checked(method, path, &[], Some(&body)).await.map(|_| ())
    }

    async fn delete(&self, path: &str) -> Result<(), DashboardError> {
        self.checked("DELETE", path, &[], None).await.map(|_| ())
    }

    // -- Feedback --

    pub async fn list_feedback(
        &self,
        page: PageRequest,
        filter: &Filter,
        scope: &FeedbackScope,
    ) -> Result<Vec<FeedbackRecord>, DashboardError> {
        let params = feedback_list_params(page, filter, scope);
        let response = self.checked("GET", "/feedbacks", &params, None).await?;
        let body = Self::read_json(&response).await?;
        let records = decode_records(listing_items(body)?);
        debug!(
            "Fetched {} feedback records at offset {}",
            records.len(),
            page.offset
        );
        Ok(records)
    }

    /// Validate and send a feedback mutation.
    pub async fn perform(&self, id: i64, action: &FeedbackAction) -> Result<(), DashboardError> {
        action.validate()?;
        let (method, path) = action.endpoint(id);
        let body = action.body();
        self.checked(method, &path, &[], body.as_ref()).await?;
        info!("Feedback {} {}", id, action.label());
        Ok(())
    }

    pub async fn accept(&self, id: i64) -> Result<(), DashboardError> {
        self.perform(id, &FeedbackAction::Accept).await
    }

    pub async fn contest(&self, id: i64, reason: &str) -> Result<(), DashboardError> {
        let action = FeedbackAction::Contest {
            reason: reason.to_string(),
        };
        self.perform(id, &action).await
    }

    pub async fn review(
        &self,
        id: i64,
        resolution: ContestationResolution,
        reply: &str,
    ) -> Result<(), DashboardError> {
        let action = FeedbackAction::Review {
            resolution,
            reply: reply.to_string(),
        };
        self.perform(id, &action).await
    }

    pub async fn edit(
        &self,
        id: i64,
        comment: &str,
        current_performance: f64,
    ) -> Result<(), DashboardError> {
        let action = FeedbackAction::Edit {
            comment: comment.to_string(),
            current_performance,
        };
        self.perform(id, &action).await
    }

    // -- Reports --

    pub async fn kpis(&self, filter: &Filter) -> Result<Kpis, DashboardError> {
        self.get("/kpis", &filter.query_params()).await
    }

    pub async fn trend(&self, filter: &Filter) -> Result<Vec<TrendPoint>, DashboardError> {
        self.get("/trend", &filter.query_params()).await
    }

    pub async fn agents(&self, filter: &Filter) -> Result<Vec<AgentSummary>, DashboardError> {
        self.get("/agents", &filter.query_params()).await
    }

    pub async fn agent_summary(
        &self,
        agent_id: &str,
        filter: &Filter,
    ) -> Result<AgentSummary, DashboardError> {
        let mut summary: AgentSummary = self
            .get(&agent_path(agent_id, "summary"), &filter.query_params())
            .await?;
        if summary.agent_id.trim().is_empty() {
            summary.agent_id = agent_id.trim().to_string();
        }
        Ok(summary)
    }

    pub async fn agent_calls(
        &self,
        agent_id: &str,
        filter: &Filter,
    ) -> Result<Vec<CallSummary>, DashboardError> {
        self.get(&agent_path(agent_id, "calls"), &filter.query_params())
            .await
    }

    /// `None` when the agent has no non-conforming item in the period.
    pub async fn agent_worst_item(
        &self,
        agent_id: &str,
        filter: &Filter,
    ) -> Result<Option<WorstItem>, DashboardError> {
        let worst: Option<WorstItem> = self
            .get(&agent_path(agent_id, "worst_item"), &filter.query_params())
            .await?;
        Ok(worst.filter(|w| !w.is_empty()))
    }

    /// Items of one evaluation, in category display order.
    pub async fn call_items(&self, evaluation_id: i64) -> Result<Vec<CallItem>, DashboardError> {
        let mut items: Vec<CallItem> = self
            .get(&format!("/call/{}/items", evaluation_id), &[])
            .await?;
        sort_call_items(&mut items);
        debug!("Loaded {} items for evaluation {}", items.len(), evaluation_id);
        Ok(items)
    }

    pub async fn current_user(&self) -> Result<CurrentUser, DashboardError> {
        self.get("/auth/me", &[]).await
    }

    // -- Admin --

    pub async fn wallets(&self) -> Result<Vec<Wallet>, DashboardError> {
        self.get("/carteiras/", &[]).await
    }

    pub async fn create_wallet(&self, input: &WalletInput) -> Result<(), DashboardError> {
        self.write("POST", "/carteiras/", input).await
    }

    pub async fn update_wallet(&self, id: i64, input: &WalletInput) -> Result<(), DashboardError> {
        self.write("PUT", &format!("/carteiras/{}", id), input).await
    }

    pub async fn delete_wallet(&self, id: i64) -> Result<(), DashboardError> {
        self.delete(&format!("/carteiras/{}", id)).await
    }

    pub async fn criteria(&self) -> Result<Vec<Criterion>, DashboardError> {
        self.get("/criterios/", &[]).await
    }

    pub async fn create_criterion(&self, input: &CriterionInput) -> Result<(), DashboardError> {
        self.write("POST", "/criterios/", input).await
    }

    pub async fn update_criterion(
        &self,
        id: i64,
        input: &CriterionInput,
    ) -> Result<(), DashboardError> {
        self.write("PUT", &format!("/criterios/{}", id), input).await
    }

    pub async fn delete_criterion(&self, id: i64) -> Result<(), DashboardError> {
        self.delete(&format!("/criterios/{}", id)).await
    }

    pub async fn users(&self) -> Result<Vec<UserAccount>, DashboardError> {
        self.get("/admin/users", &[]).await
    }

    pub async fn create_user(&self, input: &UserInput) -> Result<(), DashboardError> {
        self.write("POST", "/admin/users", input).await
    }

    pub async fn update_user(&self, id: i64, input: &UserInput) -> Result<(), DashboardError> {
        self.write("PUT", &format!("/admin/users/{}", id), input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterPatch;
    use serde_json::json;

    #[test]
    fn test_agent_path_escapes_id() {
        assert_eq!(agent_path("1011", "summary"), "/agent/1011/summary");
        assert_eq!(agent_path(" ana/01 ", "calls"), "/agent/ana%2F01/calls");
    }

    #[test]
    fn test_list_params_omit_unset_filter_fields() {
        let mut filter = Filter::default();
        filter.apply(FilterPatch::start("2024-01-01"));
        filter.apply(FilterPatch::wallet(""));

        let params = feedback_list_params(
            PageRequest { limit: 20, offset: 40 },
            &filter,
            &FeedbackScope::default(),
        );
        assert_eq!(
            params,
            vec![
                ("limit", "20".to_string()),
                ("offset", "40".to_string()),
                ("start", "2024-01-01".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_params_with_scope() {
        let scope = FeedbackScope {
            agent_id: Some(" 1011 ".to_string()),
            status: Some(FeedbackStatus::InReview),
        };
        let params = feedback_list_params(
            PageRequest { limit: 5, offset: 0 },
            &Filter::default(),
            &scope,
        );
        assert!(params.contains(&("agent_id", "1011".to_string())));
        assert!(params.contains(&("status", "in_review".to_string())));
    }

    #[test]
    fn test_build_url_encodes_values() {
        let url = build_url("/api", "/kpis", &[("wallet", "Cobrança Ativa".to_string())]);
        assert_eq!(url, "/api/kpis?wallet=Cobran%C3%A7a%20Ativa");
        assert_eq!(build_url("/api", "/auth/me", &[]), "/api/auth/me");
    }

    #[test]
    fn test_client_url_uses_configured_base() {
        let config = AppConfig::from_overrides(Some("https://qa.example.com/api/"), None, None);
        let client = ApiClient::new(&config);
        assert_eq!(
            client.url("/feedbacks/3/accept", &[]),
            "https://qa.example.com/api/feedbacks/3/accept"
        );
    }

    #[test]
    fn test_error_detail_shapes() {
        assert_eq!(
            error_detail(&json!({"detail": "Agente não encontrado"})).as_deref(),
            Some("Agente não encontrado")
        );
        assert_eq!(
            error_detail(&json!({"detail": [{"msg": "field required"}, {"msg": "bad date"}]}))
                .as_deref(),
            Some("field required; bad date")
        );
        assert_eq!(error_detail(&json!({"error": "x"})), None);
        assert_eq!(error_detail(&json!({"detail": null})), None);
    }

    #[test]
    fn test_listing_items_shapes() {
        assert_eq!(listing_items(json!([{"id": 1}])).unwrap().len(), 1);
        assert_eq!(listing_items(json!({"items": [{"id": 1}, {"id": 2}]})).unwrap().len(), 2);
        assert!(listing_items(Value::Null).unwrap().is_empty());
        assert!(matches!(
            listing_items(json!("oops")),
            Err(DashboardError::Decode(_))
        ));
    }
}
