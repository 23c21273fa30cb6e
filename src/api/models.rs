use serde::{Deserialize, Serialize};

use crate::format::{format_criterion_label, sort_by_category, AgentLabel};
use crate::lenient;

// -- Report models --

/// Criterion with the highest non-conformity rate in the period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorstItem {
    #[serde(alias = "categoria", deserialize_with = "lenient::string")]
    pub category: String,
    #[serde(alias = "qtd_nao_conforme", deserialize_with = "lenient::int")]
    pub non_conforming: i64,
    #[serde(alias = "total_avaliacoes_item", deserialize_with = "lenient::int")]
    pub evaluated: i64,
    #[serde(alias = "taxa_nao_conforme", deserialize_with = "lenient::number")]
    pub non_conforming_rate: f64,
}

impl WorstItem {
    pub fn is_empty(&self) -> bool {
        self.category.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Kpis {
    #[serde(alias = "media_geral", deserialize_with = "lenient::opt_number")]
    pub average_score: Option<f64>,
    #[serde(alias = "total_ligacoes", deserialize_with = "lenient::int")]
    pub total_calls: i64,
    #[serde(alias = "pior_item", deserialize_with = "lenient::object")]
    pub worst_item: Option<WorstItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSummary {
    #[serde(alias = "agentId", deserialize_with = "lenient::string")]
    pub agent_id: String,
    #[serde(alias = "nome", deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(alias = "media", deserialize_with = "lenient::opt_number")]
    pub average: Option<f64>,
    #[serde(alias = "ligacoes", deserialize_with = "lenient::int")]
    pub total_calls: i64,
    #[serde(alias = "ultima_avaliacao", deserialize_with = "lenient::opt_string")]
    pub last_evaluation: Option<String>,
}

impl AgentLabel for AgentSummary {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendPoint {
    /// Day or month label as sent by the server.
    #[serde(alias = "month", alias = "mes", alias = "dia", deserialize_with = "lenient::string")]
    pub period: String,
    #[serde(alias = "media", deserialize_with = "lenient::number")]
    pub average: f64,
}

/// Conformity verdict for one evaluated item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ItemOutcome {
    Conforming,
    NonConforming,
    #[default]
    NotApplicable,
}

impl ItemOutcome {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "conforme" | "conforming" => ItemOutcome::Conforming,
            "nao conforme" | "não conforme" | "non conforming" => ItemOutcome::NonConforming,
            _ => ItemOutcome::NotApplicable,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ItemOutcome::Conforming => "Conforming",
            ItemOutcome::NonConforming => "Non-conforming",
            ItemOutcome::NotApplicable => "Not applicable",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ItemOutcome::Conforming => "outcome-conforming",
            ItemOutcome::NonConforming => "outcome-non-conforming",
            ItemOutcome::NotApplicable => "outcome-not-applicable",
        }
    }
}

impl From<String> for ItemOutcome {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

/// One evaluated call of an agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallSummary {
    #[serde(deserialize_with = "lenient::string")]
    pub call_id: String,
    #[serde(alias = "avaliacao_id", deserialize_with = "lenient::int")]
    pub evaluation_id: i64,
    #[serde(alias = "data_ligacao", deserialize_with = "lenient::opt_string")]
    pub called_at: Option<String>,
    #[serde(alias = "pontuacao", deserialize_with = "lenient::opt_number")]
    pub score: Option<f64>,
    #[serde(alias = "status_avaliacao", deserialize_with = "lenient::opt_string")]
    pub status: Option<String>,
}

/// Item verdict within one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallItem {
    #[serde(alias = "categoria", deserialize_with = "lenient::string")]
    pub category: String,
    #[serde(alias = "descricao", deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(alias = "resultado", deserialize_with = "lenient::parsed")]
    pub outcome: ItemOutcome,
}

impl CallItem {
    pub fn label(&self) -> String {
        format_criterion_label(Some(&self.category), self.description.as_deref())
    }
}

/// Items in category display order.
pub fn sort_call_items(items: &mut [CallItem]) {
    sort_by_category(items, |item| item.category.as_str());
}

// -- Admin models --

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wallet {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(alias = "nome", deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(alias = "descricao", deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(
        alias = "ativo",
        default = "lenient::default_true",
        deserialize_with = "lenient::flag"
    )]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletInput {
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
}

impl Default for WalletInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            active: true,
        }
    }
}

impl From<&Wallet> for WalletInput {
    fn from(wallet: &Wallet) -> Self {
        Self {
            name: wallet.name.clone(),
            description: wallet.description.clone(),
            active: wallet.active,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Criterion {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(alias = "nome", deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(alias = "descricao", deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(alias = "exemplo_frase", deserialize_with = "lenient::opt_string")]
    pub example_phrase: Option<String>,
    #[serde(alias = "categoria", deserialize_with = "lenient::opt_string")]
    pub category: Option<String>,
    #[serde(alias = "peso", deserialize_with = "lenient::opt_number")]
    pub weight: Option<f64>,
    #[serde(
        alias = "ativo",
        default = "lenient::default_true",
        deserialize_with = "lenient::flag"
    )]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionInput {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub weight: Option<f64>,
    pub active: bool,
}

impl Default for CriterionInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            category: None,
            weight: None,
            active: true,
        }
    }
}

impl From<&Criterion> for CriterionInput {
    fn from(criterion: &Criterion) -> Self {
        Self {
            name: criterion.name.clone(),
            description: criterion.description.clone(),
            category: criterion.category.clone(),
            weight: criterion.weight,
            active: criterion.active,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAccount {
    #[serde(deserialize_with = "lenient::int")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::string")]
    pub username: String,
    #[serde(alias = "fullName", alias = "nome", deserialize_with = "lenient::opt_string")]
    pub full_name: Option<String>,
    #[serde(
        alias = "ativo",
        default = "lenient::default_true",
        deserialize_with = "lenient::flag"
    )]
    pub active: bool,
    #[serde(deserialize_with = "lenient::names")]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserInput {
    pub username: String,
    pub full_name: Option<String>,
    pub active: bool,
}

impl From<&UserAccount> for UserInput {
    fn from(user: &UserAccount) -> Self {
        Self {
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            active: user.active,
        }
    }
}

/// Trim text fields; blank optional text becomes `None`.
pub(crate) fn optional_text(raw: &str) -> Option<String> {
    Some(raw.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kpis_from_portuguese_payload() {
        let kpis: Kpis = serde_json::from_value(json!({
            "media_geral": "82.35",
            "total_ligacoes": 412,
            "pior_item": {
                "categoria": "confirmacao_aceite",
                "qtd_nao_conforme": 31,
                "total_avaliacoes_item": 400,
                "taxa_nao_conforme": 7.75
            }
        }))
        .unwrap();

        assert_eq!(kpis.average_score, Some(82.35));
        assert_eq!(kpis.total_calls, 412);
        let worst = kpis.worst_item.unwrap();
        assert_eq!(worst.non_conforming, 31);
        assert!(!worst.is_empty());
    }

    #[test]
    fn test_kpis_with_empty_worst_item() {
        let kpis: Kpis = serde_json::from_value(json!({
            "media_geral": null,
            "total_ligacoes": null,
            "pior_item": {}
        }))
        .unwrap();
        assert_eq!(kpis.average_score, None);
        assert!(kpis.worst_item.map(|w| w.is_empty()).unwrap_or(true));
    }

    #[test]
    fn test_agent_summary_aliases() {
        let agents: Vec<AgentSummary> = serde_json::from_value(json!([
            {"agent_id": 1011, "nome": "Adryan", "ligacoes": 12, "media": 88.4}
        ]))
        .unwrap();
        assert_eq!(agents[0].agent_id, "1011");
        assert_eq!(agents[0].total_calls, 12);
        assert_eq!(agents[0].average, Some(88.4));
    }

    #[test]
    fn test_wallet_active_flag_variants() {
        let wallets: Vec<Wallet> = serde_json::from_value(json!([
            {"id": 1, "nome": "Varejo", "ativo": 1},
            {"id": 2, "nome": "Cobrança", "ativo": "false"},
            {"id": 3, "nome": "Premium"}
        ]))
        .unwrap();
        assert!(wallets[0].active);
        assert!(!wallets[1].active);
        assert!(wallets[2].active);
    }

    #[test]
    fn test_trend_point_period_aliases() {
        let points: Vec<TrendPoint> =
            serde_json::from_value(json!([{"dia": "2024-05-01", "media": "77.5"}])).unwrap();
        assert_eq!(points[0].period, "2024-05-01");
        assert_eq!(points[0].average, 77.5);
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text("  "), None);
        assert_eq!(optional_text(" Varejo "), Some("Varejo".to_string()));
    }

    #[test]
    fn test_call_summary_aliases() {
        let calls: Vec<CallSummary> = serde_json::from_value(json!([{
            "call_id": 55102,
            "avaliacao_id": "981",
            "data_ligacao": "2024-05-03T14:12:00",
            "pontuacao": "91.5",
            "status_avaliacao": "concluida"
        }]))
        .unwrap();
        assert_eq!(calls[0].call_id, "55102");
        assert_eq!(calls[0].evaluation_id, 981);
        assert_eq!(calls[0].score, Some(91.5));
        assert_eq!(calls[0].called_at.as_deref(), Some("2024-05-03T14:12:00"));
    }

    #[test]
    fn test_item_outcome_variants() {
        assert_eq!(ItemOutcome::parse("CONFORME"), ItemOutcome::Conforming);
        assert_eq!(ItemOutcome::parse("NAO CONFORME"), ItemOutcome::NonConforming);
        assert_eq!(ItemOutcome::parse("nao_conforme"), ItemOutcome::NonConforming);
        assert_eq!(ItemOutcome::parse("NAO SE APLICA"), ItemOutcome::NotApplicable);
        assert_eq!(ItemOutcome::parse("???"), ItemOutcome::NotApplicable);
    }

    #[test]
    fn test_call_items_sorted_and_labelled() {
        let mut items: Vec<CallItem> = serde_json::from_value(json!([
            {"categoria": "encerramento", "descricao": "Encerrou a ligação", "resultado": "CONFORME"},
            {"categoria": "confirmacao_aceite", "resultado": "NAO CONFORME"},
            {"categoria": "abordagem", "descricao": "Saudação inicial", "resultado": "NAO SE APLICA"}
        ]))
        .unwrap();
        sort_call_items(&mut items);

        let categories: Vec<_> = items.iter().map(|i| i.category.as_str()).collect();
        assert_eq!(categories, vec!["abordagem", "encerramento", "confirmacao_aceite"]);
        assert_eq!(items[2].outcome, ItemOutcome::NonConforming);
        assert_eq!(items[2].label(), format_criterion_label(Some("confirmacao_aceite"), None));
        assert_eq!(items[0].label(), "Saudação inicial");
    }
}
