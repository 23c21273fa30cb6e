//! Display-string helpers for agents, criteria and scores.
//!
//! Everything here is pure and total: malformed input falls back to a
//! readable label instead of failing.

use crate::feedback::FeedbackRecord;

pub const UNNAMED_AGENT: &str = "Unnamed agent";
pub const UNLABELED_CRITERION: &str = "Unlabeled criterion";

/// Marks a technical compound key such as `saudacao_padrao`.
const TECHNICAL_KEY_SEPARATOR: char = '_';

/// Prefixes the identity service puts in front of agent ids.
const AGENT_ID_PREFIXES: [&str; 3] = ["agente_", "agent_", "user_"];

/// Technical criterion keys with an established display name.
const KNOWN_ITEM_LABELS: &[(&str, &str)] = &[
    ("fraseologia_explica_motivo", "Explicação do Motivo"),
    ("seguranca_info_corretas", "Confirmações de Segurança"),
    ("cordialidade_respeito", "Cordialidade e Respeito"),
    ("empatia_genuina", "Empatia com Cliente"),
    ("escuta_sem_interromper", "Escuta Ativa"),
    ("clareza_direta", "Clareza na Comunicação"),
    ("comunicacao_tom_adequado", "Tom de Voz Adequado"),
    ("oferta_valores_corretos", "Apresentação de Valores"),
    ("confirmacao_aceite", "Confirmação de Aceitação"),
    ("saudacao_padrao", "Saudação Padrão"),
    ("identificacao_completa", "Identificação Completa"),
    ("uso_script_padrao", "Uso de Script"),
    ("finalizacao_adequada", "Finalização Adequada"),
    ("solucao_duvidas", "Esclarecimento de Dúvidas"),
    ("tempo_medio_atendimento", "Tempo de Atendimento"),
    ("gestao_objecoes", "Gestão de Objeções"),
    ("captura_dados", "Captura de Dados"),
    ("conhecimento_produto", "Conhecimento do Produto"),
    ("persuasao_efetiva", "Persuasão Efetiva"),
];

/// Free-text phrases from evaluations recorded before criteria had
/// technical keys. Exact matches only.
const LEGACY_PHRASES: &[(&str, &str)] = &[
    ("Cumprimentou cordialmente o cliente", "Saudação Padrão"),
    ("Se identificou corretamente", "Identificação Completa"),
    ("Explicou o motivo do contato", "Explicação do Motivo"),
    ("Confirmou os dados do cliente", "Confirmações de Segurança"),
    ("Apresentou os valores corretamente", "Apresentação de Valores"),
    ("Confirmou o aceite do cliente", "Confirmação de Aceitação"),
    ("Tratou as objeções do cliente", "Gestão de Objeções"),
    ("Esclareceu as dúvidas do cliente", "Esclarecimento de Dúvidas"),
    ("Encerrou a ligação adequadamente", "Finalização Adequada"),
    ("Manteve tom de voz adequado", "Tom de Voz Adequado"),
    ("Demonstrou empatia", "Empatia com Cliente"),
    ("Ouviu o cliente sem interromper", "Escuta Ativa"),
];

/// Category display order; each row lists accepted spellings, lowercase.
const CATEGORY_ORDER: [&[&str]; 6] = [
    &["greeting", "abordagem", "saudação", "saudacao"],
    &["data confirmation", "confirmação de dados", "confirmacao de dados"],
    &["negotiation", "negociação", "negociacao"],
    &["checklist", "check-list", "check list"],
    &["closing", "encerramento"],
    &["critical failure", "falha crítica", "falha critica"],
];

/// Anything that identifies an agent.
pub trait AgentLabel {
    fn agent_id(&self) -> &str;
    fn display_name(&self) -> Option<&str>;
}

impl AgentLabel for FeedbackRecord {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    fn display_name(&self) -> Option<&str> {
        self.agent_name.as_deref()
    }
}

/// Explicit display name when present, otherwise a label derived from the id.
pub fn format_agent_name<R: AgentLabel + ?Sized>(record: &R) -> String {
    match record.display_name().map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => humanize_agent_id(record.agent_id()),
    }
}

/// `agent_maria_costa` → `Maria Costa`, `1011` → `Agent 1011`.
pub fn humanize_agent_id(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = AGENT_ID_PREFIXES
        .iter()
        .find_map(|prefix| {
            let head = trimmed.get(..prefix.len())?;
            head.eq_ignore_ascii_case(prefix)
                .then(|| &trimmed[prefix.len()..])
        })
        .unwrap_or(trimmed);

    if !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit()) {
        return format!("Agent {}", stripped);
    }

    let words = title_case_words(stripped, &['_', '-', '.']);
    if words.is_empty() {
        UNNAMED_AGENT.to_string()
    } else {
        words
    }
}

/// Label for a criterion: a technical key wins, then the free-text
/// description, then the raw category. The legacy dictionary is consulted
/// only for the free-text sources.
pub fn format_criterion_label(category: Option<&str>, description: Option<&str>) -> String {
    let category = category.map(str::trim).filter(|c| !c.is_empty());
    let description = description.map(str::trim).filter(|d| !d.is_empty());

    if let Some(key) = category.filter(|c| c.contains(TECHNICAL_KEY_SEPARATOR)) {
        return humanize_key(key);
    }
    if let Some(text) = description {
        return legacy_label(text).unwrap_or(text).to_string();
    }
    if let Some(raw) = category {
        return legacy_label(raw).unwrap_or(raw).to_string();
    }
    UNLABELED_CRITERION.to_string()
}

impl FeedbackRecord {
    pub fn criterion_label(&self) -> String {
        format_criterion_label(Some(&self.criterion_name), None)
    }
}

fn legacy_label(text: &str) -> Option<&'static str> {
    LEGACY_PHRASES
        .iter()
        .find(|(phrase, _)| *phrase == text)
        .map(|(_, label)| *label)
}

fn humanize_key(key: &str) -> String {
    let lower = key.to_lowercase();
    KNOWN_ITEM_LABELS
        .iter()
        .find(|(known, _)| *known == lower)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| title_case_words(key, &[TECHNICAL_KEY_SEPARATOR]))
}

fn title_case_words(raw: &str, separators: &[char]) -> String {
    raw.split(|c: char| c.is_whitespace() || separators.contains(&c))
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Position of a category in the display order; unknown names sort last.
pub fn category_order(name: &str) -> usize {
    let normalized = name.trim().to_lowercase();
    CATEGORY_ORDER
        .iter()
        .position(|aliases| aliases.contains(&normalized.as_str()))
        .unwrap_or(CATEGORY_ORDER.len())
}

/// Stable sort by category order.
pub fn sort_by_category<T>(items: &mut [T], category: impl Fn(&T) -> &str) {
    items.sort_by_key(|item| category_order(category(item)));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceTier {
    Good,
    Fair,
    Poor,
}

impl PerformanceTier {
    pub fn css_class(self) -> &'static str {
        match self {
            PerformanceTier::Good => "tier-good",
            PerformanceTier::Fair => "tier-fair",
            PerformanceTier::Poor => "tier-poor",
        }
    }
}

pub fn performance_tier(score: f64) -> PerformanceTier {
    if score >= 80.0 {
        PerformanceTier::Good
    } else if score >= 60.0 {
        PerformanceTier::Fair
    } else {
        PerformanceTier::Poor
    }
}

pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.1}%", v),
        _ => "–".to_string(),
    }
}
