//! Default escalation ordering by entity type

use super::policy::{EscalationEntry, EscalationPolicy};
use crate::engine::EngineType;

use EngineType::{Llm, Ner, Pattern, RuleBased};

/// Propose an engine ordering from an entity-type label.
///
/// Matching is case-insensitive by exact value or substring. Embedding is
/// opt-in only and never part of a default.
pub fn default_engine_order(entity_type: &str) -> Vec<EngineType> {
    let t = entity_type.trim().to_lowercase();
    let is = |words: &[&str]| words.iter().any(|w| t == *w || t.contains(w));

    if is(&["email", "e-mail", "mail", "phone", "telefono"]) {
        vec![Pattern, RuleBased, Llm]
    } else if is(&["date", "data", "birth", "nascita"]) {
        vec![Pattern, RuleBased, Ner, Llm]
    } else if is(&["address", "indirizzo", "name", "nome", "person", "organization"]) {
        vec![Ner, Llm]
    } else {
        vec![Pattern, RuleBased, Ner, Llm]
    }
}

/// A policy over [`default_engine_order`] with priorities 1, 2, 3, ...
pub fn default_escalation_policy(node_id: &str, entity_type: &str) -> EscalationPolicy {
    let order = default_engine_order(entity_type);
    let default_engine = order.first().copied();
    let engines = order
        .into_iter()
        .enumerate()
        .map(|(i, t)| EscalationEntry::new(t, i as i32 + 1))
        .collect();
    EscalationPolicy {
        node_id: node_id.to_string(),
        engines,
        default_engine,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineType::Embedding;

    #[test]
    fn date_like_types() {
        assert_eq!(default_engine_order("date"), vec![Pattern, RuleBased, Ner, Llm]);
        assert_eq!(default_engine_order("Date of Birth"), vec![Pattern, RuleBased, Ner, Llm]);
    }

    #[test]
    fn email_skips_ner() {
        assert_eq!(default_engine_order("EMAIL"), vec![Pattern, RuleBased, Llm]);
    }

    #[test]
    fn address_and_names_start_at_ner() {
        assert_eq!(default_engine_order("address"), vec![Ner, Llm]);
        assert_eq!(default_engine_order("full_name"), vec![Ner, Llm]);
    }

    #[test]
    fn generic_order_excludes_embedding() {
        let order = default_engine_order("vehicle plate");
        assert_eq!(order, vec![Pattern, RuleBased, Ner, Llm]);
        assert!(!order.contains(&Embedding));
    }

    #[test]
    fn policy_is_deterministic() {
        let a = default_escalation_policy("n1", "date");
        let b = default_escalation_policy("n1", "date");
        assert_eq!(a, b);
        assert_eq!(a.default_engine, Some(Pattern));
        assert_eq!(a.engines.iter().map(|e| e.priority).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }
}
