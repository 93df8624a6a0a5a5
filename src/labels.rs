use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const SEPARATORS: &[char] = &[' ', '-', '_', '/', '(', ')'];

/// Canonicalizes a free-text account/entity label.
///
/// Accented characters decompose to their base form, the result is
/// lowercased and separator characters are stripped. Two labels name the
/// same entity iff their normalized forms are equal. Idempotent:
/// `normalize_label(normalize_label(x)) == normalize_label(x)`.
pub fn normalize_label(label: &str) -> String {
    label
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| !SEPARATORS.contains(c))
        .collect()
}

/// What kind of entity a spreadsheet row header denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Bank,
    Cash,
    Investment,
}

/// One prefix-match rule: a normalized label matching any listed prefix
/// receives `category`; `None` marks an ignore rule.
#[derive(Debug, Clone)]
pub struct ClassifierRule {
    pub prefixes: Vec<String>,
    pub category: Option<Category>,
}

/// Ordered rule table mapping normalized labels to entity categories.
///
/// Rules are evaluated in declaration order, so precedence is explicit:
/// the default table checks ignore rules before category rules, and the
/// first match wins.
#[derive(Debug, Clone)]
pub struct ClassifierRules {
    rules: Vec<ClassifierRule>,
}

impl ClassifierRules {
    pub fn new(rules: Vec<ClassifierRule>) -> Self {
        Self { rules }
    }

    /// Classifies a normalized label. `None` means: discard this row,
    /// either because an ignore rule matched or because nothing matched.
    pub fn classify(&self, normalized_label: &str) -> Option<Category> {
        for rule in &self.rules {
            if rule
                .prefixes
                .iter()
                .any(|p| normalized_label.starts_with(p.as_str()))
            {
                return rule.category;
            }
        }
        None
    }
}

impl Default for ClassifierRules {
    fn default() -> Self {
        let rule = |prefixes: &[&str], category: Option<Category>| ClassifierRule {
            prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
            category,
        };

        Self::new(vec![
            rule(&["total", "saldo", "data", "obs"], None),
            rule(&["banco", "bco", "conta"], Some(Category::Bank)),
            rule(&["caixa", "dinheiro", "especie"], Some(Category::Cash)),
            rule(
                &["aplicacao", "invest", "poupanca", "cdb"],
                Some(Category::Investment),
            ),
        ])
    }
}

/// Stable display name for a raw label within one read pass.
///
/// The same bank name can legitimately appear on multiple rows (two
/// accounts at the same bank); the first occurrence keeps the raw label,
/// repeats get a 1-based occurrence suffix. The counter map is owned and
/// threaded by the caller so a pass holds no hidden state.
pub fn dedupe_display_name(raw_label: &str, counters: &mut HashMap<String, u32>) -> String {
    let count = counters.entry(raw_label.to_string()).or_insert(0);
    *count += 1;

    if *count == 1 {
        raw_label.to_string()
    } else {
        format!("{} ({})", raw_label, count)
    }
}

/// One classified spreadsheet row header, fresh per aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityAlias {
    pub raw_label: String,
    pub normalized_key: String,
    pub category: Category,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_accents_and_separators() {
        assert_eq!(normalize_label("Aplicação CDB"), "aplicacaocdb");
        assert_eq!(normalize_label("Caixa - Loja (2)"), "caixaloja2");
        assert_eq!(normalize_label("Banco_do/Brasil"), "bancodobrasil");
    }

    #[test]
    fn test_normalize_idempotent() {
        for label in ["Crédito à Vista", "CAIXA ECONÔMICA", "já normalizado", ""] {
            let once = normalize_label(label);
            assert_eq!(normalize_label(&once), once);
        }
    }

    #[test]
    fn test_classify_ignore_rules_win() {
        let rules = ClassifierRules::default();
        // "Saldo Banco" starts with an ignored prefix even though "banco"
        // appears later in the label.
        assert_eq!(rules.classify(&normalize_label("Saldo Banco")), None);
        assert_eq!(rules.classify(&normalize_label("Total Geral")), None);
    }

    #[test]
    fn test_classify_categories() {
        let rules = ClassifierRules::default();
        assert_eq!(
            rules.classify(&normalize_label("Banco do Brasil")),
            Some(Category::Bank)
        );
        assert_eq!(
            rules.classify(&normalize_label("Caixa Loja")),
            Some(Category::Cash)
        );
        assert_eq!(
            rules.classify(&normalize_label("Aplicação XP")),
            Some(Category::Investment)
        );
        assert_eq!(rules.classify(&normalize_label("Despesas Gerais")), None);
    }

    #[test]
    fn test_custom_rule_order() {
        let rules = ClassifierRules::new(vec![
            ClassifierRule {
                prefixes: vec!["caixa".to_string()],
                category: Some(Category::Bank),
            },
            ClassifierRule {
                prefixes: vec!["caixa".to_string()],
                category: Some(Category::Cash),
            },
        ]);
        // First match wins.
        assert_eq!(rules.classify("caixaloja"), Some(Category::Bank));
    }

    #[test]
    fn test_dedupe_occurrence_suffix() {
        let mut counters = HashMap::new();
        assert_eq!(dedupe_display_name("Itaú", &mut counters), "Itaú");
        assert_eq!(dedupe_display_name("Itaú", &mut counters), "Itaú (2)");
        assert_eq!(dedupe_display_name("Itaú", &mut counters), "Itaú (3)");
        assert_eq!(dedupe_display_name("Bradesco", &mut counters), "Bradesco");
    }
}
