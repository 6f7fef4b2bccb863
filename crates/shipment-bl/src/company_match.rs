//! Consignee-name fuzzy matching against the company catalog.

use once_cell::sync::Lazy;
use regex::Regex;
use shipment_models::Company;

static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

fn normalize(s: &str) -> String {
    let lower = s.to_lowercase();
    let stripped = PUNCTUATION.replace_all(&lower, " ");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyMatch {
    pub company_id: String,
    pub name: String,
    pub score: f64,
}

fn score(query_norm: &str, query_words: &[&str], candidate_norm: &str) -> f64 {
    if candidate_norm == query_norm {
        return 1.0;
    }
    if query_norm.contains(candidate_norm) || candidate_norm.contains(query_norm) {
        return 0.8;
    }
    let candidate_words: std::collections::HashSet<&str> = candidate_norm.split(' ').collect();
    let matched = query_words
        .iter()
        .filter(|w| candidate_words.contains(*w))
        .count();
    if matched >= 2 {
        0.5 + (matched as f64 / query_words.len().max(1) as f64) * 0.3
    } else {
        0.0
    }
}

/// Scores `query` against every non-trashed company, keeps matches above
/// 0.3, and returns the top 3 sorted by descending score.
pub fn match_company(query: &str, companies: &[Company]) -> Vec<CompanyMatch> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let query_norm = normalize(query);
    let query_words: Vec<&str> = query_norm.split(' ').filter(|w| w.len() > 2).collect();

    let mut matches: Vec<CompanyMatch> = companies
        .iter()
        .filter_map(|company| {
            let candidate_norm = normalize(&company.name);
            let s = score(&query_norm, &query_words, &candidate_norm);
            if s > 0.3 {
                Some(CompanyMatch {
                    company_id: company.id.clone(),
                    name: company.name.clone(),
                    score: (s * 100.0).round() / 100.0,
                })
            } else {
                None
            }
        })
        .collect();

    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
    matches.truncate(3);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn company(id: &str, name: &str) -> Company {
        Company {
            id: id.into(),
            name: name.into(),
            short_name: None,
            account_type: "AFC".into(),
            email: None,
            phone: None,
            approved: true,
            has_platform_access: true,
            trash: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn exact_normalized_match_scores_one() {
        let companies = vec![company("c1", "Acme Logistics Sdn Bhd")];
        let matches = match_company("acme logistics sdn bhd", &companies);
        assert_eq!(matches[0].score, 1.0);
    }

    #[test]
    fn substring_containment_scores_point_eight() {
        let companies = vec![company("c1", "Acme Logistics")];
        let matches = match_company("Acme Logistics Sdn Bhd Malaysia", &companies);
        assert_eq!(matches[0].score, 0.8);
    }

    #[test]
    fn word_overlap_below_threshold_is_dropped() {
        let companies = vec![company("c1", "Pacific Trading Company")];
        let matches = match_company("Atlantic Shipping Group", &companies);
        assert!(matches.is_empty());
    }

    #[test]
    fn keeps_top_three_sorted_descending() {
        let companies = vec![
            company("c1", "Acme Logistics Sdn Bhd"),
            company("c2", "Acme Logistics"),
            company("c3", "Acme Global Logistics Group"),
            company("c4", "Beta Freight"),
        ];
        let matches = match_company("Acme Logistics Sdn Bhd", &companies);
        assert_eq!(matches.len(), 3);
        assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn blank_query_returns_empty() {
        assert!(match_company("", &[company("c1", "Acme")]).is_empty());
    }
}
