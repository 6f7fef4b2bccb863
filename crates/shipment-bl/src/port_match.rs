//! Free-text port label → UN/LOCODE matching. Checked in order: a static
//! alias dictionary, a direct 5-letter UN code, an exact name match
//! against the catalog, then substring containment either way.

use shipment_models::Port;

/// Common free-text port names/abbreviations that don't resolve to a
/// catalog entry by exact or substring name match. Grounded on the
/// legacy alias table; kept as a flat list rather than split by region
/// since lookups are a single hash-map hit either way.
const ALIASES: &[(&str, &str)] = &[
    ("PORT KELANG", "MYPKG"),
    ("KELANG", "MYPKG"),
    ("PORT KLANG", "MYPKG"),
    ("KLANG", "MYPKG"),
    ("TANJUNG PELEPAS", "MYTPP"),
    ("PTP", "MYTPP"),
    ("TANJUNG PRIOK", "IDJKT"),
    ("PRIOK", "IDJKT"),
    ("JAKARTA", "IDJKT"),
    ("LAEM CHABANG", "THLCH"),
    ("HAIPHONG", "VNHPH"),
    ("HO CHI MINH", "VNSGN"),
    ("SAIGON", "VNSGN"),
    ("VUNG TAU", "VNVUT"),
    ("SHANGHAI", "CNSHA"),
    ("NINGBO", "CNNBO"),
    ("SHENZHEN", "CNSZX"),
    ("YANTIAN", "CNYTN"),
    ("GUANGZHOU", "CNGZU"),
    ("NANSHA", "CNNSA"),
    ("BUSAN", "KRPUS"),
    ("PUSAN", "KRPUS"),
    ("HAMBURG", "DEHAM"),
    ("BREMERHAVEN", "DEBRV"),
    ("ROTTERDAM", "NLRTM"),
    ("ANTWERP", "BEANR"),
    ("FELIXSTOWE", "GBFXT"),
    ("SINGAPORE", "SGSIN"),
    ("HONG KONG", "HKHKG"),
    ("DUBAI", "AEDXB"),
    ("JEBEL ALI", "AEJEA"),
    ("COLOMBO", "LKCMB"),
    ("CHENNAI", "INMAA"),
    ("MUNDRA", "INMUN"),
    ("NHAVA SHEVA", "INNSA"),
    ("JAWAHARLAL NEHRU", "INNSA"),
    ("SYDNEY", "AUSYD"),
    ("MELBOURNE", "AUMEL"),
    ("LOS ANGELES", "USLAX"),
    ("LONG BEACH", "USLGB"),
    ("NEW YORK", "USNYC"),
    ("SAVANNAH", "USSAV"),
    ("PIRAEUS", "GRPIR"),
];

fn alias_lookup(label: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == label)
        .map(|(_, code)| *code)
}

fn looks_like_un_code(label: &str) -> bool {
    label.len() == 5 && label.chars().all(|c| c.is_ascii_alphabetic())
}

/// Matches `label` (already expected to be free text off a BL) against
/// the alias table, then the ports catalog. Returns `None` when nothing
/// matches at any stage.
pub fn match_port(label: &str, catalog: &[Port]) -> Option<String> {
    if label.is_empty() {
        return None;
    }
    let upper = label.to_uppercase();
    let upper = upper.trim();

    if let Some(code) = alias_lookup(upper) {
        return Some(code.to_string());
    }

    if looks_like_un_code(upper) && catalog.iter().any(|p| p.un_code == upper) {
        return Some(upper.to_string());
    }

    if let Some(port) = catalog.iter().find(|p| p.name.to_uppercase() == upper) {
        return Some(port.un_code.clone());
    }

    catalog
        .iter()
        .find(|p| {
            let name = p.name.to_uppercase();
            upper.contains(name.as_str()) || name.contains(upper)
        })
        .map(|p| p.un_code.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Port> {
        vec![
            Port {
                un_code: "SGSIN".into(),
                name: "Singapore".into(),
                country: Some("Singapore".into()),
                country_code: Some("SG".into()),
                port_type: "SEA".into(),
                terminals: vec![],
            },
            Port {
                un_code: "MYPKG".into(),
                name: "Port Klang".into(),
                country: Some("Malaysia".into()),
                country_code: Some("MY".into()),
                port_type: "SEA".into(),
                terminals: vec![],
            },
        ]
    }

    #[test]
    fn alias_hit_beats_everything() {
        assert_eq!(
            match_port("port kelang", &catalog()),
            Some("MYPKG".to_string())
        );
    }

    #[test]
    fn direct_un_code() {
        assert_eq!(match_port("sgsin", &catalog()), Some("SGSIN".to_string()));
    }

    #[test]
    fn exact_name_match() {
        assert_eq!(
            match_port("Singapore", &catalog()),
            Some("SGSIN".to_string())
        );
    }

    #[test]
    fn substring_match() {
        assert_eq!(
            match_port("Port Klang Terminal 1", &catalog()),
            Some("MYPKG".to_string())
        );
    }

    #[test]
    fn unknown_returns_none() {
        assert_eq!(match_port("Atlantis", &catalog()), None);
    }

    #[test]
    fn empty_label_returns_none() {
        assert_eq!(match_port("", &catalog()), None);
    }
}
