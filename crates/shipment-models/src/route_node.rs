use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::RouteRole;

/// One stop on a shipment's route. Exactly one `ORIGIN` and one
/// `DESTINATION` must exist in a shipment's node sequence; intermediate
/// stops carry `TRANSSHIP`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteNode {
    pub port_un_code: String,
    pub port_name: String,
    pub sequence: i16,
    pub role: RouteRole,
    pub scheduled_eta: Option<DateTime<Utc>>,
    pub actual_eta: Option<DateTime<Utc>>,
    pub scheduled_etd: Option<DateTime<Utc>>,
    pub actual_etd: Option<DateTime<Utc>>,
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidRouteNodeSet {
    #[error("route node set must contain exactly one ORIGIN node, found {0}")]
    WrongOriginCount(usize),
    #[error("route node set must contain exactly one DESTINATION node, found {0}")]
    WrongDestinationCount(usize),
}

/// The shipment-level eta/etd mirrored off a normalized node set's
/// ORIGIN/DESTINATION nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MirroredTiming {
    pub etd: Option<DateTime<Utc>>,
    pub eta: Option<DateTime<Utc>>,
}

impl RouteNode {
    /// Validates that `nodes` carries exactly one `ORIGIN` and one
    /// `DESTINATION`, then re-assigns `sequence` to a contiguous `1..=N`
    /// range in the nodes' existing relative order (sorted by their
    /// incoming `sequence`, ties broken by input order). Returns the
    /// shipment-level `etd`/`eta` mirrored off the ORIGIN's
    /// `scheduled_etd` and the DESTINATION's `scheduled_eta`.
    pub fn normalize_sequence(
        nodes: &mut [RouteNode],
    ) -> Result<MirroredTiming, InvalidRouteNodeSet> {
        let origin_count = nodes.iter().filter(|n| n.role == RouteRole::Origin).count();
        if origin_count != 1 {
            return Err(InvalidRouteNodeSet::WrongOriginCount(origin_count));
        }
        let destination_count = nodes
            .iter()
            .filter(|n| n.role == RouteRole::Destination)
            .count();
        if destination_count != 1 {
            return Err(InvalidRouteNodeSet::WrongDestinationCount(destination_count));
        }

        nodes.sort_by_key(|n| n.sequence);
        for (i, node) in nodes.iter_mut().enumerate() {
            node.sequence = (i + 1) as i16;
        }

        let etd = nodes
            .iter()
            .find(|n| n.role == RouteRole::Origin)
            .and_then(|n| n.scheduled_etd);
        let eta = nodes
            .iter()
            .find(|n| n.role == RouteRole::Destination)
            .and_then(|n| n.scheduled_eta);
        Ok(MirroredTiming { etd, eta })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn node(sequence: i16, role: RouteRole) -> RouteNode {
        RouteNode {
            port_un_code: "MYPKG".to_string(),
            port_name: "Port Klang".to_string(),
            sequence,
            role,
            scheduled_eta: None,
            actual_eta: None,
            scheduled_etd: None,
            actual_etd: None,
        }
    }

    #[test]
    fn rejects_missing_origin() {
        let mut nodes = vec![node(1, RouteRole::Destination)];
        assert!(matches!(
            RouteNode::normalize_sequence(&mut nodes),
            Err(InvalidRouteNodeSet::WrongOriginCount(0))
        ));
    }

    #[test]
    fn rejects_duplicate_destination() {
        let mut nodes = vec![
            node(1, RouteRole::Origin),
            node(2, RouteRole::Destination),
            node(3, RouteRole::Destination),
        ];
        assert!(matches!(
            RouteNode::normalize_sequence(&mut nodes),
            Err(InvalidRouteNodeSet::WrongDestinationCount(2))
        ));
    }

    #[test]
    fn renumbers_out_of_order_sequence_contiguously() {
        let mut nodes = vec![
            node(9, RouteRole::Destination),
            node(4, RouteRole::Transship),
            node(1, RouteRole::Origin),
        ];
        RouteNode::normalize_sequence(&mut nodes).unwrap();
        let sequences: Vec<i16> = nodes.iter().map(|n| n.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
        assert_eq!(nodes[0].role, RouteRole::Origin);
        assert_eq!(nodes[2].role, RouteRole::Destination);
    }

    #[test]
    fn mirrors_origin_etd_and_destination_eta() {
        let etd = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let eta = Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap();
        let mut origin = node(1, RouteRole::Origin);
        origin.scheduled_etd = Some(etd);
        let mut destination = node(2, RouteRole::Destination);
        destination.scheduled_eta = Some(eta);
        let mut nodes = vec![origin, destination];

        let timing = RouteNode::normalize_sequence(&mut nodes).unwrap();
        assert_eq!(timing.etd, Some(etd));
        assert_eq!(timing.eta, Some(eta));
    }
}
