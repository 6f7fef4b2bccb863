//! Domain types shared by every component of the shipment lifecycle
//! engine. Nothing in this crate performs I/O or enforces a state-machine
//! rule; it exists purely to give the rest of the workspace a single,
//! serde-friendly vocabulary for shipments, tasks, and their JSON-column
//! payloads.

pub mod enums;
pub mod id;
pub mod payloads;
pub mod reference;
pub mod route_node;
pub mod shipment;
pub mod task;

pub use enums::*;
pub use id::{CountId, InvalidShipmentId, ShipmentId};
pub use payloads::*;
pub use reference::{AuditLogEntry, Company, FileTag, Port, PortTerminal, ShipmentFile, UserIam};
pub use route_node::{InvalidRouteNodeSet, MirroredTiming, RouteNode};
pub use shipment::{Shipment, ShipmentWorkflow};
pub use task::Task;
