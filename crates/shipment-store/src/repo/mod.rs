pub mod bl;
pub mod files;
pub mod reference;
pub mod route_nodes;
pub mod shipments;
pub mod users;
pub mod workflows;
