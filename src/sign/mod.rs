//! The wooden sign: configuration, label typesetting, geometry and rebuilds.
//!
//! A [`SignConfiguration`](config::SignConfiguration) is turned into a
//! [`SignBlueprint`](blueprint::SignBlueprint) (pure CPU data) which a
//! [`SignNode`](node::SignNode) uploads to the GPU. [`SignModel`](model::SignModel)
//! owns the configuration and makes sure only the latest rebuild is shown.

pub mod blueprint;
pub mod config;
pub mod label;
pub mod model;
pub mod node;
pub mod prism;
pub mod rebuild;
pub mod typeset;
