//! Domain entities, validation rules and the ports the wizard depends on.

pub mod batch;
pub mod payment;
pub mod ports;
pub mod reference;
pub mod sanitize;
pub mod service;
pub mod validate;
