//! IaaS network areas and networks

pub mod client;
pub mod models;
pub mod wait;

pub use client::{NetworkAreaClient, NetworkClient};
pub use models::{Network, NetworkArea, NetworkAreaState, NetworkState};
pub use wait::{
    NETWORK_TIMEOUT, create_network_area_wait_handler, create_network_wait_handler,
    delete_network_area_wait_handler, delete_network_wait_handler,
    update_network_area_wait_handler, update_network_wait_handler,
};
