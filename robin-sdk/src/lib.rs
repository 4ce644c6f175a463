//! SDK for the Robin workplace platform
//!
//! This SDK provides:
//! - Typed namespaces over the Core and Places REST resources
//! - Paginated responses and collection of every page of a listing
//! - Grid connections to devices and channels over Bayeux pub/sub

pub mod api;
pub mod client;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod grid;

pub use api::{construct_path, Api, ApiResponse, Paging, RequestClient};
pub use client::Robin;
pub use config::{Environment, RobinConfig, RobinOptions, Service, ServiceUrls, UrlOverrides};
pub use credentials::Credentials;
pub use errors::*;
pub use grid::{
    ChannelGrammar, Connection, Grid, GridOptions, GridTransport, MemoryTransport, TransportEvent,
};
