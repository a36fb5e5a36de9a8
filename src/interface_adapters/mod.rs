// Interface adapters: HTTP protocol, handlers, routing and storage adapters.

pub mod handlers;
pub mod openapi;
pub mod protocol;
pub mod repositories;
pub mod routes;
pub mod state;
