//! HTTP client for the clinic chat API.
//!
//! Implements [`clinic_chat_core::ChatGateway`] on top of `reqwest`.

pub mod auth;
pub mod client;
pub mod types;

pub use client::ClinicApiClient;
