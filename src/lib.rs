//! Storefront gateway: an HTTP API over an Odoo-style ERP.
//!
//! The gateway fetches products, categories and ribbons over JSON-RPC,
//! aggregates per-category product counts into flat lists and nested trees,
//! and serves everything behind an in-process TTL cache.

#![allow(async_fn_in_trait)]

pub mod cache;
pub mod domain;
pub mod dto;
pub mod erp;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
