pub mod api;
pub mod api_docs;
pub mod config;
pub mod db;
pub mod meta_ads;
pub mod models;
pub mod pixel;
pub mod seed;
pub mod services;
