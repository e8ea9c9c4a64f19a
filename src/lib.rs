pub mod app;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod imdb;
pub mod import;
pub mod models;
pub mod omdb;
pub mod routes;
pub mod store;
