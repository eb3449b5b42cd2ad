//! tripmap - Render interactive travel-planning maps from a JSON list of places

pub mod api;
pub mod config;
pub mod document;
pub mod domain;
pub mod geometry;
pub mod i18n;
pub mod maker;
pub mod render;
