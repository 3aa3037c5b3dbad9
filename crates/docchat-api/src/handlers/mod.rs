//! HTTP request handlers

pub mod article;
pub mod chat;
pub mod health;
pub mod pdf;
