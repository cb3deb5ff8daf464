//! Main module for the org parser and its writers

pub mod ast;
pub mod config;
pub mod document;
pub mod error;
pub mod formats;
pub mod inlines;
pub mod lexing;
pub mod parsing;
pub mod token;
