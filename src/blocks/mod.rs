//! Main module for block parsing functionality

pub mod ast;
pub mod building;
pub mod formats;
pub mod html;
pub mod lexing;
pub mod loader;
pub mod migration;
pub mod parser;
pub mod parsing;
pub mod registry;
pub mod testing;
pub mod token;
pub mod transforms;
pub mod validation;
