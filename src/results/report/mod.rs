//! Report generation module.

mod json;
#[cfg(test)]
mod tests;
mod text;

pub use self::{
    json::write_json,
    text::{RenderedReport, TextReport},
};
