//! RAG (Retrieval-Augmented Generation) for answering car problems.
//!
//! Each answer is grounded in exactly one retrieved video and ends with a
//! citation footer pointing back to it.

mod citation;
mod generator;
mod response;

pub use citation::Citation;
pub use generator::{Generator, OpenAIGenerator};
pub use response::{RagEngine, RagResponse};
