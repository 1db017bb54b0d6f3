// CV tailoring: CV resolution, prompt assembly and the model call.
// All model calls go through llm_client::TailoringModel.

pub mod generator;
pub mod handlers;
pub mod models;
pub mod prompts;
