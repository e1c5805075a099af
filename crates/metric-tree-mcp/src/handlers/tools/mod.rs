//! Tool call handlers.

mod analysis_dtos;
mod analysis_tools;
mod dispatch;
mod helpers;
mod rag_dtos;
mod rag_tools;
mod status_tools;
mod tree_dtos;
mod tree_tools;
mod validate;
