// Interface layer: MCP tool surface and report rendering
pub mod format;
pub mod server;

pub use server::{DocIndexService, DocSearchService, DocsServer};
