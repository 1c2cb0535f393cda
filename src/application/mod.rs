//! Application services: slug resolution, metadata and structured data.

pub mod error;
pub mod matcher;
pub mod metadata;
pub mod page;
pub mod repos;
pub mod resolver;
pub mod site;
pub mod structured_data;
pub mod text;
