pub mod admin;
pub mod feedback;
pub mod profile;
pub mod project;
