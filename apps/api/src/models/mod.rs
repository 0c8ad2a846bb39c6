pub mod email;
pub mod profile;
pub mod settings;
pub mod style;
