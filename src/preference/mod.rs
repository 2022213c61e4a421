//! Per-member display preferences (emoji identity).

mod repository;

pub use repository::{MemberDirectory, PreferenceRepository, UserPreference};
