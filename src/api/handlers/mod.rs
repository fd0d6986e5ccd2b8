mod assets;
mod health;
mod submit;

pub use assets::{page_shell, static_file};
pub use health::health_check;
pub use submit::{submit, SubmitForm};
