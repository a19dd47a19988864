//! Credential forms: login and registration.

mod render;
mod state;
mod update;

pub use render::render_form;
pub use state::{AuthForm, AuthRequest, FormField, FormKind, PopupOutcome};
pub use update::{FormOutcome, begin, finish, handle_form_key};
