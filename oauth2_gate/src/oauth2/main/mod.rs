mod authorize;
mod callback;
mod gate;
mod provider;
mod utils;

pub use authorize::begin_authorization;
pub use callback::{DEFAULT_DESTINATION, complete_authorization, handle_callback, take_destination};
pub use gate::{
    GateDecision, authenticated_email, check_login, is_authenticated, sign_out, stored_token,
};
pub use utils::{email_is_allowed, redirect_uri};
