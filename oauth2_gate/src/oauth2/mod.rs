mod client;
mod errors;
mod main;
mod types;

pub use client::{HttpClient, HttpResponse, ReqwestClient};
pub use errors::OAuth2Error;
pub use main::{
    DEFAULT_DESTINATION, GateDecision, authenticated_email, begin_authorization, check_login,
    complete_authorization, email_is_allowed, handle_callback, is_authenticated, redirect_uri,
    sign_out, stored_token, take_destination,
};
pub use types::{AuthorizedUser, CallbackParams, Redirect, Token, UserDetails};
