//! Account commands and route resolution.

use std::io::Write;

use shopfront_storefront::access::{Resolution, Route};
use shopfront_storefront::screens::{ForgotPasswordScreen, LoginScreen, Notice, RegisterScreen};
use shopfront_storefront::services::auth::AuthService;

use super::{CliError, Context};
use crate::render;

fn notice_result(notice: Option<&Notice>, out: &mut impl Write) -> Result<(), CliError> {
    match notice {
        Some(Notice::Error(message)) => Err(CliError::Failed(message.clone())),
        Some(Notice::Success(message)) => Ok(writeln!(out, "{message}")?),
        None => Ok(()),
    }
}

pub async fn login(
    ctx: &Context,
    out: &mut impl Write,
    username: String,
    password: String,
) -> Result<(), CliError> {
    let auth = AuthService::new(&ctx.client, &ctx.store);
    let mut screen = LoginScreen::default();
    screen.username = username;
    screen.password = password;
    match screen.submit(&auth).await {
        Some(session) => {
            if let Some(user) = session.user() {
                write!(out, "Logged in as ")?;
                render::user(out, user)?;
            }
            Ok(())
        }
        None => notice_result(screen.notice(), out),
    }
}

pub fn logout(ctx: &Context, out: &mut impl Write) -> Result<(), CliError> {
    AuthService::new(&ctx.client, &ctx.store).logout()?;
    writeln!(out, "Logged out")?;
    Ok(())
}

pub async fn register(
    ctx: &Context,
    out: &mut impl Write,
    username: String,
    email: String,
    password: String,
) -> Result<(), CliError> {
    let auth = AuthService::new(&ctx.client, &ctx.store);
    let mut screen = RegisterScreen::default();
    screen.username = username;
    screen.email = email;
    screen.password = password;
    screen.submit(&auth).await;
    notice_result(screen.notice(), out)
}

pub async fn forgot_password(
    ctx: &Context,
    out: &mut impl Write,
    username: String,
    help_text: String,
    new_password: String,
) -> Result<(), CliError> {
    let auth = AuthService::new(&ctx.client, &ctx.store);
    let mut screen = ForgotPasswordScreen::default();
    screen.username = username;
    screen.help_text = help_text;
    screen.new_password = new_password;
    screen.submit(&auth).await;
    notice_result(screen.notice(), out)
}

pub fn whoami(ctx: &Context, out: &mut impl Write) -> Result<(), CliError> {
    match ctx.session.user() {
        Some(user) => render::user(out, user)?,
        None => writeln!(out, "Not logged in")?,
    }
    Ok(())
}

pub fn route(ctx: &Context, out: &mut impl Write, path: &str) -> Result<(), CliError> {
    let route: Route = path.parse().map_err(CliError::Failed)?;
    match route.resolve(ctx.session.capabilities()) {
        Resolution::Render(route) => writeln!(out, "render {route}")?,
        Resolution::Redirect(target) => writeln!(out, "redirect {target}")?,
        Resolution::Denied => writeln!(out, "Access denied")?,
    }
    Ok(())
}
