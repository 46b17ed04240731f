//! Entry menu: login, registration, exit.

use std::io::{BufRead, Write};

use histopedia_core::validation::{validate_email, validate_password, validate_username};
use histopedia_core::AccessLevel;
use tracing::debug;

use super::{accept, Context, LibrarianMenu, PatronMenu, INVALID_CHOICE};
use crate::commands::auth::{login, register, Registration};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthOption {
    Exit,
    Login,
    Register,
}

impl AuthOption {
    fn from_choice(choice: i64) -> Option<Self> {
        match choice {
            0 => Some(AuthOption::Exit),
            1 => Some(AuthOption::Login),
            2 => Some(AuthOption::Register),
            _ => None,
        }
    }
}

/// The first menu shown; runs until the user exits or input ends.
pub struct AuthenticationMenu;

impl AuthenticationMenu {
    pub async fn run<R: BufRead, W: Write>(ctx: &mut Context<'_, R, W>) -> AppResult<()> {
        match Self::serve(ctx).await {
            Ok(()) | Err(AppError::EndOfInput) => {
                debug!("Authentication menu closed");
                ctx.console.blank()?;
                ctx.console.line(AppError::EndOfInput.user_message())
            }
            Err(e) => Err(e),
        }
    }

    async fn serve<R: BufRead, W: Write>(ctx: &mut Context<'_, R, W>) -> AppResult<()> {
        loop {
            ctx.console.line(format!("Welcome to {}!", ctx.config.library_name))?;
            ctx.console.line("1. Login")?;
            ctx.console.line("2. Register")?;
            ctx.console.line("0. Exit")?;

            let choice = ctx.console.choice("Enter your choice >> ")?;
            let outcome = match choice.and_then(AuthOption::from_choice) {
                Some(AuthOption::Exit) => return Ok(()),
                Some(AuthOption::Login) => Self::login(ctx).await,
                Some(AuthOption::Register) => Self::register(ctx).await,
                None => ctx.console.line(INVALID_CHOICE),
            };
            ctx.report(outcome)?;
            ctx.console.blank()?;
        }
    }

    async fn login<R: BufRead, W: Write>(ctx: &mut Context<'_, R, W>) -> AppResult<()> {
        let email = ctx.console.prompt("Enter your email address: ")?;
        let password = ctx.console.prompt("Enter your password: ")?;

        let Some(user) = login(ctx.db, &email, &password).await? else {
            return ctx.console.line("Invalid email address or password.");
        };

        ctx.console.blank()?;
        match user.access_level {
            AccessLevel::Librarian => LibrarianMenu::new(&user).run(ctx).await,
            AccessLevel::Patron => PatronMenu::new(&user).run(ctx).await,
        }
    }

    async fn register<R: BufRead, W: Write>(ctx: &mut Context<'_, R, W>) -> AppResult<()> {
        let username = ctx
            .console
            .prompt_until("Enter username (3 to 20 characters): ", accept(validate_username))?;
        let email_address = ctx
            .console
            .prompt_until("Enter email address: ", |answer| {
                validate_email(answer.trim()).map(|()| answer.trim().to_string())
            })?;
        let password = ctx
            .console
            .prompt_until("Enter password (at least 5 characters): ", accept(validate_password))?;

        let user = register(
            ctx.db,
            Registration {
                username,
                email_address,
                password,
            },
        )
        .await?;

        ctx.console.line(format!(
            "Registration successful. Your user ID is {}. You can now log in.",
            user.id
        ))?;
        ctx.console.pause()
    }
}
