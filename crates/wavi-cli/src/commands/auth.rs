use clap::Subcommand;
use wavi_core::Config;

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Log in with e-mail and password
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Read from the terminal when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored access token
    Logout,
    /// Show whether a token is stored
    Status,
    /// Check whether an e-mail address is still free
    CheckEmail {
        email: String,
    },
    /// Set a new password using a mailed verification code
    ResetPassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
    },
}

pub fn run(action: AuthAction, config: &Config) -> CliResult {
    let auth = common::auth(config)?;
    match action {
        AuthAction::Login { email, password } => {
            let email = match email {
                Some(e) => e,
                None => common::require("E-mail")?,
            };
            let password = match password {
                Some(p) => p,
                None => common::require("Password")?,
            };
            common::runtime()?.block_on(auth.login(&email, &password))?;
            println!("logged in as {email}");
        }
        AuthAction::Logout => {
            auth.logout()?;
            println!("logged out");
        }
        AuthAction::Status => {
            println!(
                "{}",
                if auth.is_logged_in()? {
                    "logged in"
                } else {
                    "not logged in"
                }
            );
        }
        AuthAction::CheckEmail { email } => {
            let available = common::runtime()?.block_on(auth.check_email(&email))?;
            println!("{}", if available { "available" } else { "taken" });
        }
        AuthAction::ResetPassword { email, code } => {
            let password = common::require("New password")?;
            let confirmation = common::require("Repeat new password")?;
            if password != confirmation {
                return Err("passwords do not match".into());
            }
            common::runtime()?.block_on(auth.reset_password(&email, &password, &code))?;
            println!("password updated");
        }
    }
    Ok(())
}
