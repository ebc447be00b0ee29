use chrono::{Datelike, Local};
use clap::Subcommand;
use wavi_core::signup::{Gender, Job};
use wavi_core::{Config, SignUpStep, SignUpWizard};

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum SignupAction {
    /// Mail a verification code to the address
    Start {
        email: String,
    },
    /// Walk through the sign-up form and create the account.
    ///
    /// Type `back` at any prompt to return to the previous step.
    Complete,
}

pub fn run(action: SignupAction, config: &Config) -> CliResult {
    let auth = common::auth(config)?;
    match action {
        SignupAction::Start { email } => {
            let rt = common::runtime()?;
            if !rt.block_on(auth.check_email(&email))? {
                return Err(format!("{email} is already registered").into());
            }
            rt.block_on(auth.initiate_signup(&email))?;
            println!("verification code sent to {email}");
        }
        SignupAction::Complete => {
            let wizard = fill_wizard(SignUpWizard::new(Local::now().year()))?;
            let request = wizard.into_request()?;
            common::runtime()?.block_on(auth.complete_signup(&request))?;
            println!("account created, log in with `wavi-cli auth login`");
        }
    }
    Ok(())
}

fn fill_wizard(mut wizard: SignUpWizard) -> Result<SignUpWizard, Box<dyn std::error::Error>> {
    while !wizard.is_complete() {
        let step = wizard.step();
        let answer = common::require(step.prompt())?;
        if answer.eq_ignore_ascii_case("back") {
            wizard.back();
            continue;
        }
        let submitted = match step {
            SignUpStep::Email => wizard.submit_email(&answer),
            SignUpStep::Code => wizard.submit_code(&answer),
            SignUpStep::Password => {
                let confirmation = common::require("Repeat password")?;
                wizard.submit_password(&answer, &confirmation)
            }
            SignUpStep::Nickname => wizard.submit_nickname(&answer),
            SignUpStep::BirthYear => match answer.parse::<i32>() {
                Ok(year) => wizard.submit_birth_year(year),
                Err(_) => {
                    eprintln!("not a year: {answer}");
                    continue;
                }
            },
            SignUpStep::Gender => answer
                .parse::<Gender>()
                .and_then(|g| wizard.submit_gender(g)),
            SignUpStep::Job => answer.parse::<Job>().and_then(|j| wizard.submit_job(j)),
            SignUpStep::ProfileImage => match answer.parse::<u8>() {
                Ok(image) => wizard.submit_profile_image(image),
                Err(_) => {
                    eprintln!("not an image number: {answer}");
                    continue;
                }
            },
            SignUpStep::Complete => break,
        };
        if let Err(e) = submitted {
            eprintln!("{e}");
        }
    }
    Ok(wizard)
}
