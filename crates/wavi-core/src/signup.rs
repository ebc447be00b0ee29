//! Step-by-step sign-up form.
//!
//! ```text
//! Email -> Code -> Password -> Nickname -> BirthYear -> Gender -> Job -> ProfileImage -> Complete
//! ```
//!
//! Each `submit_*` validates its own field and advances one step; `back`
//! returns to the previous step keeping what was entered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MIN_BIRTH_YEAR: i32 = 1900;
pub const PROFILE_IMAGE_COUNT: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Job {
    Student,
    Salaryman,
    Jobless,
    Ceo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoginType {
    Normal,
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            "UNKNOWN" => Ok(Gender::Unknown),
            other => Err(ValidationError::OutOfRange {
                field: "gender",
                message: format!("'{other}' is not one of MALE, FEMALE, UNKNOWN"),
            }),
        }
    }
}

impl FromStr for Job {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STUDENT" => Ok(Job::Student),
            "SALARYMAN" => Ok(Job::Salaryman),
            "JOBLESS" => Ok(Job::Jobless),
            "CEO" => Ok(Job::Ceo),
            other => Err(ValidationError::OutOfRange {
                field: "job",
                message: format!("'{other}' is not one of STUDENT, SALARYMAN, JOBLESS, CEO"),
            }),
        }
    }
}

/// Body of `POST /api/v1/user/signup/complete`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub code: String,
    pub password: String,
    pub login_type: LoginType,
    pub nickname: String,
    pub birth_year: i32,
    pub gender: Gender,
    pub job: Job,
    pub profile_image: u8,
}

/// Non-blank and containing an `@`.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Empty("email"));
    }
    if !email.contains('@') {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpStep {
    Email,
    Code,
    Password,
    Nickname,
    BirthYear,
    Gender,
    Job,
    ProfileImage,
    Complete,
}

impl SignUpStep {
    fn next(self) -> Self {
        match self {
            SignUpStep::Email => SignUpStep::Code,
            SignUpStep::Code => SignUpStep::Password,
            SignUpStep::Password => SignUpStep::Nickname,
            SignUpStep::Nickname => SignUpStep::BirthYear,
            SignUpStep::BirthYear => SignUpStep::Gender,
            SignUpStep::Gender => SignUpStep::Job,
            SignUpStep::Job => SignUpStep::ProfileImage,
            SignUpStep::ProfileImage | SignUpStep::Complete => SignUpStep::Complete,
        }
    }

    fn previous(self) -> Self {
        match self {
            SignUpStep::Email | SignUpStep::Code => SignUpStep::Email,
            SignUpStep::Password => SignUpStep::Code,
            SignUpStep::Nickname => SignUpStep::Password,
            SignUpStep::BirthYear => SignUpStep::Nickname,
            SignUpStep::Gender => SignUpStep::BirthYear,
            SignUpStep::Job => SignUpStep::Gender,
            SignUpStep::ProfileImage => SignUpStep::Job,
            SignUpStep::Complete => SignUpStep::ProfileImage,
        }
    }

    fn field(self) -> &'static str {
        match self {
            SignUpStep::Email => "email",
            SignUpStep::Code => "code",
            SignUpStep::Password => "password",
            SignUpStep::Nickname => "nickname",
            SignUpStep::BirthYear => "birthYear",
            SignUpStep::Gender => "gender",
            SignUpStep::Job => "job",
            SignUpStep::ProfileImage => "profileImage",
            SignUpStep::Complete => "complete",
        }
    }

    /// Question shown for the step.
    pub fn prompt(self) -> &'static str {
        match self {
            SignUpStep::Email => "E-mail address",
            SignUpStep::Code => "Verification code from the e-mail",
            SignUpStep::Password => "Password",
            SignUpStep::Nickname => "Nickname",
            SignUpStep::BirthYear => "Year of birth",
            SignUpStep::Gender => "Gender (MALE, FEMALE, UNKNOWN)",
            SignUpStep::Job => "Job (STUDENT, SALARYMAN, JOBLESS, CEO)",
            SignUpStep::ProfileImage => "Profile image (0, 1 or 2)",
            SignUpStep::Complete => "Done",
        }
    }
}

impl fmt::Display for SignUpStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// Values collected so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignUpForm {
    pub email: String,
    pub code: String,
    pub password: String,
    pub nickname: String,
    pub birth_year: Option<i32>,
    pub gender: Option<Gender>,
    pub job: Option<Job>,
    pub profile_image: Option<u8>,
}

#[derive(Debug, Clone)]
pub struct SignUpWizard {
    step: SignUpStep,
    form: SignUpForm,
    current_year: i32,
}

impl SignUpWizard {
    /// `current_year` bounds the birth year.
    pub fn new(current_year: i32) -> Self {
        Self {
            step: SignUpStep::Email,
            form: SignUpForm::default(),
            current_year,
        }
    }

    pub fn step(&self) -> SignUpStep {
        self.step
    }

    pub fn form(&self) -> &SignUpForm {
        &self.form
    }

    pub fn is_complete(&self) -> bool {
        self.step == SignUpStep::Complete
    }

    /// Go back one step. No-op on the first step.
    pub fn back(&mut self) -> SignUpStep {
        self.step = self.step.previous();
        self.step
    }

    fn require_step(&self, step: SignUpStep) -> Result<(), ValidationError> {
        if self.step == step {
            Ok(())
        } else {
            Err(ValidationError::WrongStep(step.field()))
        }
    }

    fn advance(&mut self) -> SignUpStep {
        self.step = self.step.next();
        self.step
    }

    pub fn submit_email(&mut self, email: &str) -> Result<SignUpStep, ValidationError> {
        self.require_step(SignUpStep::Email)?;
        validate_email(email)?;
        self.form.email = email.trim().to_string();
        Ok(self.advance())
    }

    pub fn submit_code(&mut self, code: &str) -> Result<SignUpStep, ValidationError> {
        self.require_step(SignUpStep::Code)?;
        let code = code.trim();
        if code.is_empty() {
            return Err(ValidationError::Empty("code"));
        }
        self.form.code = code.to_string();
        Ok(self.advance())
    }

    pub fn submit_password(
        &mut self,
        password: &str,
        confirmation: &str,
    ) -> Result<SignUpStep, ValidationError> {
        self.require_step(SignUpStep::Password)?;
        if password.is_empty() {
            return Err(ValidationError::Empty("password"));
        }
        if password != confirmation {
            return Err(ValidationError::PasswordMismatch);
        }
        self.form.password = password.to_string();
        Ok(self.advance())
    }

    pub fn submit_nickname(&mut self, nickname: &str) -> Result<SignUpStep, ValidationError> {
        self.require_step(SignUpStep::Nickname)?;
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(ValidationError::Empty("nickname"));
        }
        self.form.nickname = nickname.to_string();
        Ok(self.advance())
    }

    pub fn submit_birth_year(&mut self, year: i32) -> Result<SignUpStep, ValidationError> {
        self.require_step(SignUpStep::BirthYear)?;
        if !(MIN_BIRTH_YEAR..=self.current_year).contains(&year) {
            return Err(ValidationError::OutOfRange {
                field: "birthYear",
                message: format!("expected {MIN_BIRTH_YEAR}..={}, got {year}", self.current_year),
            });
        }
        self.form.birth_year = Some(year);
        Ok(self.advance())
    }

    pub fn submit_gender(&mut self, gender: Gender) -> Result<SignUpStep, ValidationError> {
        self.require_step(SignUpStep::Gender)?;
        self.form.gender = Some(gender);
        Ok(self.advance())
    }

    pub fn submit_job(&mut self, job: Job) -> Result<SignUpStep, ValidationError> {
        self.require_step(SignUpStep::Job)?;
        self.form.job = Some(job);
        Ok(self.advance())
    }

    pub fn submit_profile_image(&mut self, image: u8) -> Result<SignUpStep, ValidationError> {
        self.require_step(SignUpStep::ProfileImage)?;
        if image >= PROFILE_IMAGE_COUNT {
            return Err(ValidationError::OutOfRange {
                field: "profileImage",
                message: format!("expected 0..={}, got {image}", PROFILE_IMAGE_COUNT - 1),
            });
        }
        self.form.profile_image = Some(image);
        Ok(self.advance())
    }

    /// Completion body. Fails until every step has been submitted.
    pub fn into_request(self) -> Result<SignUpRequest, ValidationError> {
        self.require_step(SignUpStep::Complete)?;
        let form = self.form;
        match (form.birth_year, form.gender, form.job, form.profile_image) {
            (Some(birth_year), Some(gender), Some(job), Some(profile_image)) => Ok(SignUpRequest {
                email: form.email,
                code: form.code,
                password: form.password,
                login_type: LoginType::Normal,
                nickname: form.nickname,
                birth_year,
                gender,
                job,
                profile_image,
            }),
            _ => Err(ValidationError::WrongStep(SignUpStep::Complete.field())),
        }
    }
}
