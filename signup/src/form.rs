//! The registration form: shape, validator wiring and runtime rules.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use reform::conditional::require_when;
use reform::control::{
    ArrayControl, ControlStatus, FieldControl, GroupControl, RecordControl, UpdateOn,
};
use reform::error::{FormError, LookupError};
use reform::events::{ChangeEvent, Subscription};
use reform::form::Form;
use reform::sources::{SkillSource, UniquenessProbe};
use reform::validate::{PasswordMatch, Unique};

/// Labels offered for phone entries; new entries default to the first.
pub const PHONE_LABELS: [&str; 4] = ["Main", "Mobile", "Work", "Home"];

/// Age at which a passport becomes required.
pub const ADULT_AGE: i64 = 18;

/// Selectable years of birth, newest first.
pub fn years() -> Vec<i64> {
    let now = current_year();
    (0..29).map(|offset| now - offset).collect()
}

/// Calendar-year subtraction only, no full date precision.
pub fn is_adult(current_year: i64, year_of_birth: i64) -> bool {
    current_year - year_of_birth >= ADULT_AGE
}

pub fn current_year() -> i64 {
    Utc::now().year() as i64
}

fn phone_group(label: &str, phone: &str) -> GroupControl {
    GroupControl::builder()
        .child("label", FieldControl::new(label))
        .child("phone", FieldControl::new(phone))
        .build()
}

/// The registration form from the playground: personal fields, a
/// nickname with an async uniqueness check, a year-of-birth-driven
/// passport requirement, a nested address group, a dynamic phones array,
/// a skills record seeded from an external source and a password group
/// with a cross-field match rule.
pub struct SignupForm {
    form: Form,
    nickname: FieldControl,
    year_of_birth: FieldControl,
    passport: FieldControl,
    phones: ArrayControl,
    skills: RecordControl,
    _age_gate: Subscription,
}

impl SignupForm {
    /// Build the form. Fetches the skill list once to seed the skills
    /// record; the record is not kept in sync with the source afterwards.
    pub async fn build<S, P>(skills_source: &S, probe: Arc<P>) -> Result<Self, LookupError>
    where
        S: SkillSource,
        P: UniquenessProbe + 'static,
    {
        let skill_names = skills_source.fetch_skills().await?;

        let years = years();
        let default_year = years.last().copied().unwrap_or_else(current_year);

        let first_name = FieldControl::builder("")
            .required()
            .max_length(25)
            .pattern(r"^[a-zA-Z\s.'-]+$")
            .ban_words(["test", "dummy"])
            .build();
        let last_name = FieldControl::builder("KS").required().min_length(2).build();
        let nickname = FieldControl::builder("")
            .required()
            .min_length(2)
            .pattern(r"^[\w.]+$")
            .async_validator(Unique::new(probe))
            .update_on(UpdateOn::Blur)
            .build();
        let email = FieldControl::builder("manohar@gmail.com")
            .required()
            .email()
            .max_length(50)
            .build();
        let year_of_birth = FieldControl::builder(default_year).required().build();
        let passport = FieldControl::builder("").pattern(r"^[A-Z]{2}[0-9]{6}$").build();

        let address = GroupControl::builder()
            .child("full_address", FieldControl::builder("").required().build())
            .child("city", FieldControl::builder("").required().build())
            .child("post_code", FieldControl::builder(0i64).required().build())
            .build();

        let phones = ArrayControl::new(vec![phone_group(PHONE_LABELS[0], "").into()]);

        let skills = RecordControl::new();
        for name in skill_names {
            skills.add_entry(name, FieldControl::new(false));
        }

        let password = GroupControl::builder()
            .child(
                "password",
                FieldControl::builder("").required().min_length(6).build(),
            )
            .child("confirm_password", FieldControl::new(""))
            .validator(PasswordMatch::new("password", "confirm_password"))
            .build();

        let root = GroupControl::builder()
            .child("first_name", first_name)
            .child("last_name", last_name)
            .child("nickname", nickname.clone())
            .child("email", email)
            .child("year_of_birth", year_of_birth.clone())
            .child("passport", passport.clone())
            .child("address", address)
            .child("phones", phones.clone())
            .child("skills", skills.clone())
            .child("password", password)
            .build();

        // Adults must provide a passport; the rule re-evaluates on every
        // year-of-birth change, starting from the initial value.
        let now = current_year();
        let age_gate = require_when(&year_of_birth, &passport, move |value| {
            value.as_int().is_some_and(|year| is_adult(now, year))
        });

        Ok(Self {
            form: Form::new(root),
            nickname,
            year_of_birth,
            passport,
            phones,
            skills,
            _age_gate: age_gate,
        })
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn nickname(&self) -> &FieldControl {
        &self.nickname
    }

    pub fn year_of_birth(&self) -> &FieldControl {
        &self.year_of_birth
    }

    pub fn passport(&self) -> &FieldControl {
        &self.passport
    }

    pub fn phones(&self) -> &ArrayControl {
        &self.phones
    }

    pub fn skills(&self) -> &RecordControl {
        &self.skills
    }

    /// Prepend a blank phone entry.
    pub fn add_phone(&self) {
        self.phones.insert(0, phone_group(PHONE_LABELS[0], ""));
    }

    /// Remove the phone entry at `index`.
    pub fn remove_phone(&self, index: usize) -> Result<(), FormError> {
        self.phones.remove_at(index).map(|_| ())
    }

    /// Run `handler` whenever the form leaves the pending state, i.e.
    /// when an outstanding uniqueness lookup settles and the view should
    /// refresh.
    pub fn on_validation_settled(
        &self,
        handler: impl Fn(ControlStatus) + Send + Sync + 'static,
    ) -> Subscription {
        self.form.status_changes(move |event| {
            // Transitions only fire on change, so a Pending previous
            // status means the lookup just settled.
            if let ChangeEvent::Status {
                previous: ControlStatus::Pending,
                current,
            } = event
            {
                handler(*current);
            }
        })
    }
}
