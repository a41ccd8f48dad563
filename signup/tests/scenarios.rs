//! End-to-end scenarios against the registration form.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use reform::control::ControlStatus;
use reform::validate::keys;
use reform::value::Value;

use signup::form::{ADULT_AGE, SignupForm, current_year, is_adult, years};
use signup::services::{NicknameDirectory, StaticSkills, UnreachableDirectory};

async fn build_form() -> SignupForm {
    let skills = StaticSkills::new(["Rust", "SQL", "Linux"]);
    let directory = Arc::new(
        NicknameDirectory::new(["alice", "bob"]).with_latency(Duration::from_millis(50)),
    );
    SignupForm::build(&skills, directory)
        .await
        .expect("form builds")
}

#[test]
fn test_year_helpers() {
    let now = current_year();
    let list = years();
    assert_eq!(list.first().copied(), Some(now));
    assert!(list.windows(2).all(|w| w[0] == w[1] + 1));

    assert!(is_adult(now, now - ADULT_AGE));
    assert!(!is_adult(now, now - ADULT_AGE + 1));
}

#[tokio::test(start_paused = true)]
async fn test_skills_seeded_once_from_source() {
    let form = build_form().await;
    assert_eq!(
        form.skills().keys(),
        vec!["Linux".to_string(), "Rust".to_string(), "SQL".to_string()]
    );
    // Flags start unchecked and are valid.
    assert!(form.skills().is_valid());
    form.skills().field("Rust").unwrap().set_value(true);
    let value = form.skills().value();
    assert_eq!(value.as_map().unwrap()["Rust"], Value::from(true));
}

#[tokio::test(start_paused = true)]
async fn test_passport_requirement_follows_year_of_birth() {
    let form = build_form().await;
    let now = current_year();

    // An adult must provide a passport.
    form.year_of_birth().set_value(now - 20);
    assert!(form.passport().has_validator(keys::REQUIRED));
    assert_eq!(form.passport().status(), ControlStatus::Invalid);
    assert!(form.passport().is_dirty());

    form.passport().set_value("AB123456");
    assert!(form.passport().is_valid());

    // A minor does not; the requirement lifts immediately.
    form.year_of_birth().set_value(now - 10);
    form.passport().set_value("");
    assert!(!form.passport().has_validator(keys::REQUIRED));
    assert!(form.passport().is_valid());

    // Exactly at the boundary counts as adult (calendar years only).
    form.year_of_birth().set_value(now - ADULT_AGE);
    assert!(form.passport().has_validator(keys::REQUIRED));
    assert_eq!(form.passport().status(), ControlStatus::Invalid);
}

#[tokio::test(start_paused = true)]
async fn test_passport_format_still_checked_when_required() {
    let form = build_form().await;
    form.year_of_birth().set_value(current_year() - 30);

    form.passport().set_value("ab123456");
    let errors = form.passport().errors();
    assert!(errors.contains(keys::PATTERN));
    assert!(!errors.contains(keys::REQUIRED));
}

#[tokio::test(start_paused = true)]
async fn test_phone_entries_add_at_front_and_remove() {
    let form = build_form().await;
    assert_eq!(form.phones().len(), 1);

    form.add_phone();
    assert_eq!(form.phones().len(), 2);
    let first = form.phones().at(0).unwrap();
    let label = first.value();
    assert_eq!(label.as_map().unwrap()["label"], Value::from("Main"));
    assert_eq!(label.as_map().unwrap()["phone"], Value::from(""));

    form.remove_phone(0).unwrap();
    assert_eq!(form.phones().len(), 1);
    assert!(form.remove_phone(5).is_err());
}

#[tokio::test(start_paused = true)]
async fn test_taken_nickname_fails_after_blur() {
    let form = build_form().await;
    let nickname = form.nickname();

    let settled = Arc::new(AtomicUsize::new(0));
    let _refresh = form.on_validation_settled({
        let settled = Arc::clone(&settled);
        move |_| {
            settled.fetch_add(1, Ordering::SeqCst);
        }
    });

    nickname.set_value("alice");
    nickname.commit();
    assert_eq!(nickname.status(), ControlStatus::Pending);
    assert_eq!(form.form().status(), ControlStatus::Pending);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(nickname.status(), ControlStatus::Invalid);
    assert_eq!(nickname.errors().get(keys::NOT_UNIQUE).unwrap()["id"], "alice");
    // Leaving the pending state triggered exactly one refresh.
    assert_eq!(settled.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_free_nickname_passes_and_supersession_holds() {
    let form = build_form().await;
    let nickname = form.nickname();

    nickname.set_value("alice");
    nickname.commit();
    // Editing before the lookup resolves discards its result.
    nickname.set_value("charlie");
    nickname.commit();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(nickname.status(), ControlStatus::Valid);
    assert!(!nickname.errors().contains(keys::NOT_UNIQUE));
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_directory_leaves_nickname_valid() {
    // The form keeps the default failure policy: a lookup that cannot be
    // made is not held against the user.
    let skills = StaticSkills::new(["Rust"]);
    let form = SignupForm::build(&skills, Arc::new(UnreachableDirectory))
        .await
        .expect("form builds");

    form.nickname().set_value("charlie");
    form.nickname().commit();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(form.nickname().status(), ControlStatus::Valid);
}

#[tokio::test(start_paused = true)]
async fn test_banned_first_name_is_rejected() {
    let form = build_form().await;
    let first_name = form.form().root().field("first_name").unwrap();

    first_name.set_value("dummy");
    assert_eq!(
        first_name.errors().get(keys::BANNED_WORD).unwrap()["word"],
        "dummy"
    );

    first_name.set_value("Manohar");
    assert!(first_name.is_valid());
}

#[tokio::test(start_paused = true)]
async fn test_completed_form_is_valid() {
    let form = build_form().await;
    let root = form.form().root();

    root.field("first_name").unwrap().set_value("Manohar");
    root.field("last_name").unwrap().set_value("KS");
    root.field("email").unwrap().set_value("manohar@gmail.com");

    form.nickname().set_value("charlie");
    form.nickname().commit();
    tokio::time::sleep(Duration::from_millis(100)).await;

    // The default year of birth is the oldest selectable one: an adult,
    // so the passport is required from the start.
    assert!(form.passport().has_validator(keys::REQUIRED));
    form.passport().set_value("AB123456");

    let address = root.group("address").unwrap();
    address.field("full_address").unwrap().set_value("1 Main Street");
    address.field("city").unwrap().set_value("Bengaluru");
    address.field("post_code").unwrap().set_value(560001i64);

    let password = root.group("password").unwrap();
    password.field("password").unwrap().set_value("hunter22");
    password.field("confirm_password").unwrap().set_value("hunter22");

    assert_eq!(form.form().status(), ControlStatus::Valid);
}

#[tokio::test(start_paused = true)]
async fn test_password_mismatch_scoped_to_group() {
    let form = build_form().await;
    let password = form.form().root().group("password").unwrap();

    password.field("password").unwrap().set_value("hunter22");
    assert!(password.errors().is_empty());

    password.field("confirm_password").unwrap().set_value("hunter23");
    assert!(password.errors().contains(keys::PASSWORD_MISMATCH));

    password.field("confirm_password").unwrap().set_value("hunter22");
    assert!(password.errors().is_empty());
}
