use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use log::{LevelFilter, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use signup::form::{SignupForm, current_year};
use signup::services::{NicknameDirectory, StaticSkills};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let skills = StaticSkills::new(["Rust", "SQL", "Linux", "Kubernetes"])
        .with_latency(Duration::from_millis(150));
    let directory = Arc::new(
        NicknameDirectory::new(["alice", "bob", "manohar"])
            .with_latency(Duration::from_millis(200)),
    );

    let form = SignupForm::build(&skills, directory).await?;
    let _settled = form.on_validation_settled(|status| {
        info!("uniqueness lookup settled, form is now {status:?}; refreshing view");
    });

    info!("initial status: {:?}", form.form().status());

    let root = form.form().root();
    root.field("first_name")?.set_value("Manohar");
    let address = root.group("address")?;
    address.field("full_address")?.set_value("1 Main Street");
    address.field("city")?.set_value("Bengaluru");
    address.field("post_code")?.set_value(560001i64);
    let password = root.group("password")?;
    password.field("password")?.set_value("hunter22");
    password.field("confirm_password")?.set_value("hunter22");

    // A taken nickname: pending on blur, then not_unique.
    let nickname = form.nickname();
    nickname.set_value("alice");
    nickname.commit();
    info!("nickname committed, status: {:?}", nickname.status());
    tokio::time::sleep(Duration::from_millis(300)).await;
    info!("nickname errors: {}", nickname.errors());

    // A free one.
    nickname.set_value("alice_2");
    nickname.commit();
    tokio::time::sleep(Duration::from_millis(300)).await;
    info!("nickname status after retry: {:?}", nickname.status());

    // Adults need a passport.
    form.year_of_birth().set_value(current_year() - 20);
    info!(
        "passport required for an adult: {}",
        !form.passport().is_valid()
    );
    form.passport().set_value("AB123456");

    // Minors do not.
    form.year_of_birth().set_value(current_year() - 10);
    form.passport().set_value("");
    info!("passport status for a minor: {:?}", form.passport().status());

    form.add_phone();
    if let Some(entry) = form.phones().at(0).and_then(|c| c.as_group().cloned()) {
        entry.field("phone")?.set_value("555-0100");
    }
    form.remove_phone(1)?;
    info!("{} phone entry after add+remove", form.phones().len());

    if let Ok(rust) = form.skills().field("Rust") {
        rust.set_value(true);
    }

    info!("final status: {:?}", form.form().status());
    info!("final value: {:?}", form.form().value());
    Ok(())
}
