use crate::app::App;
use crate::output::print_json;
use terminus_core::logger::{Logger, TracingLogger};
use terminus_core::session::SessionStore;

// ---------------------------------------------------------------------------
// whoami
// ---------------------------------------------------------------------------

pub fn whoami(app: &App) -> anyhow::Result<()> {
    let session = app.session()?;
    let profile = session.api_user().profile()?;

    if app.json {
        return print_json(&profile);
    }
    match &profile.email {
        Some(email) => println!("{email}"),
        None => println!("{}", profile.id),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// logout
// ---------------------------------------------------------------------------

pub fn logout(app: &App) -> anyhow::Result<()> {
    let store = SessionStore::new(&app.config.cache_dir()?);
    if store.clear()? {
        TracingLogger.notice("Your saved session has been deleted.", &[]);
    } else {
        TracingLogger.notice("You are not logged in.", &[]);
    }
    Ok(())
}
