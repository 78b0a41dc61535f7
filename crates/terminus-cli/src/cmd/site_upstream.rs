use crate::app::App;
use crate::prompt::Confirm;
use terminus_core::logger::{Logger, TracingLogger};
use terminus_core::model::Model;
use terminus_core::session::Session;
use terminus_core::site::{ApiSite, Site};

pub const EXPERIMENTAL_WARNING: &str =
    "This functionality is experimental. Do not use this on production sites.";
pub const SET_NOTICE: &str = "Set upstream for {site} to {upstream}";

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(app: &App, site_name: &str, upstream_id: &str) -> anyhow::Result<()> {
    let session = app.session()?;
    let site = ApiSite::fetch(session.transport(), site_name, app.poll_policy())?;
    set(&session, &site, &TracingLogger, &app.prompt(), upstream_id)
}

// ---------------------------------------------------------------------------
// set
// ---------------------------------------------------------------------------

/// Point `site` at the upstream `upstream_id` from the current user's
/// upstreams.
///
/// A lookup failure returns before anything is logged. A declined
/// confirmation returns `Ok(())` without touching the site. Errors from the
/// site or its workflow are returned as-is.
pub fn set(
    session: &dyn Session,
    site: &dyn Site,
    logger: &dyn Logger,
    prompt: &dyn Confirm,
    upstream_id: &str,
) -> anyhow::Result<()> {
    let upstream = session.user()?.upstreams()?.get(upstream_id)?.clone();

    logger.warning(EXPERIMENTAL_WARNING, &[]);

    let label = upstream.get("label").unwrap_or_else(|| upstream.id().to_string());
    let question = format!(
        "Are you sure you want to set the upstream for {} to {}?",
        site.name(),
        label
    );
    if !prompt.confirm(&question)? {
        return Ok(());
    }

    let workflow = site.set_upstream(upstream_id)?;
    while !workflow.check_progress()? {}

    logger.notice(SET_NOTICE, &[("site", site.name()), ("upstream", label.as_str())]);
    Ok(())
}
