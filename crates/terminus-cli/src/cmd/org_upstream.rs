use crate::app::App;
use crate::cmd::upstream::{apply_filters, print_upstreams, FilterArgs};
use anyhow::Context;
use terminus_core::model::Model;
use terminus_core::session::Session;
use terminus_core::upstream::fetch_organization_upstreams;

/// Upstreams owned by one of the user's organizations, given by id, name or
/// machine name.
pub fn list(app: &App, organization: &str, filters: &FilterArgs) -> anyhow::Result<()> {
    let session = app.session()?;
    let memberships = session
        .user()?
        .organization_memberships()
        .context("failed to load organization memberships")?;
    let organization = memberships.organization(organization)?;

    let upstreams = fetch_organization_upstreams(session.transport().as_ref(), organization.id())
        .with_context(|| {
            format!(
                "failed to load upstreams for organization {}",
                organization.name().unwrap_or_else(|| organization.id().to_string())
            )
        })?;

    print_upstreams(&apply_filters(upstreams, filters), app.json)
}
