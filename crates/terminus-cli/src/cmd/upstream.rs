use crate::app::App;
use crate::output::{print_fields, print_json, print_table};
use anyhow::Context;
use clap::Args;
use terminus_core::model::Model;
use terminus_core::session::Session;
use terminus_core::upstream::Upstreams;

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Only upstreams for this framework (e.g. drupal8, wordpress)
    #[arg(long)]
    pub framework: Option<String>,
    /// Only upstreams whose name contains this text
    #[arg(long)]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

pub fn list(app: &App, org: Option<&str>, filters: &FilterArgs) -> anyhow::Result<()> {
    let session = app.session()?;
    let user = session.user()?;
    let mut upstreams = user.upstreams().context("failed to load upstreams")?;

    if let Some(org) = org {
        let memberships = user
            .organization_memberships()
            .context("failed to load organization memberships")?;
        let organization = memberships.organization(org)?;
        upstreams = upstreams.filter_by_organization(organization.id());
    }

    print_upstreams(&apply_filters(upstreams, filters), app.json)
}

pub(crate) fn apply_filters(upstreams: Upstreams, filters: &FilterArgs) -> Upstreams {
    let mut upstreams = upstreams;
    if let Some(framework) = &filters.framework {
        upstreams = upstreams.filter_by_framework(framework);
    }
    if let Some(name) = &filters.name {
        upstreams = upstreams.filter_by_name(name);
    }
    upstreams
}

pub(crate) fn print_upstreams(upstreams: &Upstreams, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&upstreams.summaries());
    }
    if upstreams.is_empty() {
        println!("You have no upstreams.");
        return Ok(());
    }
    print_table(
        &["ID", "Name", "Machine Name", "Type", "Framework"],
        upstream_rows(upstreams),
    );
    Ok(())
}

fn upstream_rows(upstreams: &Upstreams) -> Vec<Vec<String>> {
    upstreams
        .summaries()
        .into_iter()
        .map(|s| vec![s.id, s.label, s.machine_name, s.upstream_type, s.framework])
        .collect()
}

// ---------------------------------------------------------------------------
// info
// ---------------------------------------------------------------------------

pub fn info(app: &App, upstream_id: &str) -> anyhow::Result<()> {
    let session = app.session()?;
    let upstream = session.user()?.upstreams()?.get(upstream_id)?.clone();

    if app.json {
        return print_json(&upstream.summary());
    }

    let mut fields = vec![
        ("ID", upstream.id().to_string()),
        ("Name", upstream.label().unwrap_or_default()),
        ("Machine Name", upstream.machine_name().unwrap_or_default()),
        ("Type", upstream.upstream_type().unwrap_or_default()),
        ("Framework", upstream.framework().unwrap_or_default()),
    ];
    if let Some(org) = upstream.organization_id() {
        fields.push(("Organization", org));
    }
    if let Some(url) = upstream.repository_url() {
        fields.push(("Repository", url));
    }
    print_fields(&fields);
    Ok(())
}
