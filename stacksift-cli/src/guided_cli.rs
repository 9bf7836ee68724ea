//! Guided search command
//!
//! Turns guided choices into a search and runs it, or lists the
//! available choices.

use anyhow::{Context, Result};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use stacksift_core::guided::{GuidedOption, GuidedSearch, GuidedTemplates};
use stacksift_core::search::Session;

use crate::catalog_cli::print_results;
use crate::App;

#[derive(Args, Debug)]
pub struct GuidedArgs {
    /// One-step goal (e.g. ml, scrape-web, visualize)
    #[clap(long, conflicts_with_all = ["have", "want", "list"])]
    pub goal: Option<String>,

    /// What you start from (e.g. csv, images)
    #[clap(long, requires = "want", conflicts_with = "list")]
    pub have: Option<String>,

    /// What you want to do with it (e.g. analyze, visualize)
    #[clap(long, requires = "have", conflicts_with = "list")]
    pub want: Option<String>,

    /// List the available choices and quick searches
    #[clap(long)]
    pub list: bool,

    /// Show at most this many results
    #[clap(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[clap(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct OptionRow {
    #[tabled(rename = "Step")]
    step: &'static str,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Searches")]
    searches: String,
}

fn option_rows<'a>(
    step: &'static str,
    options: &'a [GuidedOption],
) -> impl Iterator<Item = OptionRow> + 'a {
    options.iter().map(move |option| OptionRow {
        step,
        value: option.value.clone(),
        label: option.label.clone(),
        searches: option.searches.join(", "),
    })
}

fn list_choices(templates: &GuidedTemplates, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(templates)?);
        return Ok(());
    }

    let rows: Vec<OptionRow> = option_rows("have", &templates.have)
        .chain(option_rows("want", &templates.want))
        .chain(option_rows("goal", &templates.goals))
        .collect();
    println!("{}", Table::new(&rows).with(Style::rounded()));

    if !templates.quick_searches.is_empty() {
        println!("\nQuick searches:");
        for quick in &templates.quick_searches {
            println!("  {:<28} stacksift search \"{}\"", quick.label, quick.search);
        }
    }
    Ok(())
}

pub fn execute(app: &App, args: &GuidedArgs) -> Result<()> {
    let templates = app
        .config
        .guided_templates()
        .context("Failed to load guided search templates")?;

    if args.list {
        return list_choices(&templates, args.json);
    }

    let mut guided = GuidedSearch::new(&templates);
    let query = match (&args.goal, &args.have, &args.want) {
        (Some(goal), _, _) => Some(guided.choose_goal(goal)?),
        (None, Some(have), Some(want)) => {
            guided.choose_have(have)?;
            guided.choose_want(want)?
        }
        _ => None,
    };

    let Some(action) = query.and_then(|_| guided.query_action()) else {
        anyhow::bail!("Choose --goal, or both --have and --want (see --list)");
    };

    let mut session = Session::new(&app.catalog, app.engine.clone());
    let mut entries = session.dispatch(action).entries().to_vec();
    if !args.json {
        eprintln!("Searching for \"{}\"", session.state().search());
    }

    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }

    print_results(&entries, args.json)
}
