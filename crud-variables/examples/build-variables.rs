use clap::Parser;
use crud_variables::{init_logging, prelude::*};
use std::fs;
use std::path::PathBuf;

/// Print the GraphQL variables of a CRUD operation.
#[derive(Clone, Debug, Parser)]
pub struct Options {
    /// File containing the result of an introspection query.
    #[clap(long, env = "EXAMPLE_INTROSPECTION")]
    introspection: PathBuf,
    /// JSON file overriding the naming conventions of the schema.
    #[clap(long, env = "EXAMPLE_CONVENTIONS")]
    conventions: Option<PathBuf>,
    /// GraphQL type name of the resource, e.g. `Post`.
    #[clap(long)]
    resource: String,
    /// Operation kind, e.g. `GET_LIST` or `UPDATE`.
    #[clap(long)]
    operation: String,
    /// Operation parameters as JSON.
    #[clap(long, default_value = "{}")]
    params: String,
}

fn main() -> color_eyre::Result<()> {
    init_logging();
    let opt = Options::parse();

    let doc = serde_json::from_str(&fs::read_to_string(&opt.introspection)?)?;
    let schema = Schema::from_json(doc)?;
    let conventions = match &opt.conventions {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Conventions::default(),
    };

    let vars = VariableBuilder::with_conventions(&schema, conventions).build_json(
        &Resource::new(opt.resource),
        &opt.operation,
        serde_json::from_str(&opt.params)?,
    )?;
    println!("{}", serde_json::to_string_pretty(&vars)?);
    Ok(())
}
