//! CRUD Variables translates generic CRUD intents into the variables of a GraphQL operation whose
//! input shape is only known at runtime, through a previously fetched introspection document. It
//! consists of three layers:
//!
//! * A [schema] index, which wraps the introspection document and answers questions about the
//!   shape of the generated input types (`PostCreateInput`, `AuthorCreateOneInput`,
//!   `PostWhereInput`, ...). The names of the types the builder looks for are derived from a
//!   single, substitutable [naming convention](convention).
//! * A [variable builder](variables::VariableBuilder), which dispatches on the requested
//!   [operation](variables::Operation) and shapes filters, pagination, ordering and payloads.
//! * The [relation resolver](variables::relation) and [diff engine](variables::diff) the builder
//!   uses for relational fields: the resolver decides between `connect`, `create`, `disconnect`
//!   and `update` for each relation, and the diff engine computes the minimal edit script for
//!   to-many relations on update.
//!
//! The whole pipeline is synchronous and pure. A [`Schema`](schema::Schema) can be built once and
//! shared between any number of concurrent callers.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

pub use async_graphql::{value, Name, Value, Variables};

pub mod convention;
pub mod error;
pub mod prelude;
pub mod schema;
pub mod variables;

pub use error::Error;

/// Initialize tracing.
pub fn init_logging() {
    static ONCE: Once = Once::new();

    ONCE.call_once(|| {
        color_eyre::install().unwrap();
        tracing_subscriber::fmt()
            .with_ansi(true)
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    });
}
