//! # request-query
//!
//! Opt-in `sort` / `filter` / `limit` / `page` / `group_by` query-parameter
//! handling for Axum endpoints backed by Sea-ORM.
//!
//! An endpoint handler binds a Sea-ORM select to a [`QueryHandler`] and asks it
//! to interpret the request's parameters; the handler never parses query
//! strings itself and never executes the query (execution stays with the
//! caller):
//!
//! ```rust,ignore
//! use request_query::{FieldGuard, QueryHandler, QueryParams};
//!
//! async fn list_todos(
//!     Query(params): Query<QueryParams>,
//!     State(db): State<DatabaseConnection>,
//! ) -> Result<Json<Vec<todo::Model>>, QueryError> {
//!     let mut handler = QueryHandler::new(params);
//!     handler.set_sort_fields(FieldGuard::allow(["title", "created_at"]));
//!     handler.set_query(todo::Entity::find())?;
//!     handler.handle_filter()?.handle_sort()?.handle_pagination()?;
//!
//!     let query = handler.into_query().expect("bound above");
//!     Ok(Json(query.all(&db).await?))
//! }
//! ```
//!
//! Grouping (`group_by` / `group_map`) reshapes already-materialized rows and
//! needs no bound query; see [`QueryHandler::handle_group_by`].

pub mod errors;
pub mod filter;
pub mod group;
pub mod guard;
pub mod handler;
pub mod interpreter;
pub mod models;
pub mod sort;
pub mod target;

pub use errors::QueryError;
pub use filter::{FilterCondition, FilterOperator};
pub use group::Groups;
pub use guard::{FieldGuard, GuardOutcome};
pub use handler::QueryHandler;
pub use interpreter::RequestQuery;
pub use models::QueryParams;
pub use sort::{SortDirection, SortDirective};
pub use target::QueryTarget;
