//! The API table and its wiring into a route table.

use std::sync::Arc;

use tabula_router::{Dispatcher, Method, RouteDescriptor, RouteTable};
use tracing::info;

use crate::config::ApiContext;
use crate::handlers::{ApiHandler, Operation};

/// Every wired (path, verb, operation), relative to the base path.
pub const API_TABLE: &[(&str, Method, Operation)] = &[
    ("/db", Method::Get, Operation::NotImplemented),
    ("/db/_table", Method::Get, Operation::ListTables),
    ("/db/_table/{table_name}", Method::Get, Operation::GetRecords),
    ("/db/_table/{table_name}", Method::Post, Operation::CreateRecords),
    ("/db/_table/{table_name}", Method::Patch, Operation::UpdateRecords),
    ("/db/_table/{table_name}", Method::Delete, Operation::DeleteRecords),
    ("/db/_table/{table_name}/{id}", Method::Get, Operation::GetRecord),
    ("/db/_table/{table_name}/{id}", Method::Patch, Operation::UpdateRecord),
    ("/db/_table/{table_name}/{id}", Method::Delete, Operation::DeleteRecord),
    ("/db/_schema", Method::Get, Operation::NotImplemented),
    ("/db/_schema", Method::Post, Operation::NotImplemented),
    ("/db/_schema", Method::Put, Operation::NotImplemented),
    ("/db/_schema", Method::Patch, Operation::NotImplemented),
    ("/db/_schema/{table_name}", Method::Get, Operation::NotImplemented),
    ("/db/_schema/{table_name}", Method::Post, Operation::NotImplemented),
    ("/db/_schema/{table_name}", Method::Delete, Operation::NotImplemented),
    (
        "/db/_schema/{table_name}/{field_name}",
        Method::Get,
        Operation::NotImplemented,
    ),
];

/// Returns the API table as route descriptors bound to `ctx`.
pub fn route_descriptors(ctx: &Arc<ApiContext>) -> Vec<RouteDescriptor> {
    API_TABLE
        .iter()
        .map(|&(path, method, op)| {
            RouteDescriptor::new(path, method, ApiHandler::new(op, Arc::clone(ctx)))
        })
        .collect()
}

/// Builds the route table under the configured base path.
pub fn build_route_table(ctx: Arc<ApiContext>) -> tabula_router::Result<RouteTable> {
    let table = RouteTable::from_descriptors(&ctx.config.base_path, &route_descriptors(&ctx))?;
    info!(
        base_path = %ctx.config.base_path,
        paths = table.len(),
        routes = API_TABLE.len(),
        "API wired"
    );
    Ok(table)
}

/// Builds a dispatcher over the full API.
pub fn build_dispatcher(ctx: Arc<ApiContext>) -> tabula_router::Result<Dispatcher> {
    Ok(Dispatcher::new(Arc::new(build_route_table(ctx)?)))
}
