//! One handler per API operation.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tabula_router::{Handler, Reply, Request};
use tracing::{debug, warn};

use crate::config::ApiContext;
use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::params::{ParamResolver, ValidatedParams};
use crate::query;
use crate::records::{
    BodyRecords, IdsResponse, NumChangedResponse, RecordsResponse, TablesResponse,
};

/// The operations reachable through the API table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GET /db/_table`
    ListTables,
    /// `GET /db/_table/{table_name}`
    GetRecords,
    /// `GET /db/_table/{table_name}/{id}`
    GetRecord,
    /// `POST /db/_table/{table_name}`
    CreateRecords,
    /// `PATCH /db/_table/{table_name}`
    UpdateRecords,
    /// `PATCH /db/_table/{table_name}/{id}`
    UpdateRecord,
    /// `DELETE /db/_table/{table_name}`
    DeleteRecords,
    /// `DELETE /db/_table/{table_name}/{id}`
    DeleteRecord,
    /// Wired but answered with 501.
    NotImplemented,
}

impl Operation {
    pub const fn name(self) -> &'static str {
        match self {
            Self::ListTables => "list_tables",
            Self::GetRecords => "get_records",
            Self::GetRecord => "get_record",
            Self::CreateRecords => "create_records",
            Self::UpdateRecords => "update_records",
            Self::UpdateRecord => "update_record",
            Self::DeleteRecords => "delete_records",
            Self::DeleteRecord => "delete_record",
            Self::NotImplemented => "not_implemented",
        }
    }

    /// Runs the operation, turning any error into an error reply.
    pub async fn reply(self, ctx: &ApiContext, req: Request) -> Reply {
        debug!(op = self.name(), path = %req.path, "handling");
        match self.run(ctx, &req).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(op = self.name(), path = %req.path, error = %err, "request failed");
                Reply::error(err.status(), err.to_string())
            }
        }
    }

    async fn run(self, ctx: &ApiContext, req: &Request) -> Result<Reply> {
        let db = ctx.db.as_ref();
        let resolver = ParamResolver::new(&ctx.validators, req);

        match self {
            Self::ListTables => {
                let names = query::table_names(db).await?;
                Ok(Reply::json(200, TablesResponse { names }))
            }
            Self::GetRecords => {
                let mut params = resolver.fetch_params(&[
                    "table_name",
                    "fields",
                    "id_field",
                    "ids",
                    "limit",
                    "offset",
                ])?;
                with_query_id(&resolver, &mut params)?;
                let records = query::select_records(db, &params).await?;
                Ok(Reply::json(200, RecordsResponse { records }))
            }
            Self::GetRecord => {
                let mut params =
                    resolver.fetch_params(&["table_name", "id", "fields", "id_field"])?;
                params.insert("limit", "1");
                params.insert("offset", "0");
                let records = query::select_records(db, &params).await?;
                Ok(Reply::json(200, RecordsResponse { records }))
            }
            Self::CreateRecords => {
                let params = resolver.fetch_params(&["table_name"])?;
                let body: BodyRecords = req.json()?;
                let ids = query::insert_records(db, params.table_name()?, &body.records).await?;
                Ok(Reply::json(201, IdsResponse { ids }))
            }
            Self::UpdateRecords => {
                let mut params = resolver.fetch_params(&["table_name", "id_field", "ids"])?;
                with_query_id(&resolver, &mut params)?;
                update(db, req, &params).await
            }
            Self::UpdateRecord => {
                let params = resolver.fetch_params(&["table_name", "id", "id_field"])?;
                update(db, req, &params).await
            }
            Self::DeleteRecords => {
                let mut params = resolver.fetch_params(&["table_name", "id_field", "ids"])?;
                with_query_id(&resolver, &mut params)?;
                let num_changed = query::delete_records(db, &params).await?;
                Ok(Reply::json(200, NumChangedResponse { num_changed }))
            }
            Self::DeleteRecord => {
                let params = resolver.fetch_params(&["table_name", "id", "id_field"])?;
                let num_changed = query::delete_records(db, &params).await?;
                Ok(Reply::json(200, NumChangedResponse { num_changed }))
            }
            Self::NotImplemented => Err(ApiError::NotImplemented),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Collection routes also honor a single `id` from the query string.
fn with_query_id(resolver: &ParamResolver<'_>, params: &mut ValidatedParams) -> Result<()> {
    if let Some(id) = resolver.get_optional("id")? {
        params.insert("id", id);
    }
    Ok(())
}

/// Applies the first body record to the rows named by `params`.
async fn update(db: &dyn Database, req: &Request, params: &ValidatedParams) -> Result<Reply> {
    let body: BodyRecords = req.json()?;
    let record = body
        .records
        .first()
        .ok_or_else(|| ApiError::Body("update: no data records in body".to_string()))?;
    let num_changed = query::update_records(db, params, record).await?;
    Ok(Reply::json(200, NumChangedResponse { num_changed }))
}

/// Binds an [`Operation`] to the context it runs against.
#[derive(Clone)]
pub struct ApiHandler {
    op: Operation,
    ctx: Arc<ApiContext>,
}

impl ApiHandler {
    pub fn new(op: Operation, ctx: Arc<ApiContext>) -> Self {
        Self { op, ctx }
    }

    pub const fn operation(&self) -> Operation {
        self.op
    }
}

impl fmt::Debug for ApiHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiHandler").field(&self.op).finish()
    }
}

impl Handler for ApiHandler {
    fn call(&self, req: Request) -> BoxFuture<'static, Reply> {
        let op = self.op;
        let ctx = Arc::clone(&self.ctx);
        async move { op.reply(&ctx, req).await }.boxed()
    }
}
