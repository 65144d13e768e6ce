//! Request parameter validation and resolution.
//!
//! Every value taken from a path or query string passes through one of the
//! validators below before it may influence a statement. A parameter name
//! without a validator is refused outright.

use std::collections::HashMap;

use tabula_router::Request;
use tabula_sql::ident::{is_valid_field_list, is_valid_ident};
use tabula_sql::IdClause;
use tracing::debug;

use crate::error::{ApiError, ValidationError};

/// The parameter names that have a validator.
pub const PARAM_NAMES: &[&str] = &[
    "table_name",
    "fields",
    "id",
    "id_field",
    "ids",
    "limit",
    "offset",
];

type ValidationResult = std::result::Result<String, ValidationError>;

/// `table_name`: a non-empty identifier, returned unchanged.
pub fn table_name(raw: &str) -> ValidationResult {
    debug!(table_name = %raw, "validating");
    if is_valid_ident(raw) {
        Ok(raw.to_string())
    } else {
        Err(ValidationError::TableName(raw.to_string()))
    }
}

/// `fields`: `*` when empty, else comma-separated identifiers, verbatim.
pub fn fields(raw: &str) -> ValidationResult {
    debug!(fields = %raw, "validating");
    if raw.is_empty() {
        return Ok("*".to_string());
    }
    if raw != "*" && is_valid_field_list(raw) {
        Ok(raw.to_string())
    } else {
        Err(ValidationError::Fields(raw.to_string()))
    }
}

/// `id_field`: `id` when empty, else an identifier.
pub fn id_field(raw: &str) -> ValidationResult {
    debug!(id_field = %raw, "validating");
    let name = if raw.is_empty() { "id" } else { raw };
    if is_valid_ident(name) {
        Ok(name.to_string())
    } else {
        Err(ValidationError::IdField(raw.to_string()))
    }
}

fn parse_i64(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

/// `id`: a base-10 signed 64-bit integer, re-rendered canonically.
pub fn id(raw: &str) -> ValidationResult {
    debug!(id = %raw, "validating");
    parse_i64(raw)
        .map(|n| n.to_string())
        .ok_or_else(|| ValidationError::Id(raw.to_string()))
}

/// `ids`: empty, or comma-separated `id` values rejoined with commas.
pub fn ids(raw: &str) -> ValidationResult {
    debug!(ids = %raw, "validating");
    if raw.is_empty() {
        return Ok(String::new());
    }
    let mut normalized = Vec::new();
    for token in raw.split(',') {
        match parse_i64(token) {
            Some(n) => normalized.push(n.to_string()),
            None => return Err(ValidationError::Ids(raw.to_string())),
        }
    }
    Ok(normalized.join(","))
}

/// `limit`: the ceiling when empty, non-positive or above the ceiling.
pub fn limit(raw: &str, max_recs: i64) -> ValidationResult {
    debug!(limit = %raw, max_recs, "validating");
    let n = if raw.is_empty() {
        max_recs
    } else {
        parse_i64(raw).ok_or_else(|| ValidationError::Limit(raw.to_string()))?
    };
    let n = if n <= 0 || n > max_recs { max_recs } else { n };
    Ok(n.to_string())
}

/// `offset`: `0` when empty, else a signed integer.
pub fn offset(raw: &str) -> ValidationResult {
    debug!(offset = %raw, "validating");
    if raw.is_empty() {
        return Ok("0".to_string());
    }
    parse_i64(raw)
        .map(|n| n.to_string())
        .ok_or_else(|| ValidationError::Offset(raw.to_string()))
}

/// The validator set of one API instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validators {
    max_recs: i64,
}

impl Validators {
    /// Creates the set with the given `limit` ceiling.
    pub const fn new(max_recs: i64) -> Self {
        Self { max_recs }
    }

    /// Returns the `limit` ceiling.
    pub const fn max_recs(&self) -> i64 {
        self.max_recs
    }

    /// Returns true if `name` has a validator.
    pub fn knows(name: &str) -> bool {
        PARAM_NAMES.contains(&name)
    }

    /// Applies the validator registered for `name`.
    pub fn validate(&self, name: &str, raw: &str) -> ValidationResult {
        match name {
            "table_name" => table_name(raw),
            "fields" => fields(raw),
            "id" => id(raw),
            "id_field" => id_field(raw),
            "ids" => ids(raw),
            "limit" => limit(raw, self.max_recs),
            "offset" => offset(raw),
            _ => Err(ValidationError::NoValidator(name.to_string())),
        }
    }
}

/// Where a parameter's raw value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    /// Path parameters only.
    Path,
    /// Path parameters, then the query string.
    PathOrQuery,
    /// The query string only.
    Query,
}

impl ParamSource {
    /// Returns the source class of a parameter name.
    pub fn of(name: &str) -> Self {
        match name {
            "table_name" => Self::Path,
            "id" => Self::PathOrQuery,
            _ => Self::Query,
        }
    }
}

/// Normalized parameter values of one request, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedParams {
    values: HashMap<String, String>,
}

impl ValidatedParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a normalized value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Returns a normalized value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns true if `name` was resolved.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of resolved parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The validated table name.
    pub fn table_name(&self) -> Result<&str, ValidationError> {
        self.get("table_name")
            .ok_or_else(|| ValidationError::TableName(String::new()))
    }

    /// The field list, `*` when not resolved.
    pub fn fields(&self) -> &str {
        self.get("fields").unwrap_or("*")
    }

    /// The id column, `id` when not resolved.
    pub fn id_field(&self) -> &str {
        self.get("id_field").unwrap_or("id")
    }

    /// Reads an integer parameter.
    pub fn int(&self, name: &str) -> Result<Option<i64>, ValidationError> {
        match self.get(name) {
            None => Ok(None),
            Some(raw) => parse_i64(raw)
                .map(Some)
                .ok_or_else(|| ValidationError::Id(raw.to_string())),
        }
    }

    /// The `ids` list, empty when not resolved.
    pub fn id_list(&self) -> Result<Vec<i64>, ValidationError> {
        match self.get("ids") {
            None | Some("") => Ok(Vec::new()),
            Some(raw) => raw
                .split(',')
                .map(|token| parse_i64(token).ok_or_else(|| ValidationError::Ids(raw.to_string())))
                .collect(),
        }
    }

    /// Builds the id clause from `id_field` and `id` or `ids`.
    ///
    /// A single `id` takes precedence over `ids`; neither yields a clause
    /// matching every row.
    pub fn id_clause(&self) -> Result<IdClause, ApiError> {
        let id = self.int("id")?;
        let ids = self.id_list()?;
        Ok(IdClause::from_request(self.id_field(), id, &ids)?)
    }
}

/// Resolves named parameters of one request against a validator set.
#[derive(Debug, Clone, Copy)]
pub struct ParamResolver<'a> {
    validators: &'a Validators,
    request: &'a Request,
}

impl<'a> ParamResolver<'a> {
    pub const fn new(validators: &'a Validators, request: &'a Request) -> Self {
        Self {
            validators,
            request,
        }
    }

    fn raw(&self, name: &str) -> Option<&'a str> {
        match ParamSource::of(name) {
            ParamSource::Path => self.request.params.get(name),
            ParamSource::PathOrQuery => self
                .request
                .params
                .get(name)
                .or_else(|| self.request.get_query(name)),
            ParamSource::Query => self.request.get_query(name),
        }
    }

    /// Reads and validates one parameter. An absent value validates as
    /// the empty string.
    pub fn get_param(&self, name: &str) -> Result<String, ValidationError> {
        if !Validators::knows(name) {
            return Err(ValidationError::NoValidator(name.to_string()));
        }
        self.validators.validate(name, self.raw(name).unwrap_or(""))
    }

    /// Like [`ParamResolver::get_param`], but yields `None` when the request
    /// does not carry the parameter at all.
    pub fn get_optional(&self, name: &str) -> Result<Option<String>, ValidationError> {
        if !Validators::knows(name) {
            return Err(ValidationError::NoValidator(name.to_string()));
        }
        self.raw(name)
            .map(|raw| self.validators.validate(name, raw))
            .transpose()
    }

    /// Resolves `names` in order, failing on the first invalid one.
    pub fn fetch_params(&self, names: &[&str]) -> Result<ValidatedParams, ValidationError> {
        let mut params = ValidatedParams::new();
        for name in names {
            params.insert(*name, self.get_param(name)?);
        }
        debug!(?params, "parameters resolved");
        Ok(params)
    }
}
