//! Category models for database operations.

use std::io::Write;

use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use diesel::{AsExpression, FromSqlRow};
use jiff_diesel::Timestamp;
use serde::{Deserialize, Serialize};

// ============================================================================
// Enums
// ============================================================================

/// Whether a category collects income or expenses.
///
/// Fixed at creation; updates never touch it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "INCOME",
            CategoryType::Expense => "EXPENSE",
        }
    }
}

impl diesel::query_builder::QueryId for CategoryType {
    type QueryId = CategoryType;
    const HAS_STATIC_QUERY_ID: bool = false;
}

impl ToSql<Text, Pg> for CategoryType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Pg> for CategoryType {
    fn from_sql(
        bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        match s.as_str() {
            "INCOME" => Ok(CategoryType::Income),
            "EXPENSE" => Ok(CategoryType::Expense),
            _ => Err(format!("Unrecognized category type: {}", s).into()),
        }
    }
}

// ============================================================================
// Category Models (Query/Insert/Patch)
// ============================================================================

/// Category row as read from the store.
///
/// Soft-deleted rows are filtered out by every query, so `deleted_at` is
/// normally `None` here and is never serialized to clients.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub category_type: CategoryType,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Category to be inserted; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory {
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub category_type: CategoryType,
}

/// Partial update of a category.
///
/// A field is changed only when it is `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}
