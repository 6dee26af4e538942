use sea_orm::{
    entity::prelude::*, sea_query::LikeExpr, ActiveValue::NotSet, ConnectionTrait, DatabaseConnection, DbBackend,
    PaginatorTrait, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "spaceship")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub series: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A spaceship as handed to `save`: `id` is `None` until storage assigns one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceshipDraft {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub series: String,
}

impl SpaceshipDraft {
    pub fn new(name: impl Into<String>, series: impl Into<String>) -> Self {
        Self { id: None, name: name.into(), series: series.into() }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

pub async fn create(db: &DatabaseConnection, name: &str, series: &str) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        series: Set(series.to_string()),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// Zero-based page of all spaceships ordered by id.
pub async fn find_page(db: &DatabaseConnection, page: u64, size: u64) -> Result<Vec<Model>, ModelError> {
    if size == 0 {
        return Err(ModelError::Validation("page size must be at least 1".into()));
    }
    let rows = Entity::find()
        .order_by_asc(Column::Id)
        .paginate(db, size)
        .fetch_page(page)
        .await?;
    Ok(rows)
}

/// Spaceships whose name contains `fragment`, ordered by id. `%`, `_` and `\` match literally.
pub async fn find_by_name_contains(db: &DatabaseConnection, fragment: &str) -> Result<Vec<Model>, ModelError> {
    let pattern = format!("%{}%", escape_like(fragment));
    let rows = Entity::find()
        .filter(Column::Name.like(LikeExpr::new(pattern).escape('\\')))
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

/// Replace name/series of `id`, inserting a row under that id when none exists.
pub async fn upsert(db: &DatabaseConnection, id: i64, name: &str, series: &str) -> Result<Model, ModelError> {
    match Entity::find_by_id(id).one(db).await? {
        Some(existing) => {
            let mut am: ActiveModel = existing.into();
            am.name = Set(name.to_string());
            am.series = Set(series.to_string());
            Ok(am.update(db).await?)
        }
        None => {
            let am = ActiveModel {
                id: Set(id),
                name: Set(name.to_string()),
                series: Set(series.to_string()),
            };
            let created = am.insert(db).await?;
            sync_id_sequence(db).await?;
            Ok(created)
        }
    }
}

/// Returns true if a row was removed.
pub async fn delete_by_id(db: &DatabaseConnection, id: i64) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

// An explicit-id insert does not advance the PostgreSQL sequence; SQLite AUTOINCREMENT tracks max rowid itself.
async fn sync_id_sequence(db: &DatabaseConnection) -> Result<(), ModelError> {
    if db.get_database_backend() != DbBackend::Postgres {
        return Ok(());
    }
    db.execute_unprepared(
        "SELECT setval(pg_get_serial_sequence('spaceship', 'id'), (SELECT MAX(id) FROM spaceship))",
    )
    .await?;
    Ok(())
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
