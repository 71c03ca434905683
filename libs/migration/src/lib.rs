pub use sea_orm_migration::prelude::*;

mod m20260101_000000_bootstrap;
mod m20260101_000001_create_users;
mod m20260101_000002_create_catalog;
mod m20260101_000003_create_content;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000000_bootstrap::Migration),
            Box::new(m20260101_000001_create_users::Migration),
            Box::new(m20260101_000002_create_catalog::Migration),
            Box::new(m20260101_000003_create_content::Migration),
        ]
    }
}

/// Attaches `util.touch_updated_at` to `table`.
pub(crate) async fn add_touch_trigger(manager: &SchemaManager<'_>, table: &str) -> Result<(), DbErr> {
    manager
        .get_connection()
        .execute_unprepared(&format!(
            "CREATE TRIGGER {table}_touch_updated_at \
             BEFORE UPDATE ON {table} \
             FOR EACH ROW EXECUTE FUNCTION util.touch_updated_at()"
        ))
        .await?;
    Ok(())
}
