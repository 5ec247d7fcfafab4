pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_tickets;
mod m20250301_000003_create_ticket_comments;
mod m20250302_000001_create_sessions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_tickets::Migration),
            Box::new(m20250301_000003_create_ticket_comments::Migration),
            Box::new(m20250302_000001_create_sessions::Migration),
        ]
    }
}
