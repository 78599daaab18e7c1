use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Stored trimmed; lookups are exact.
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    pub nickname: String,

    /// `USER` or `ADMIN`
    pub role: String,

    pub admin_access: bool,

    pub is_super_admin: bool,

    /// `active` or `deactivated`
    pub status: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::health_profiles::Entity")]
    HealthProfiles,
    #[sea_orm(has_many = "super::daily_log_entries::Entity")]
    DailyLogEntries,
}

impl Related<super::health_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HealthProfiles.def()
    }
}

impl Related<super::daily_log_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyLogEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
