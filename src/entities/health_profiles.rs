use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "health_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub account_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub gender: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age_years: i32,
    /// `YYYY-MM-DD`
    pub birth_date: Option<String>,
    pub activity_level: String,
    pub weight_goal: String,
    pub target_weight_kg: f64,
    pub bmi_value: f64,
    pub bmi_status: Option<String>,
    pub ideal_weight_kg: f64,
    pub bmr: i32,
    pub tdee: i32,
    pub goal_calories: i32,
    pub onboarding_completed: bool,
    pub current_onboarding_step: i32,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
