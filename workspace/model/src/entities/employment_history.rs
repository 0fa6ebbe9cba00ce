use sea_orm::entity::prelude::*;

/// A prior (or current) engagement on an employee's service record.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employment_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub personnel_id: i32,
    pub organization: String,
    pub position: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub employment_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::personnel::Entity",
        from = "Column::PersonnelId",
        to = "super::personnel::Column::Id"
    )]
    Personnel,
}

impl Related<super::personnel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Personnel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
