use sea_orm::entity::prelude::*;

/// A document on an employee's 201 file. `file_url` may carry a data URL,
/// so it is stored as unbounded text.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employee_documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub personnel_id: i32,
    pub title: String,
    pub description: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub file_url: String,
    pub file_type: String,
    pub file_size: i64,
    pub category: String,
    pub is_private: bool,
    pub created_at: DateTime,
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
