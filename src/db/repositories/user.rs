use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::users;
use crate::models::{NewUser, Role, User};

impl TryFrom<users::Model> for User {
    type Error = anyhow::Error;

    fn try_from(model: users::Model) -> Result<Self> {
        let role = Role::from_column(model.role.as_deref())?;

        Ok(Self {
            id: model.id,
            username: model.username,
            password_hash: model.password_hash,
            role,
            created_at: model.created_at,
        })
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get user by exact (case-sensitive) username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        user.map(User::try_from).transpose()
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        user.map(User::try_from).transpose()
    }

    /// Get any user holding `role`.
    ///
    /// Rows with no stored role count as admins.
    pub async fn get_one_by_role(&self, role: Role) -> Result<Option<User>> {
        let filter = match role {
            Role::Admin => users::Column::Role
                .eq(role.as_str())
                .or(users::Column::Role.is_null())
                .or(users::Column::Role.eq("")),
        };

        let user = users::Entity::find()
            .filter(filter)
            .one(&self.conn)
            .await
            .context("Failed to query user by role")?;

        user.map(User::try_from).transpose()
    }

    /// Insert a new user, assigning a fresh id and creation timestamp
    pub async fn create(&self, new_user: NewUser) -> Result<User> {
        let active = users::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            username: Set(new_user.username),
            password_hash: Set(new_user.password_hash),
            role: Set(Some(new_user.role.as_str().to_string())),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert user")?;

        User::try_from(model)
    }
}
