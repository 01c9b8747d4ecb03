use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: String,
}

/// Public view of a user. The password hash never leaves the store layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Planet {
    pub id: i64,
    pub name: String,
    pub population: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub mass: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub name: String,
    pub model: String,
}

/// Which catalog entity a favorite refers to. Doubles as the `:kind` path
/// segment on the favorites routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteKind {
    Planets,
    Characters,
    Vehicles,
}

impl FavoriteKind {
    /// Join table holding favorites of this kind
    pub fn table(&self) -> &'static str {
        match self {
            Self::Planets => "fav_planets",
            Self::Characters => "fav_characters",
            Self::Vehicles => "fav_vehicles",
        }
    }

    /// Catalog table the favorite points into
    pub fn entity_table(&self) -> &'static str {
        match self {
            Self::Planets => "planets",
            Self::Characters => "characters",
            Self::Vehicles => "vehicles",
        }
    }

    /// Foreign-key column in the join table, also the request body field
    pub fn id_column(&self) -> &'static str {
        match self {
            Self::Planets => "planet_id",
            Self::Characters => "character_id",
            Self::Vehicles => "vehicle_id",
        }
    }

    /// Capitalized entity name for error messages
    pub fn entity_name(&self) -> &'static str {
        match self {
            Self::Planets => "Planet",
            Self::Characters => "Character",
            Self::Vehicles => "Vehicle",
        }
    }

    /// Singular label for error messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Planets => "planet",
            Self::Characters => "character",
            Self::Vehicles => "vehicle",
        }
    }
}

impl std::fmt::Display for FavoriteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Planets => write!(f, "planets"),
            Self::Characters => write!(f, "characters"),
            Self::Vehicles => write!(f, "vehicles"),
        }
    }
}

/// A favorite join row. Queries alias the kind-specific foreign key
/// (`planet_id`, `character_id`, `vehicle_id`) to `entity_id`.
#[derive(Debug, Clone, FromRow)]
pub struct Favorite {
    pub id: i64,
    pub entity_id: i64,
    pub user_id: i64,
}

impl Favorite {
    /// Serialize with the kind-specific foreign key name, matching the
    /// column clients see in the schema.
    pub fn to_json(&self, kind: FavoriteKind) -> Value {
        json!({
            "id": self.id,
            (kind.id_column()): self.entity_id,
            "user_id": self.user_id,
        })
    }
}

// DTOs for API

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body of POST /user/favorites/:kind. Only the field matching the path
/// kind is consulted; the handler rejects a body missing it.
#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    pub user_id: Option<i64>,
    pub planet_id: Option<i64>,
    pub character_id: Option<i64>,
    pub vehicle_id: Option<i64>,
}

impl AddFavoriteRequest {
    pub fn entity_id(&self, kind: FavoriteKind) -> Option<i64> {
        match kind {
            FavoriteKind::Planets => self.planet_id,
            FavoriteKind::Characters => self.character_id,
            FavoriteKind::Vehicles => self.vehicle_id,
        }
    }
}
