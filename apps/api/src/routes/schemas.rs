use axum::{extract::Path, Json};

use crate::errors::AppError;
use crate::validation::schema::{schema_by_name, SchemaDescription};

/// GET /api/v1/schemas/:name
/// Declarative description of a persisted shape (`writing_style` or `user_profile`).
pub async fn handle_get_schema(
    Path(name): Path<String>,
) -> Result<Json<SchemaDescription>, AppError> {
    schema_by_name(&name)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Schema {name} not found")))
}
