// services/design.rs - Design validation, normalization and onboarding completion

use std::collections::HashMap;

use uuid::Uuid;

use crate::access::ProjectState;
use crate::database::models::{Design, DesignInput};
use crate::database::PortalStore;
use crate::error::ApiError;

pub const MAX_CORNER_RADIUS: i32 = 64;
const MAX_FONT_LENGTH: usize = 100;

/// Design reads and upserts for one project
pub struct DesignService<'a> {
    store: &'a dyn PortalStore,
}

impl<'a> DesignService<'a> {
    pub fn new(store: &'a dyn PortalStore) -> Self {
        Self { store }
    }

    pub async fn fetch(&self, project_id: Uuid) -> Result<Option<Design>, ApiError> {
        self.ensure_project(project_id).await?;
        Ok(self.store.get_design(project_id).await?)
    }

    /// Admin upsert. Repeating the same input leaves the row unchanged apart
    /// from `updated_at`.
    pub async fn save(&self, project_id: Uuid, input: DesignInput) -> Result<Design, ApiError> {
        let input = normalize(input);
        validate(&input)?;
        self.ensure_project(project_id).await?;

        let design = self.store.upsert_design(project_id, input).await?;
        tracing::info!(
            "Saved design for project {} (onboarding_completed={})",
            project_id,
            design.onboarding_completed
        );
        Ok(design)
    }

    /// Client submission of the onboarding flow. Only valid while the project
    /// is still onboarding; always completes it.
    pub async fn complete_onboarding(&self, project_id: Uuid, input: DesignInput) -> Result<Design, ApiError> {
        let current = self.store.get_design(project_id).await?;
        if ProjectState::from_design(current.as_ref()) == ProjectState::Active {
            return Err(ApiError::conflict("Onboarding already completed for this project"));
        }

        self.save(project_id, DesignInput { onboarding_completed: Some(true), ..input }).await
    }

    async fn ensure_project(&self, project_id: Uuid) -> Result<(), ApiError> {
        match self.store.get_project(project_id).await? {
            Some(_) => Ok(()),
            None => Err(ApiError::not_found(format!("Project {} not found", project_id))),
        }
    }
}

/// Trim text fields, drop empty ones and lowercase colors
fn normalize(input: DesignInput) -> DesignInput {
    let clean = |value: Option<String>| value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    DesignInput {
        theme_id: clean(input.theme_id),
        primary_color: clean(input.primary_color).map(|c| c.to_ascii_lowercase()),
        accent_color: clean(input.accent_color).map(|c| c.to_ascii_lowercase()),
        heading_font: clean(input.heading_font),
        body_font: clean(input.body_font),
        corner_radius: input.corner_radius,
        onboarding_completed: input.onboarding_completed,
    }
}

pub fn validate(input: &DesignInput) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    for (field, value) in [("primary_color", &input.primary_color), ("accent_color", &input.accent_color)] {
        if let Some(color) = value {
            if !is_hex_color(color) {
                field_errors.insert(field.to_string(), "must be a hex color like #1a2b3c".to_string());
            }
        }
    }

    for (field, value) in [("heading_font", &input.heading_font), ("body_font", &input.body_font)] {
        if value.as_ref().map(|font| font.len() > MAX_FONT_LENGTH).unwrap_or(false) {
            field_errors.insert(field.to_string(), format!("must be at most {} characters", MAX_FONT_LENGTH));
        }
    }

    if let Some(radius) = input.corner_radius {
        if !(0..=MAX_CORNER_RADIUS).contains(&radius) {
            field_errors.insert(
                "corner_radius".to_string(),
                format!("must be between 0 and {}", MAX_CORNER_RADIUS),
            );
        }
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Invalid design", Some(field_errors)))
    }
}

/// `#rgb` or `#rrggbb`
fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewProject;
    use crate::database::MemoryStore;
    use axum::http::StatusCode;

    fn field_errors(err: ApiError) -> HashMap<String, String> {
        match err {
            ApiError::ValidationError { field_errors: Some(errors), .. } => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn accepts_short_and_long_hex_colors() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#1A2b3C"));
        assert!(!is_hex_color("fff"));
        assert!(!is_hex_color("#ffff"));
        assert!(!is_hex_color("#ggg"));
    }

    #[test]
    fn reports_every_bad_field() {
        let input = DesignInput {
            primary_color: Some("red".into()),
            corner_radius: Some(65),
            ..Default::default()
        };
        let errors = field_errors(validate(&input).unwrap_err());
        assert!(errors.contains_key("primary_color"));
        assert!(errors.contains_key("corner_radius"));
        assert!(!errors.contains_key("accent_color"));
    }

    #[test]
    fn normalize_trims_and_drops_blanks() {
        let input = normalize(DesignInput {
            theme_id: Some("  ".into()),
            primary_color: Some(" #ABCDEF ".into()),
            heading_font: Some(" Inter ".into()),
            ..Default::default()
        });
        assert_eq!(input.theme_id, None);
        assert_eq!(input.primary_color.as_deref(), Some("#abcdef"));
        assert_eq!(input.heading_font.as_deref(), Some("Inter"));
    }

    #[tokio::test]
    async fn onboarding_completes_once() {
        let store = MemoryStore::new();
        let org = store
            .upsert_organization(crate::database::models::NewOrganization {
                external_id: "org_1".into(),
                name: "Acme".into(),
                slug: None,
            })
            .await
            .unwrap();
        let project = store
            .create_project(NewProject {
                organization_id: org.id,
                name: "Site".into(),
                description: None,
                status: Default::default(),
            })
            .await
            .unwrap();

        let service = DesignService::new(&store);
        let design = service
            .complete_onboarding(project.id, DesignInput { theme_id: Some("dawn".into()), ..Default::default() })
            .await
            .unwrap();
        assert!(design.onboarding_completed);

        let again = service.complete_onboarding(project.id, DesignInput::default()).await.unwrap_err();
        assert_eq!(again.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn saving_for_a_missing_project_is_not_found() {
        let store = MemoryStore::new();
        let err = DesignService::new(&store)
            .save(Uuid::new_v4(), DesignInput::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
