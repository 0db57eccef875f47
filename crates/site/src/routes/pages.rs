//! Static page route handlers: about, services, contact.
//!
//! Page copy lives in `content/pages/*.md`; the about page decorates its
//! story with the achievements timeline and the services page renders
//! the offerings the store lists.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use chrono::NaiveDate;
use tracing::{error, instrument};

use healthy_corner_core::{Achievement, Service};

use crate::content::Page;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Achievement entry on the about page timeline.
pub struct AchievementView {
    pub title: String,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub is_award: bool,
    pub image_url: Option<String>,
}

impl From<&Achievement> for AchievementView {
    fn from(achievement: &Achievement) -> Self {
        Self {
            title: achievement.title.clone(),
            description: achievement.description.clone(),
            year: achievement.year,
            is_award: achievement.achievement_type.as_deref() == Some("award"),
            image_url: achievement.image_url.clone(),
        }
    }
}

/// Service card on the services page.
pub struct ServiceView {
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image_url: Option<String>,
}

impl From<&Service> for ServiceView {
    fn from(service: &Service) -> Self {
        Self {
            title: service.title.clone(),
            description: service.description.clone(),
            icon: service.icon.clone(),
            image_url: service.image_url.clone(),
        }
    }
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub title: String,
    pub description: String,
    pub updated_at: Option<NaiveDate>,
    pub content_html: String,
    pub achievements: Vec<AchievementView>,
}

/// Services page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/services.html")]
pub struct ServicesTemplate {
    pub services: Vec<ServiceView>,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate {
    pub title: String,
    pub description: String,
    pub content_html: String,
}

/// Look up a markdown page by slug.
fn content_page<'a>(state: &'a AppState, slug: &str) -> Result<&'a Page> {
    state
        .content()
        .page(slug)
        .ok_or_else(|| AppError::NotFound(format!("page: {slug}")))
}

/// GET /about - Story page with the achievements timeline.
#[instrument(skip(state))]
pub async fn about(State(state): State<AppState>) -> Result<AboutTemplate> {
    let page = content_page(&state, "about")?;

    // The timeline decorates the story; render without it if the store
    // call fails.
    let achievements = state.supabase().achievements().await.map_or_else(
        |e| {
            error!("Failed to load achievements: {e}");
            Vec::new()
        },
        |rows| rows.iter().map(AchievementView::from).collect(),
    );

    Ok(AboutTemplate {
        title: page.meta.title.clone(),
        description: page.meta.description.clone().unwrap_or_default(),
        updated_at: page.meta.updated_at,
        content_html: page.content_html.clone(),
        achievements,
    })
}

/// GET /services - Service listing.
#[instrument(skip(state))]
pub async fn services(State(state): State<AppState>) -> Result<ServicesTemplate> {
    let services = state.supabase().services().await?;

    Ok(ServicesTemplate {
        services: services.iter().map(ServiceView::from).collect(),
    })
}

/// GET /contact - Contact details and opening hours.
#[instrument(skip(state))]
pub async fn contact(State(state): State<AppState>) -> Result<ContactTemplate> {
    let page = content_page(&state, "contact")?;

    Ok(ContactTemplate {
        title: page.meta.title.clone(),
        description: page.meta.description.clone().unwrap_or_default(),
        content_html: page.content_html.clone(),
    })
}
