use askama::Template;
use askama_axum::IntoResponse;
use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use validator::Validate;

use super::countdown::CountdownView;
use crate::api::models::{EventRecord, Registration};
use crate::error::{toast_header, AppError, HX_TRIGGER};
use crate::reporting::detail::{format_event_date, star_row, StarGlyph};
use crate::reporting::rating::review_caption;
use crate::state::AppState;

/// 活动卡片
#[derive(Debug, Clone)]
pub struct EventCard {
    pub id: String,
    pub name: String,
    pub location: String,
    pub date_label: String,
    pub photo: Option<String>,
    pub stars: Vec<StarGlyph>,
    pub review_caption: String,
    pub volunteers: usize,
    pub countdown: Option<CountdownView>,
}

impl EventCard {
    pub fn from_record(record: &EventRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            location: record.location.clone(),
            date_label: format_event_date(&record.date),
            photo: record.cover_photo().map(str::to_string),
            stars: star_row(record.average_rating()).to_vec(),
            review_caption: review_caption(record.reviews.len() as u64),
            volunteers: record.volunteers_assigned.len(),
            countdown: CountdownView::for_event_date(&record.date),
        }
    }
}

#[derive(Template)]
#[template(path = "modules/events/index.html")]
pub struct EventsPageTemplate {
    pub cards: Vec<EventCard>,
    pub unavailable: bool,
}

#[derive(Template)]
#[template(path = "modules/events/detail.html")]
pub struct EventDetailPageTemplate {
    pub card: EventCard,
    pub event: EventRecord,
    pub form: RegistrationFormView,
}

#[derive(Template)]
#[template(path = "modules/events/register_form.html")]
pub struct RegisterFormTemplate {
    pub card: EventCard,
    pub form: RegistrationFormView,
}

#[derive(Template)]
#[template(path = "modules/events/register_success.html")]
pub struct RegisterSuccessTemplate {
    pub first_name: String,
    pub event_name: String,
    pub participation_type: String,
}

/// 注册表单的回显值和错误信息
#[derive(Debug, Clone, Default)]
pub struct RegistrationFormView {
    pub values: RegisterForm,
    pub errors: BTreeMap<String, String>,
}

impl RegistrationFormView {
    pub fn error(&self, field: &str) -> &str {
        self.errors.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn is_volunteer(&self) -> bool {
        self.values.participation_type != "participant"
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub participation_type: String,
    #[serde(default)]
    pub message: String,
    /// 复选框未勾选时不会提交
    #[serde(default)]
    pub terms: Option<String>,
}

impl RegisterForm {
    pub fn into_registration(self, event_id: &str) -> Registration {
        Registration {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            participation_type: self.participation_type.trim().to_lowercase(),
            message: self.message.trim().to_string(),
            terms: self.terms.is_some(),
            event_id: event_id.to_string(),
        }
    }
}

/// 把 validator 的错误整理为 字段 -> 首条信息
pub fn field_errors(errors: &validator::ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let message = errs.first().map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {field}"))
            })?;
            Some((field.to_string(), message))
        })
        .collect()
}

/// 公开活动列表，上游失败时显示空列表并提示
pub async fn events_page(State(state): State<AppState>) -> Response {
    match state.api.events().await {
        Ok(records) => EventsPageTemplate {
            cards: records.iter().map(EventCard::from_record).collect(),
            unavailable: false,
        }
        .into_response(),
        Err(e) => {
            tracing::warn!("获取活动列表失败: {}", e);
            let message = e.user_message();
            let mut response = EventsPageTemplate {
                cards: vec![],
                unavailable: true,
            }
            .into_response();
            response
                .headers_mut()
                .insert(HX_TRIGGER, toast_header("error", &message));
            response
        }
    }
}

pub async fn event_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.api.event(&id).await?;
    Ok(EventDetailPageTemplate {
        card: EventCard::from_record(&event),
        event,
        form: RegistrationFormView::default(),
    })
}

/// 提交注册：先本地验证，失败时回显表单；通过后转发给上游
pub async fn register(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let event = state.api.event(&id).await?;
    let card = EventCard::from_record(&event);
    let registration = form.clone().into_registration(&event.id);

    if let Err(errors) = registration.validate() {
        let view = RegistrationFormView {
            values: form,
            errors: field_errors(&errors),
        };
        // htmx 只替换 2xx 响应，带错误信息的表单以 200 返回
        let mut response = RegisterFormTemplate { card, form: view }.into_response();
        response.headers_mut().insert(
            HX_TRIGGER,
            toast_header("error", "Please correct the highlighted fields."),
        );
        return Ok(response);
    }

    state.api.register(&registration).await?;
    tracing::info!("活动报名成功: event={}, type={}", event.id, registration.participation_type);

    let mut response = RegisterSuccessTemplate {
        first_name: registration.first_name,
        event_name: event.name,
        participation_type: registration.participation_type,
    }
    .into_response();
    response
        .headers_mut()
        .insert(HX_TRIGGER, toast_header("success", "Registration received."));
    Ok(response)
}
