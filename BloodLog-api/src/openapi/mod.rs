use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Session endpoints
        crate::api::handlers::auth::login,
        crate::api::handlers::auth::logout,
        crate::api::handlers::auth::session,

        // Reading views
        crate::api::handlers::dashboard::get_dashboard,
        crate::api::handlers::dashboard::get_chart,
        crate::api::handlers::history::get_history,
        crate::api::handlers::history::get_history_years,

        // Reading changes
        crate::api::handlers::readings::create_reading,
        crate::api::handlers::readings::update_reading,
        crate::api::handlers::readings::delete_reading,

        // Medical records
        crate::api::handlers::medical::list_medical_records,
        crate::api::handlers::medical::create_medical_record,
        crate::api::handlers::medical::delete_medical_record
    ),
    components(
        schemas(
            // API entities
            crate::entities::common::ErrorResponse,
            crate::entities::views::ChartPoint,
            crate::entities::views::ChartResponse,
            crate::entities::views::DashboardResponse,
            crate::entities::views::HistoryResponse,
            crate::entities::views::YearsResponse,
            crate::entities::views::ReadingListResponse,
            crate::entities::views::MedicalListResponse,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentHealthStatus,

            // Domain entities
            blood_log_domain::entities::DisplayReading,
            blood_log_domain::entities::EffectiveReading,
            blood_log_domain::entities::Measurement,
            blood_log_domain::entities::StatusLevel,
            blood_log_domain::entities::TimeSlot,
            blood_log_domain::entities::HistoryRow,
            blood_log_domain::entities::MedicalRecord,
            blood_log_domain::entities::ReadingForm,
            blood_log_domain::entities::MedicalForm,
            blood_log_domain::entities::Attachment,

            // Session schemas
            blood_log_domain::auth::LoginRequest,
            blood_log_domain::auth::SessionStatus
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "auth", description = "Sign in and out against the collaborator"),
        (name = "readings", description = "Blood pressure readings, dashboard, chart and history"),
        (name = "medical", description = "Medical visit records")
    ),
    info(
        title = "BloodLog API",
        version = "0.1.0",
        description = "Personal blood pressure log backed by a remote collaborator",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
