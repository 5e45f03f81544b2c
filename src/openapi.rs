use utoipa::OpenApi;

/// OpenAPI description of the depot back-office API. Served as JSON at
/// `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Depot API",
        version = "0.1.0",
        description = "Back-office API for a consignment (depot) retail shop: \
            products, clients, co-clients, commands, photos and reporting. \
            All endpoints except /auth/login, /categories and /users require a \
            bearer token."
    ),
    paths(
        crate::handlers::products::create_product,
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::commands::create_command,
        crate::handlers::commands::list_commands,
        crate::handlers::commands::get_command,
        crate::handlers::commands::update_command,
        crate::handlers::commands::delete_command,
    ),
    components(schemas(
        crate::auth::LoginRequest,
        crate::auth::TokenResponse,
        crate::entities::CommandStatus,
        crate::errors::ErrorResponse,
        crate::handlers::common::MessageResponse,
        crate::services::categories::CreateCategory,
        crate::services::categories::UpdateCategory,
        crate::services::clients::CreateClient,
        crate::services::co_clients::CreateCoClient,
        crate::services::commands::CreateCommand,
        crate::services::commands::UpdateCommand,
        crate::services::products::CreateProduct,
        crate::services::products::UpdateProduct,
        crate::services::users::CreateUser,
        crate::services::users::UpdateUser,
    )),
    tags(
        (name = "products", description = "Owned and consigned stock"),
        (name = "commands", description = "Customer orders and delivery lifecycle")
    )
)]
pub struct ApiDoc;
